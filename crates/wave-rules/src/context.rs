//! Evaluation context shared by all rules.

use wave_core::WavePath;

use crate::ValidatorConfig;

/// Direction of a price move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trend {
    Up,
    Down,
    /// No move beyond the comparison tolerance.
    Flat,
}

impl Trend {
    /// Classify the move from `from` to `to`.
    #[inline]
    pub fn from_move(from: f64, to: f64, epsilon: f64) -> Self {
        let delta = to - from;
        if delta > epsilon {
            Trend::Up
        } else if delta < -epsilon {
            Trend::Down
        } else {
            Trend::Flat
        }
    }

    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Trend::Up => Trend::Down,
            Trend::Down => Trend::Up,
            Trend::Flat => Trend::Flat,
        }
    }

    #[inline]
    pub fn is_flat(self) -> bool {
        matches!(self, Trend::Flat)
    }
}

/// Context provided to rules for evaluation.
pub struct WaveContext<'a> {
    pub wave: &'a WavePath,
    pub epsilon: f64,
    pub alternation_threshold: f64,
}

impl<'a> WaveContext<'a> {
    pub fn new(wave: &'a WavePath, config: &ValidatorConfig) -> Self {
        Self {
            wave,
            epsilon: config.epsilon,
            alternation_threshold: config.alternation_threshold,
        }
    }

    /// Check if the wave has at least `n` points.
    #[inline]
    pub fn has_points(&self, n: usize) -> bool {
        self.wave.points.len() >= n
    }

    /// Prices of the first `N` points, if present.
    pub fn prices<const N: usize>(&self) -> Option<[f64; N]> {
        if !self.has_points(N) {
            return None;
        }
        Some(std::array::from_fn(|i| self.wave.points[i].p))
    }

    /// Direction of the move between two prices.
    #[inline]
    pub fn trend(&self, from: f64, to: f64) -> Trend {
        Trend::from_move(from, to, self.epsilon)
    }

    /// `a` is above `b` by more than the tolerance.
    #[inline]
    pub fn above(&self, a: f64, b: f64) -> bool {
        a > b + self.epsilon
    }

    /// `a` is below `b` by more than the tolerance.
    #[inline]
    pub fn below(&self, a: f64, b: f64) -> bool {
        a < b - self.epsilon
    }
}
