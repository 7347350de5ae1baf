//! Chart-space point type.

use serde::{Deserialize, Serialize};

/// A position on the chart in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Time in epoch seconds.
    pub t: f64,
    /// Price.
    pub p: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(t: f64, p: f64) -> Self {
        Self { t, p }
    }

    /// Point halfway between `self` and `other`.
    #[must_use]
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            t: (self.t + other.t) / 2.0,
            p: (self.p + other.p) / 2.0,
        }
    }

    /// Translate by a delta.
    #[must_use]
    pub fn translate(self, dt: f64, dp: f64) -> Self {
        Self {
            t: self.t + dt,
            p: self.p + dp,
        }
    }
}

impl From<(f64, f64)> for Point {
    fn from(pos: (f64, f64)) -> Self {
        Self::new(pos.0, pos.1)
    }
}
