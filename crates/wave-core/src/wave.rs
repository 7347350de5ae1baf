//! Wave annotation types.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::point::Point;

/// Errors raised by structural edits on a [`WavePath`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WaveError {
    #[error("point index {index} out of range for wave with {len} points")]
    PointIndex { index: usize, len: usize },
    #[error("points {a} and {b} are not adjacent")]
    NotAdjacent { a: usize, b: usize },
}

/// Unique identifier for a wave.
///
/// Serialized as a bare string so documents written by other tools keep their ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaveId(String);

impl WaveId {
    /// Generate a new random wave ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for WaveId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for WaveId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for WaveId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for WaveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Label placed on a wave point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaveLabel {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    A,
    B,
    C,
}

impl WaveLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            WaveLabel::One => "1",
            WaveLabel::Two => "2",
            WaveLabel::Three => "3",
            WaveLabel::Four => "4",
            WaveLabel::Five => "5",
            WaveLabel::A => "A",
            WaveLabel::B => "B",
            WaveLabel::C => "C",
        }
    }
}

impl fmt::Display for WaveLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const IMPULSE_LABELS: [WaveLabel; 5] = [
    WaveLabel::One,
    WaveLabel::Two,
    WaveLabel::Three,
    WaveLabel::Four,
    WaveLabel::Five,
];

const CORRECTION_LABELS: [WaveLabel; 3] = [WaveLabel::A, WaveLabel::B, WaveLabel::C];

/// Structural kind of a wave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaveKind {
    /// Five-point motive structure labeled 1-5.
    Impulse,
    /// Three-point counter-trend structure labeled A-C.
    Correction,
}

impl WaveKind {
    /// Canonical label alphabet, in placement order.
    pub fn labels(self) -> &'static [WaveLabel] {
        match self {
            WaveKind::Impulse => &IMPULSE_LABELS,
            WaveKind::Correction => &CORRECTION_LABELS,
        }
    }

    /// Number of points at which a wave under construction is committed.
    pub fn completion_threshold(self) -> usize {
        self.labels().len()
    }

    /// Get the display name for this kind.
    pub fn name(self) -> &'static str {
        match self {
            WaveKind::Impulse => "impulse",
            WaveKind::Correction => "correction",
        }
    }
}

impl fmt::Display for WaveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An Elliott Wave annotation: an ordered polyline of chart points with
/// canonical labels on its leading points.
///
/// Invariant: `labels.len() <= points.len()` and `labels` is a prefix of
/// `kind.labels()`. Points added by [`insert_point_between`](Self::insert_point_between)
/// are structural and never receive a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WavePath {
    pub id: WaveId,
    pub kind: WaveKind,
    pub points: Vec<Point>,
    pub labels: Vec<WaveLabel>,
    pub color: String,
    /// Creation time in epoch milliseconds.
    #[serde(rename = "createdAt")]
    pub created_at: i64,
    /// Last modification time in epoch milliseconds.
    #[serde(rename = "updatedAt")]
    pub updated_at: i64,
}

impl WavePath {
    /// Create an empty wave of the given kind.
    pub fn new(kind: WaveKind, color: impl Into<String>) -> Self {
        let now = crate::now_millis();
        Self {
            id: WaveId::new(),
            kind,
            points: Vec::new(),
            labels: Vec::new(),
            color: color.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Build a wave from an existing point list, labeling the leading points.
    ///
    /// Unlike [`append_point`](Self::append_point) this does not stop at the
    /// completion threshold; extra points stay unlabeled.
    pub fn from_points(kind: WaveKind, color: impl Into<String>, points: Vec<Point>) -> Self {
        let mut wave = Self::new(kind, color);
        let label_count = points.len().min(kind.completion_threshold());
        wave.labels = kind.labels()[..label_count].to_vec();
        wave.points = points;
        wave
    }

    /// Whether the wave has reached its kind's completion threshold.
    pub fn is_complete(&self) -> bool {
        self.points.len() >= self.kind.completion_threshold()
    }

    /// The label the next appended point would receive.
    pub fn next_label(&self) -> Option<WaveLabel> {
        self.kind.labels().get(self.labels.len()).copied()
    }

    /// Price of the point at `index`.
    pub fn price(&self, index: usize) -> Option<f64> {
        self.points.get(index).map(|pt| pt.p)
    }

    /// Check the label invariant against the kind's alphabet.
    pub fn has_valid_labels(&self) -> bool {
        self.labels.len() <= self.points.len() && self.kind.labels().starts_with(&self.labels)
    }

    /// Append a point and its canonical label.
    ///
    /// Returns `false` without modifying the wave once the completion threshold is reached.
    pub fn append_point(&mut self, point: Point) -> bool {
        if self.is_complete() {
            return false;
        }
        self.points.push(point);
        if let Some(label) = self.next_label() {
            self.labels.push(label);
        }
        self.touch();
        true
    }

    /// Replace the point at `index`.
    pub fn replace_point(&mut self, index: usize, point: Point) -> Result<(), WaveError> {
        let len = self.points.len();
        let slot = self
            .points
            .get_mut(index)
            .ok_or(WaveError::PointIndex { index, len })?;
        *slot = point;
        self.touch();
        Ok(())
    }

    /// Insert an unlabeled point between two adjacent points (given in either order).
    ///
    /// Returns the index of the inserted point.
    pub fn insert_point_between(&mut self, a: usize, b: usize, point: Point) -> Result<usize, WaveError> {
        let len = self.points.len();
        for index in [a, b] {
            if index >= len {
                return Err(WaveError::PointIndex { index, len });
            }
        }
        if a.abs_diff(b) != 1 {
            return Err(WaveError::NotAdjacent { a, b });
        }
        let at = a.min(b) + 1;
        self.points.insert(at, point);
        self.touch();
        Ok(at)
    }

    /// Remove the most recently placed point along with its label.
    pub fn remove_last_point(&mut self) -> Option<Point> {
        let removed = self.points.pop()?;
        self.labels.truncate(self.points.len());
        self.touch();
        Some(removed)
    }

    /// Move the points at `indices` by a time/price delta.
    pub fn translate_points(&mut self, indices: &[usize], dt: f64, dp: f64) -> Result<(), WaveError> {
        let len = self.points.len();
        if let Some(&index) = indices.iter().find(|&&i| i >= len) {
            return Err(WaveError::PointIndex { index, len });
        }
        for &i in indices {
            self.points[i] = self.points[i].translate(dt, dp);
        }
        self.touch();
        Ok(())
    }

    /// Bump the modification timestamp.
    pub fn touch(&mut self) {
        self.updated_at = crate::now_millis().max(self.updated_at);
    }
}

/// Find a wave by id.
pub fn find_wave<'a>(waves: &'a [WavePath], id: &WaveId) -> Option<&'a WavePath> {
    waves.iter().find(|w| &w.id == id)
}

/// Remove a wave by id, preserving the order of the remaining waves.
pub fn remove_wave(waves: &mut Vec<WavePath>, id: &WaveId) -> Option<WavePath> {
    let index = waves.iter().position(|w| &w.id == id)?;
    Some(waves.remove(index))
}
