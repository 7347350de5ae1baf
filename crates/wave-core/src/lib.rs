//! Core types for Elliott Wave chart annotations.
//!
//! This crate provides the document data model shared by the rule engine and
//! the interactive editor:
//! - `Point` - A (time, price) chart coordinate
//! - `Candle` - OHLCV candle data read by the magnet snap
//! - `WavePath` - An impulse (1-5) or corrective (A-C) wave annotation
//! - `Selection` / `DragHandle` - What the operator is currently targeting
//! - `Snapshot` - A detached copy of the wave collection for undo/redo and export

pub mod candle;
pub mod point;
pub mod selection;
pub mod snapshot;
pub mod wave;

pub use candle::{Candle, OHLCV};
pub use point::Point;
pub use selection::{DragHandle, Selection};
pub use snapshot::Snapshot;
pub use wave::{find_wave, remove_wave, WaveError, WaveId, WaveKind, WaveLabel, WavePath};

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
