//! Detached document snapshots.
//!
//! A [`Snapshot`] owns its own copy of every wave, so later edits to the live
//! collection never leak into undo history or exported documents.

use serde::{Deserialize, Serialize};

use crate::wave::{WaveId, WavePath};

/// A point-in-time copy of the wave collection and the selected wave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Capture time in epoch milliseconds.
    pub ts: i64,
    pub waves: Vec<WavePath>,
    #[serde(rename = "selectedWaveId")]
    pub selected_wave_id: Option<WaveId>,
}

impl Snapshot {
    /// Capture a copy of `waves` stamped with the current time.
    pub fn capture(waves: &[WavePath], selected_wave_id: Option<&WaveId>) -> Self {
        Self {
            ts: crate::now_millis(),
            waves: waves.to_vec(),
            selected_wave_id: selected_wave_id.cloned(),
        }
    }

    /// Whether the collection in this snapshot matches `waves` exactly.
    pub fn same_waves(&self, waves: &[WavePath]) -> bool {
        self.waves == waves
    }
}
