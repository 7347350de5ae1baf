//! The annotation document and its JSON interchange formats.
//!
//! Two forms are exchanged:
//! - snapshot form: `{ "ts", "waves": [...], "selectedWaveId" }`
//! - collection form: a bare array of waves
//!
//! Import validates structure before anything is swapped in, so a rejected
//! payload never touches the live document. Legacy waves without
//! `createdAt`/`updatedAt` are stamped with the import time.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;
use wave_core::{find_wave, now_millis, remove_wave, Point, Selection, Snapshot, WaveId, WaveKind, WaveLabel, WavePath};

use crate::error::{EditorError, Result};

/// Committed waves plus the current selection.
///
/// The selection only ever names a wave present in `waves`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub waves: Vec<WavePath>,
    pub selection: Selection,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_wave_id(&self) -> Option<&WaveId> {
        self.selection.wave_id()
    }

    pub fn selected_wave(&self) -> Option<&WavePath> {
        self.selected_wave_id().and_then(|id| self.find(id))
    }

    pub fn find(&self, id: &WaveId) -> Option<&WavePath> {
        find_wave(&self.waves, id)
    }

    pub fn find_mut(&mut self, id: &WaveId) -> Option<&mut WavePath> {
        self.waves.iter_mut().find(|w| &w.id == id)
    }

    pub fn contains(&self, id: &WaveId) -> bool {
        self.find(id).is_some()
    }

    /// Remove a wave, clearing the selection if it pointed at it.
    pub fn remove(&mut self, id: &WaveId) -> Option<WavePath> {
        let removed = remove_wave(&mut self.waves, id)?;
        if self.selected_wave_id() == Some(id) {
            self.selection = Selection::None;
        }
        Some(removed)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.waves, self.selected_wave_id())
    }

    /// Replace the document contents with a snapshot.
    ///
    /// A selected id missing from the snapshot's collection restores to no selection.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.selection = match snapshot.selected_wave_id {
            Some(wave_id) if find_wave(&snapshot.waves, &wave_id).is_some() => Selection::Wave { wave_id },
            _ => Selection::None,
        };
        self.waves = snapshot.waves;
    }
}

/// Wave as it appears in imported JSON, before timestamps are filled.
#[derive(Debug, Deserialize)]
struct RawWave {
    id: WaveId,
    kind: WaveKind,
    points: Vec<Point>,
    labels: Vec<WaveLabel>,
    color: String,
    #[serde(rename = "createdAt")]
    created_at: Option<i64>,
    #[serde(rename = "updatedAt")]
    updated_at: Option<i64>,
}

impl RawWave {
    fn into_wave(self, now: i64) -> WavePath {
        let created_at = self.created_at.unwrap_or(now);
        WavePath {
            id: self.id,
            kind: self.kind,
            points: self.points,
            labels: self.labels,
            color: self.color,
            created_at,
            updated_at: self.updated_at.unwrap_or(created_at),
        }
    }
}

/// Serialize a snapshot in snapshot form.
pub fn export_snapshot(snapshot: &Snapshot) -> Result<String> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

/// Serialize waves in collection form.
pub fn export_waves(waves: &[WavePath]) -> Result<String> {
    Ok(serde_json::to_string_pretty(waves)?)
}

/// Parse and validate a snapshot-form document.
pub fn parse_snapshot(text: &str) -> Result<Snapshot> {
    snapshot_from_value(parse_json(text)?)
}

/// Parse and validate a collection-form document.
pub fn parse_waves(text: &str) -> Result<Vec<WavePath>> {
    match parse_json(text)? {
        Value::Array(items) => convert_waves(items),
        _ => Err(schema("expected a JSON array of waves")),
    }
}

/// Parse either form, dispatching on the top-level JSON type.
pub fn parse_any(text: &str) -> Result<Snapshot> {
    match parse_json(text)? {
        Value::Array(items) => Ok(Snapshot {
            ts: now_millis(),
            waves: convert_waves(items)?,
            selected_wave_id: None,
        }),
        value => snapshot_from_value(value),
    }
}

fn parse_json(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| EditorError::Schema(format!("not valid JSON: {e}")))
}

fn schema(message: &str) -> EditorError {
    EditorError::Schema(message.to_string())
}

fn snapshot_from_value(value: Value) -> Result<Snapshot> {
    let Value::Object(mut map) = value else {
        return Err(schema("expected a JSON object with a `waves` array"));
    };

    let waves = match map.remove("waves") {
        Some(Value::Array(items)) => convert_waves(items)?,
        Some(_) => return Err(schema("`waves` must be an array")),
        None => return Err(schema("missing `waves` array")),
    };

    let selected_wave_id = match map.remove("selectedWaveId") {
        None | Some(Value::Null) => None,
        Some(Value::String(id)) => Some(WaveId::from(id)),
        Some(_) => return Err(schema("`selectedWaveId` must be a string or null")),
    };
    if let Some(id) = &selected_wave_id {
        if find_wave(&waves, id).is_none() {
            return Err(EditorError::Schema(format!("`selectedWaveId` {id} is not in `waves`")));
        }
    }

    let ts = match map.remove("ts") {
        None | Some(Value::Null) => now_millis(),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .ok_or_else(|| schema("`ts` is out of range"))?,
        Some(_) => return Err(schema("`ts` must be a number")),
    };

    Ok(Snapshot {
        ts,
        waves,
        selected_wave_id,
    })
}

fn convert_waves(items: Vec<Value>) -> Result<Vec<WavePath>> {
    let now = now_millis();
    let mut seen = HashSet::new();
    let mut waves = Vec::with_capacity(items.len());

    for (index, item) in items.into_iter().enumerate() {
        let raw: RawWave = serde_json::from_value(item)
            .map_err(|e| EditorError::Schema(format!("wave {index}: {e}")))?;
        let wave = raw.into_wave(now);

        if !wave.has_valid_labels() {
            return Err(EditorError::Schema(format!(
                "wave {}: labels do not follow the {} sequence",
                wave.id, wave.kind
            )));
        }
        if !seen.insert(wave.id.clone()) {
            return Err(EditorError::Schema(format!("duplicate wave id {}", wave.id)));
        }
        waves.push(wave);
    }

    Ok(waves)
}
