//! Interaction state machine.
//!
//! [`Editor`] is the single writer of the annotation document. Every UI
//! request goes through one of its methods (or [`Editor::execute`]), which
//! runs snapping and hit-testing as needed, mutates the document and decides
//! whether the change is a committing edit that earns a history entry.
//!
//! History policy: one entry per committing edit (wave completion, point
//! insertion, delete, duplicate, and a finished drag that moved something).
//! Drag frames, selection changes and points placed on an in-progress wave
//! never record history.

use log::{debug, info, warn};
use wave_config::{ColorConfig, Config, RulesConfig};
use wave_core::{now_millis, Candle, DragHandle, Point, Selection, Snapshot, WaveId, WaveKind, WavePath};
use wave_rules::{RuleResult, Validator, ValidatorConfig};

use crate::coords::{CoordinateTransform, ScreenPos};
use crate::document::{self, Document};
use crate::error::{EditorError, HistoryDirection, Result};
use crate::events::{Command, Mode, Outcome};
use crate::fibo::{FiboLevel, FiboTemplate, SegmentAnchor};
use crate::hit_test::{Hit, HitTester};
use crate::history::History;
use crate::snap::{snap_point, SnapSettings};

/// Fraction of the source time span a duplicate is shifted by.
const DUPLICATE_TIME_OFFSET: f64 = 0.02;
/// Fraction of the source price span a duplicate is shifted by.
const DUPLICATE_PRICE_OFFSET: f64 = 0.005;

/// Chart collaborators needed to interpret pointer input.
#[derive(Clone, Copy)]
pub struct ChartContext<'a> {
    pub transform: &'a dyn CoordinateTransform,
    /// Candles ordered by time, used by the magnet snap.
    pub candles: &'a [Candle],
}

impl<'a> ChartContext<'a> {
    pub fn new(transform: &'a dyn CoordinateTransform, candles: &'a [Candle]) -> Self {
        Self { transform, candles }
    }

    /// Context for charts without candle data; the magnet never engages.
    pub fn without_candles(transform: &'a dyn CoordinateTransform) -> Self {
        Self {
            transform,
            candles: &[],
        }
    }
}

/// A drag in progress.
///
/// `before` is the document as it was when the drag began and becomes the
/// history entry if the drag moves anything.
#[derive(Debug, Clone, PartialEq)]
pub enum Drag {
    /// Dragging a single point handle.
    Point {
        handle: DragHandle,
        before: Snapshot,
        moved: bool,
    },
    /// Dragging a segment; both endpoints follow the pointer delta.
    Segment {
        wave_id: WaveId,
        a: usize,
        b: usize,
        last: Point,
        before: Snapshot,
        moved: bool,
    },
}

impl Drag {
    pub fn moved(&self) -> bool {
        match self {
            Drag::Point { moved, .. } | Drag::Segment { moved, .. } => *moved,
        }
    }

    pub fn handle(&self) -> Option<&DragHandle> {
        match self {
            Drag::Point { handle, .. } => Some(handle),
            Drag::Segment { .. } => None,
        }
    }

    fn into_before(self) -> Snapshot {
        match self {
            Drag::Point { before, .. } | Drag::Segment { before, .. } => before,
        }
    }
}

/// Current interaction state.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorState {
    /// Select mode, optionally with a drag in progress.
    Selecting { drag: Option<Drag> },
    /// A draw mode with its uncommitted wave.
    Drawing { wave: WavePath },
    /// Transient delete mode.
    Deleting,
}

impl Default for EditorState {
    fn default() -> Self {
        EditorState::Selecting { drag: None }
    }
}

impl EditorState {
    pub fn mode(&self) -> Mode {
        match self {
            EditorState::Selecting { .. } => Mode::Select,
            EditorState::Drawing { wave } => Mode::from(wave.kind),
            EditorState::Deleting => Mode::Delete,
        }
    }
}

/// Validator thresholds from the `[rules]` config section.
pub fn validator_config(rules: &RulesConfig) -> ValidatorConfig {
    ValidatorConfig {
        epsilon: rules.epsilon,
        alternation_threshold: rules.alternation_threshold,
    }
}

/// The wave annotation editor.
pub struct Editor {
    document: Document,
    state: EditorState,
    history: History,
    snap: SnapSettings,
    hit_tester: HitTester,
    validator: Validator,
    colors: ColorConfig,
    fibos: Vec<FiboTemplate>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Editor {
    pub fn new(config: &Config) -> Self {
        Self {
            document: Document::new(),
            state: EditorState::default(),
            history: History::new(config.history.max_depth),
            snap: config.snap.clone(),
            hit_tester: HitTester::from_config(&config.hit_test),
            validator: Validator::new(validator_config(&config.rules)),
            colors: config.colors.clone(),
            fibos: vec![FiboTemplate::classic()],
        }
    }

    // ---- Queries ----

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Committed waves in insertion order.
    pub fn waves(&self) -> &[WavePath] {
        &self.document.waves
    }

    pub fn selection(&self) -> &Selection {
        &self.document.selection
    }

    pub fn selected_wave_id(&self) -> Option<&WaveId> {
        self.document.selected_wave_id()
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn hit_tester(&self) -> &HitTester {
        &self.hit_tester
    }

    pub fn snap_settings(&self) -> &SnapSettings {
        &self.snap
    }

    pub fn set_snap_settings(&mut self, settings: SnapSettings) {
        self.snap = settings;
    }

    /// Toggle snapping, returning the new state.
    pub fn toggle_snap(&mut self) -> bool {
        self.snap.enabled = !self.snap.enabled;
        debug!("Snap {}", if self.snap.enabled { "on" } else { "off" });
        self.snap.enabled
    }

    /// The in-progress wave, once it has at least one point.
    pub fn active_wave(&self) -> Option<&WavePath> {
        match &self.state {
            EditorState::Drawing { wave } if !wave.points.is_empty() => Some(wave),
            _ => None,
        }
    }

    /// The handle being dragged, if any.
    pub fn active_handle(&self) -> Option<&DragHandle> {
        self.drag().and_then(Drag::handle)
    }

    pub fn drag(&self) -> Option<&Drag> {
        match &self.state {
            EditorState::Selecting { drag } => drag.as_ref(),
            _ => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag().is_some()
    }

    /// The wave the operator is working on: the in-progress wave while
    /// drawing, otherwise the selected wave.
    pub fn focused_wave(&self) -> Option<&WavePath> {
        match &self.state {
            EditorState::Drawing { wave } => Some(wave),
            _ => self.document.selected_wave(),
        }
    }

    /// Rule results for the focused wave.
    pub fn validate_focused(&self) -> Vec<RuleResult> {
        self.focused_wave()
            .map(|wave| self.validator.validate(wave))
            .unwrap_or_default()
    }

    pub fn validate_wave(&self, wave: &WavePath) -> Vec<RuleResult> {
        self.validator.validate(wave)
    }

    /// Detached copy of the committed document.
    pub fn snapshot(&self) -> Snapshot {
        self.document.snapshot()
    }

    // ---- Modes and drawing ----

    /// Switch mode. Leaving a draw mode discards the in-progress wave.
    pub fn set_mode(&mut self, mode: Mode) -> Outcome {
        if mode == self.mode() {
            return Outcome::Ignored;
        }
        self.end_drag();

        match mode.wave_kind() {
            Some(kind) => {
                self.start_wave(kind);
            }
            None => {
                if let EditorState::Drawing { wave } = &self.state {
                    debug!("Discarding in-progress {} with {} points", wave.kind, wave.points.len());
                }
                self.state = if mode == Mode::Delete {
                    EditorState::Deleting
                } else {
                    EditorState::default()
                };
            }
        }

        debug!("Mode: {}", mode.name());
        Outcome::Updated
    }

    /// Begin a new empty wave, replacing any in-progress one.
    ///
    /// The new wave takes over as the focused wave, so the committed
    /// selection is cleared.
    pub fn start_wave(&mut self, kind: WaveKind) -> Outcome {
        self.end_drag();
        let color = match kind {
            WaveKind::Impulse => self.colors.impulse.clone(),
            WaveKind::Correction => self.colors.correction.clone(),
        };
        let wave = WavePath::new(kind, color);
        debug!("Started {} {}", kind, wave.id);

        self.document.selection = Selection::None;
        self.state = EditorState::Drawing { wave };
        Outcome::Updated
    }

    /// Snap `raw` and append it to the in-progress wave, committing the wave
    /// when its kind's threshold is reached.
    pub fn add_point(&mut self, raw: Point, ctx: &ChartContext<'_>) -> Outcome {
        let point = snap_point(raw, &self.snap, ctx.candles, ctx.transform);

        let complete = match &mut self.state {
            EditorState::Drawing { wave } => {
                if !wave.append_point(point) {
                    return Outcome::Ignored;
                }
                debug!("Placed point {} of {} at ({}, {})", wave.points.len(), wave.kind, point.t, point.p);
                wave.is_complete()
            }
            _ => {
                warn!("Ignoring point outside a draw mode");
                return Outcome::Ignored;
            }
        };

        if complete {
            self.commit_active()
        } else {
            Outcome::Updated
        }
    }

    fn commit_active(&mut self) -> Outcome {
        let wave = match std::mem::take(&mut self.state) {
            EditorState::Drawing { wave } => wave,
            other => {
                self.state = other;
                return Outcome::Ignored;
            }
        };

        let before = self.document.snapshot();
        let id = wave.id.clone();
        info!("Committed {} {} with {} points", wave.kind, id, wave.points.len());

        self.document.waves.push(wave);
        self.document.selection = Selection::Wave { wave_id: id.clone() };
        self.history.record(before);
        Outcome::WaveCommitted(id)
    }

    /// Drop the most recent point of the in-progress wave.
    pub fn remove_last_point(&mut self) -> Outcome {
        match &mut self.state {
            EditorState::Drawing { wave } => match wave.remove_last_point() {
                Some(_) => Outcome::Updated,
                None => Outcome::Ignored,
            },
            _ => Outcome::Ignored,
        }
    }

    /// Abandon whatever is in progress.
    ///
    /// Drawing discards the wave, delete mode returns to select, and
    /// otherwise the selection is cleared. An active drag keeps its last
    /// position and finishes as [`Editor::end_drag`] would.
    pub fn cancel(&mut self) -> Outcome {
        if self.is_dragging() {
            return self.end_drag();
        }
        match std::mem::take(&mut self.state) {
            EditorState::Drawing { wave } => {
                debug!("Cancelled {} with {} points", wave.kind, wave.points.len());
                Outcome::Updated
            }
            EditorState::Deleting => Outcome::Updated,
            EditorState::Selecting { .. } => {
                if self.document.selection.is_none() {
                    Outcome::Ignored
                } else {
                    self.document.selection = Selection::None;
                    Outcome::Updated
                }
            }
        }
    }

    // ---- Selection and committed edits ----

    /// Select a committed wave, or clear the selection with `None`.
    pub fn select_wave(&mut self, id: Option<&WaveId>) -> Result<Outcome> {
        match id {
            None => {
                self.document.selection = Selection::None;
                Ok(Outcome::Updated)
            }
            Some(id) if self.document.contains(id) => {
                self.document.selection = Selection::Wave { wave_id: id.clone() };
                Ok(Outcome::Updated)
            }
            Some(id) => Err(missing_wave(id)),
        }
    }

    /// Delete the selected wave and clear the selection.
    pub fn delete_selected(&mut self) -> Result<Outcome> {
        let Some(id) = self.document.selected_wave_id().cloned() else {
            debug!("Nothing selected to delete");
            return Ok(Outcome::Ignored);
        };
        self.delete_wave(&id)
    }

    /// Delete a wave by id. Clears the selection if it named that wave.
    pub fn delete_wave(&mut self, id: &WaveId) -> Result<Outcome> {
        self.end_drag();
        let before = self.document.snapshot();
        let removed = self.document.remove(id).ok_or_else(|| missing_wave(id))?;
        self.history.record(before);
        info!("Deleted {} {}", removed.kind, removed.id);
        Ok(Outcome::Committed)
    }

    /// Copy the selected wave with a fresh id, a small time/price offset and
    /// the next palette color, then select the copy.
    pub fn duplicate_selected(&mut self) -> Result<Outcome> {
        let Some(id) = self.document.selected_wave_id().cloned() else {
            return Ok(Outcome::Ignored);
        };
        self.end_drag();

        let index = self
            .document
            .waves
            .iter()
            .position(|w| w.id == id)
            .ok_or_else(|| missing_wave(&id))?;
        let source = &self.document.waves[index];
        let color = self.palette_color(index + 1, &source.color);
        let copy = duplicate_wave(source, color);

        let before = self.document.snapshot();
        let copy_id = copy.id.clone();
        info!("Duplicated {} as {}", id, copy_id);
        self.document.waves.push(copy);
        self.document.selection = Selection::Wave { wave_id: copy_id };
        self.history.record(before);
        Ok(Outcome::Committed)
    }

    fn palette_color(&self, n: usize, fallback: &str) -> String {
        let palette = &self.colors.duplicate_palette;
        if palette.is_empty() {
            fallback.to_string()
        } else {
            palette[n % palette.len()].clone()
        }
    }

    /// Insert a snapped point between adjacent points `a` and `b` and select it.
    pub fn insert_point(
        &mut self,
        wave_id: &WaveId,
        a: usize,
        b: usize,
        raw: Point,
        ctx: &ChartContext<'_>,
    ) -> Result<Outcome> {
        self.end_drag();
        let point = snap_point(raw, &self.snap, ctx.candles, ctx.transform);
        let before = self.document.snapshot();

        let wave = self
            .document
            .find_mut(wave_id)
            .ok_or_else(|| missing_wave(wave_id))?;
        let index = wave.insert_point_between(a, b, point)?;
        self.shift_fibo_anchors(wave_id, index);

        self.document.selection = Selection::Point {
            wave_id: wave_id.clone(),
            index,
        };
        self.history.record(before);
        info!("Inserted point {} into {}", index, wave_id);
        Ok(Outcome::Committed)
    }

    /// Keep anchors on the same points after an insertion at `index`.
    fn shift_fibo_anchors(&mut self, wave_id: &WaveId, index: usize) {
        for anchor in self.fibos.iter_mut().filter_map(|f| f.anchor.as_mut()) {
            if anchor.wave_id != *wave_id {
                continue;
            }
            if anchor.a >= index {
                anchor.a += 1;
            }
            if anchor.b >= index {
                anchor.b += 1;
            }
        }
    }

    /// Insert a point at the midpoint of the selected segment.
    pub fn insert_on_selected_segment(&mut self, ctx: &ChartContext<'_>) -> Result<Outcome> {
        let Selection::Segment { wave_id, a, b } = &self.document.selection else {
            return Ok(Outcome::Ignored);
        };
        let (wave_id, a, b) = (wave_id.clone(), *a, *b);

        let wave = self.document.find(&wave_id).ok_or_else(|| missing_wave(&wave_id))?;
        let (Some(start), Some(end)) = (wave.points.get(a), wave.points.get(b)) else {
            return Err(EditorError::DanglingReference(format!(
                "segment {a}-{b} of wave {wave_id}"
            )));
        };
        let midpoint = start.midpoint(*end);
        self.insert_point(&wave_id, a, b, midpoint, ctx)
    }

    // ---- Drag lifecycle ----

    /// Start dragging a point handle. Only valid in select mode.
    pub fn begin_drag(&mut self, handle: DragHandle) -> Result<Outcome> {
        if !matches!(self.state, EditorState::Selecting { .. }) {
            warn!("Ignoring drag outside select mode");
            return Ok(Outcome::Ignored);
        }
        self.end_drag();

        let wave = self
            .document
            .find(&handle.wave_id)
            .ok_or_else(|| missing_wave(&handle.wave_id))?;
        if handle.point_index >= wave.points.len() {
            return Err(EditorError::DanglingReference(format!(
                "point {} of wave {}",
                handle.point_index, handle.wave_id
            )));
        }

        self.document.selection = Selection::Point {
            wave_id: handle.wave_id.clone(),
            index: handle.point_index,
        };
        let before = self.document.snapshot();
        debug!("Dragging point {} of {}", handle.point_index, handle.wave_id);
        self.state = EditorState::Selecting {
            drag: Some(Drag::Point {
                handle,
                before,
                moved: false,
            }),
        };
        Ok(Outcome::Updated)
    }

    fn begin_segment_drag(&mut self, wave_id: WaveId, a: usize, b: usize, start: Point) {
        self.end_drag();
        let before = self.document.snapshot();
        debug!("Dragging segment {}-{} of {}", a, b, wave_id);
        self.state = EditorState::Selecting {
            drag: Some(Drag::Segment {
                wave_id,
                a,
                b,
                last: start,
                before,
                moved: false,
            }),
        };
    }

    /// Move the current drag to a chart coordinate.
    ///
    /// Point drags snap the coordinate and replace the point; segment drags
    /// translate both endpoints by the raw pointer delta. No history is
    /// recorded per frame.
    pub fn apply_drag(&mut self, raw: Point, ctx: &ChartContext<'_>) -> Result<Outcome> {
        let snapped = snap_point(raw, &self.snap, ctx.candles, ctx.transform);

        let EditorState::Selecting { drag: Some(drag) } = &mut self.state else {
            return Ok(Outcome::Ignored);
        };

        let result = match drag {
            Drag::Point { handle, moved, .. } => {
                let result = match self.document.find_mut(&handle.wave_id) {
                    Some(wave) => wave.replace_point(handle.point_index, snapped).map_err(EditorError::from),
                    None => Err(missing_wave(&handle.wave_id)),
                };
                if result.is_ok() {
                    *moved = true;
                }
                result
            }
            Drag::Segment {
                wave_id,
                a,
                b,
                last,
                moved,
                ..
            } => {
                let (dt, dp) = (raw.t - last.t, raw.p - last.p);
                let result = match self.document.find_mut(wave_id) {
                    Some(wave) => wave.translate_points(&[*a, *b], dt, dp).map_err(EditorError::from),
                    None => Err(missing_wave(wave_id)),
                };
                if result.is_ok() {
                    *last = raw;
                    *moved = true;
                }
                result
            }
        };

        if let Err(err) = result {
            warn!("Dropping drag: {err}");
            self.end_drag();
            return Err(err);
        }
        Ok(Outcome::Updated)
    }

    /// Finish the current drag, recording the pre-drag state if anything moved.
    pub fn end_drag(&mut self) -> Outcome {
        let drag = match &mut self.state {
            EditorState::Selecting { drag } => drag.take(),
            _ => None,
        };

        match drag {
            Some(drag) if drag.moved() => {
                info!("Drag finished");
                self.history.record(drag.into_before());
                Outcome::Committed
            }
            Some(_) => Outcome::Updated,
            None => Outcome::Ignored,
        }
    }

    // ---- Pointer events ----

    /// Pointer pressed.
    ///
    /// - draw modes: place a point at the pointer
    /// - delete mode: delete the wave under the pointer and return to select
    /// - select mode: points first, then segments; a hit selects it and starts
    ///   a drag, empty space clears the selection
    pub fn press(&mut self, pos: ScreenPos, ctx: &ChartContext<'_>) -> Result<Outcome> {
        match self.state {
            EditorState::Drawing { .. } => {
                let point = ctx
                    .transform
                    .screen_to_point(pos)
                    .ok_or(EditorError::OutOfRange("press position"))?;
                Ok(self.add_point(point, ctx))
            }
            EditorState::Deleting => {
                let Some(hit) = self.hit_tester.hit(pos, &self.document.waves, ctx.transform) else {
                    return Ok(Outcome::Ignored);
                };
                let outcome = self.delete_wave(hit.wave_id())?;
                self.state = EditorState::default();
                Ok(outcome)
            }
            EditorState::Selecting { .. } => match self.hit_tester.hit(pos, &self.document.waves, ctx.transform) {
                Some(Hit::Point(hit)) => self.begin_drag(DragHandle::new(hit.wave_id, hit.index)),
                Some(Hit::Segment(hit)) => {
                    self.document.selection = Selection::Segment {
                        wave_id: hit.wave_id.clone(),
                        a: hit.a,
                        b: hit.b,
                    };
                    if let Some(start) = ctx.transform.screen_to_point(pos) {
                        self.begin_segment_drag(hit.wave_id, hit.a, hit.b, start);
                    }
                    Ok(Outcome::Updated)
                }
                None => {
                    if self.document.selection.is_none() {
                        Ok(Outcome::Ignored)
                    } else {
                        self.document.selection = Selection::None;
                        Ok(Outcome::Updated)
                    }
                }
            },
        }
    }

    /// Pointer moved with the button held.
    pub fn drag_to(&mut self, pos: ScreenPos, ctx: &ChartContext<'_>) -> Result<Outcome> {
        if !self.is_dragging() {
            return Ok(Outcome::Ignored);
        }
        let point = ctx
            .transform
            .screen_to_point(pos)
            .ok_or(EditorError::OutOfRange("drag position"))?;
        self.apply_drag(point, ctx)
    }

    /// Pointer released.
    pub fn release(&mut self) -> Outcome {
        self.end_drag()
    }

    /// Double-click on a segment inserts a point at the pointer.
    pub fn double_click(&mut self, pos: ScreenPos, ctx: &ChartContext<'_>) -> Result<Outcome> {
        if !matches!(self.state, EditorState::Selecting { .. }) {
            return Ok(Outcome::Ignored);
        }
        let Some(Hit::Segment(hit)) = self.hit_tester.hit(pos, &self.document.waves, ctx.transform) else {
            return Ok(Outcome::Ignored);
        };
        let point = ctx
            .transform
            .screen_to_point(pos)
            .ok_or(EditorError::OutOfRange("double-click position"))?;
        self.insert_point(&hit.wave_id, hit.a, hit.b, point, ctx)
    }

    // ---- History ----

    /// Restore the state before the last committing edit.
    ///
    /// Any in-progress wave is discarded and the editor returns to select mode.
    pub fn undo(&mut self) -> Result<Outcome> {
        self.end_drag();
        let current = self.document.snapshot();
        let previous = self.history.undo(current).map_err(|err| {
            warn!("{err}");
            err
        })?;
        self.state = EditorState::default();
        self.document.restore(previous);
        debug!("Undo ({} left)", self.history.undo_len());
        Ok(Outcome::Updated)
    }

    /// Re-apply the last undone edit.
    ///
    /// A drag that already moved something is committed first. That commit
    /// is a new edit, so it discards the redo stack and the redo fails with
    /// [`EditorError::EmptyHistory`].
    pub fn redo(&mut self) -> Result<Outcome> {
        if !self.history.can_redo() {
            let err = EditorError::EmptyHistory(HistoryDirection::Redo);
            warn!("{err}");
            return Err(err);
        }
        self.end_drag();
        let current = self.document.snapshot();
        let next = self.history.redo(current).map_err(|err| {
            warn!("{err}");
            err
        })?;
        self.state = EditorState::default();
        self.document.restore(next);
        debug!("Redo ({} left)", self.history.redo_len());
        Ok(Outcome::Updated)
    }

    // ---- Import / export ----

    /// Serialize the committed document in snapshot form.
    pub fn export_snapshot(&self) -> Result<String> {
        document::export_snapshot(&self.document.snapshot())
    }

    /// Serialize the committed waves in collection form.
    pub fn export_waves(&self) -> Result<String> {
        document::export_waves(&self.document.waves)
    }

    /// Replace the document with a snapshot-form payload.
    ///
    /// On failure nothing changes. On success the in-progress wave and both
    /// history stacks are discarded.
    pub fn import_snapshot(&mut self, text: &str) -> Result<Outcome> {
        let snapshot = document::parse_snapshot(text).map_err(|err| {
            warn!("Import rejected: {err}");
            err
        })?;
        self.replace_document(snapshot);
        Ok(Outcome::Updated)
    }

    /// Replace the collection with a collection-form payload.
    pub fn import_waves(&mut self, text: &str) -> Result<Outcome> {
        let waves = document::parse_waves(text).map_err(|err| {
            warn!("Import rejected: {err}");
            err
        })?;
        self.replace_document(Snapshot {
            ts: now_millis(),
            waves,
            selected_wave_id: None,
        });
        Ok(Outcome::Updated)
    }

    fn replace_document(&mut self, snapshot: Snapshot) {
        info!("Imported {} waves", snapshot.waves.len());
        self.state = EditorState::default();
        self.document.restore(snapshot);
        self.history.clear();
    }

    // ---- Fibonacci overlays ----

    pub fn fibo_templates(&self) -> &[FiboTemplate] {
        &self.fibos
    }

    /// Add a template, returning its id.
    pub fn add_fibo_template(&mut self, template: FiboTemplate) -> String {
        let id = template.id.clone();
        self.fibos.push(template);
        id
    }

    /// Flip a template's visibility, returning the new value.
    pub fn toggle_fibo(&mut self, id: &str) -> Option<bool> {
        let template = self.fibos.iter_mut().find(|f| f.id == id)?;
        template.visible = !template.visible;
        Some(template.visible)
    }

    /// Anchor a template to the selected segment and show it.
    pub fn anchor_fibo_to_selection(&mut self, id: &str) -> Result<Outcome> {
        let Selection::Segment { wave_id, a, b } = &self.document.selection else {
            return Ok(Outcome::Ignored);
        };
        let anchor = SegmentAnchor {
            wave_id: wave_id.clone(),
            a: *a,
            b: *b,
        };
        let template = self
            .fibos
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| EditorError::DanglingReference(format!("fibonacci template {id}")))?;
        template.anchor = Some(anchor);
        template.visible = true;
        Ok(Outcome::Updated)
    }

    /// Price levels of a visible, anchored template.
    pub fn fibo_levels(&self, id: &str) -> Option<Vec<FiboLevel>> {
        self.fibos
            .iter()
            .find(|f| f.id == id && f.visible)?
            .levels(&self.document.waves)
    }

    // ---- Command dispatch ----

    /// Apply a UI command.
    ///
    /// Dangling references and out-of-range coordinates are logged and
    /// reported as [`Outcome::Ignored`]; schema and empty-history errors are
    /// returned.
    pub fn execute(&mut self, command: Command, ctx: &ChartContext<'_>) -> Result<Outcome> {
        let result = match command {
            Command::SetMode(mode) => Ok(self.set_mode(mode)),
            Command::StartWave(kind) => Ok(self.start_wave(kind)),
            Command::AddPoint(point) => Ok(self.add_point(point, ctx)),
            Command::RemoveLastPoint => Ok(self.remove_last_point()),
            Command::Cancel => Ok(self.cancel()),
            Command::SelectWave(id) => self.select_wave(id.as_ref()),
            Command::DeleteSelected => self.delete_selected(),
            Command::DuplicateSelected => self.duplicate_selected(),
            Command::InsertOnSegment => self.insert_on_selected_segment(ctx),
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
            Command::ToggleSnap => {
                self.toggle_snap();
                Ok(Outcome::Updated)
            }
            Command::BeginDrag(handle) => self.begin_drag(handle),
            Command::ApplyDrag(point) => self.apply_drag(point, ctx),
            Command::EndDrag => Ok(self.end_drag()),
            Command::Press(pos) => self.press(pos, ctx),
            Command::DragTo(pos) => self.drag_to(pos, ctx),
            Command::Release => Ok(self.release()),
            Command::DoubleClick(pos) => self.double_click(pos, ctx),
            Command::ImportSnapshot(text) => self.import_snapshot(&text),
            Command::ImportWaves(text) => self.import_waves(&text),
        };

        match result {
            Err(err) if err.is_local() => {
                warn!("Skipped: {err}");
                Ok(Outcome::Ignored)
            }
            other => other,
        }
    }
}

fn missing_wave(id: &WaveId) -> EditorError {
    EditorError::DanglingReference(format!("wave {id}"))
}

fn duplicate_wave(source: &WavePath, color: String) -> WavePath {
    let (dt, dp) = if source.points.is_empty() {
        (0.0, 0.0)
    } else {
        let (t_min, t_max, p_min, p_max) = source.points.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
            |(t_min, t_max, p_min, p_max), pt| (t_min.min(pt.t), t_max.max(pt.t), p_min.min(pt.p), p_max.max(pt.p)),
        );
        (
            (t_max - t_min) * DUPLICATE_TIME_OFFSET,
            (p_max - p_min) * DUPLICATE_PRICE_OFFSET,
        )
    };

    let now = now_millis();
    WavePath {
        id: WaveId::new(),
        kind: source.kind,
        points: source.points.iter().map(|pt| pt.translate(dt, dp)).collect(),
        labels: source.labels.clone(),
        color,
        created_at: now,
        updated_at: now,
    }
}
