//! Editor modes, commands and command outcomes.
//!
//! - [`Mode`] - the operator-selected interaction mode
//! - [`Modifiers`] - keyboard modifier state
//! - [`Command`] - a single request from the UI layer
//! - [`Outcome`] - what a command did to the document

use wave_core::{DragHandle, Point, WaveId, WaveKind};

use crate::coords::ScreenPos;

/// Interaction modes the operator can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Select, drag and edit committed waves.
    #[default]
    Select,
    /// Place points for a new five-wave impulse.
    DrawImpulse,
    /// Place points for a new three-wave correction.
    DrawCorrection,
    /// Next click on a wave deletes it.
    Delete,
}

impl Mode {
    /// Get the display name for this mode.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Select => "Select",
            Mode::DrawImpulse => "Impulse",
            Mode::DrawCorrection => "Correction",
            Mode::Delete => "Delete",
        }
    }

    /// Get the keyboard shortcut for this mode.
    #[must_use]
    pub fn shortcut(&self) -> &'static str {
        match self {
            Mode::Select => "V",
            Mode::DrawImpulse => "1",
            Mode::DrawCorrection => "A",
            Mode::Delete => "X",
        }
    }

    /// Wave kind drawn in this mode.
    #[must_use]
    pub fn wave_kind(&self) -> Option<WaveKind> {
        match self {
            Mode::DrawImpulse => Some(WaveKind::Impulse),
            Mode::DrawCorrection => Some(WaveKind::Correction),
            Mode::Select | Mode::Delete => None,
        }
    }

    /// Check if this mode places points.
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.wave_kind().is_some()
    }

    /// Get all modes.
    pub fn all() -> &'static [Mode] {
        &[Mode::Select, Mode::DrawImpulse, Mode::DrawCorrection, Mode::Delete]
    }
}

impl From<WaveKind> for Mode {
    fn from(kind: WaveKind) -> Self {
        match kind {
            WaveKind::Impulse => Mode::DrawImpulse,
            WaveKind::Correction => Mode::DrawCorrection,
        }
    }
}

/// Keyboard modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Check if any modifier is pressed.
    #[must_use]
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }

    /// Check if no modifiers are pressed.
    #[must_use]
    pub fn none(&self) -> bool {
        !self.any()
    }

    /// Ctrl on most platforms, Cmd on macOS.
    #[must_use]
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Requests the UI layer sends to the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Switch interaction mode.
    SetMode(Mode),
    /// Begin a new wave, discarding any in-progress one.
    StartWave(WaveKind),
    /// Append a point (chart coordinates) to the in-progress wave.
    AddPoint(Point),
    /// Drop the most recent point of the in-progress wave.
    RemoveLastPoint,
    /// Abandon the in-progress wave or the current transient mode.
    Cancel,
    /// Select a wave (or clear the selection with `None`).
    SelectWave(Option<WaveId>),
    DeleteSelected,
    DuplicateSelected,
    /// Insert a point at the midpoint of the selected segment.
    InsertOnSegment,
    Undo,
    Redo,
    ToggleSnap,

    /// Start dragging a point handle.
    BeginDrag(DragHandle),
    /// Move the dragged handle to a chart coordinate.
    ApplyDrag(Point),
    EndDrag,

    /// Pointer pressed at a screen position.
    Press(ScreenPos),
    /// Pointer moved with the button held.
    DragTo(ScreenPos),
    /// Pointer released.
    Release,
    /// Double-click at a screen position.
    DoubleClick(ScreenPos),

    /// Replace the document with a snapshot-form JSON payload.
    ImportSnapshot(String),
    /// Replace the collection with a collection-form JSON payload.
    ImportWaves(String),
}

/// What a command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing changed.
    Ignored,
    /// Editor state changed without a history entry (selection, drag frame,
    /// in-progress wave, mode).
    Updated,
    /// A committing edit was applied and recorded in history.
    Committed,
    /// The in-progress wave reached its threshold and joined the collection.
    WaveCommitted(WaveId),
}

impl Outcome {
    /// Check if the command changed anything.
    #[must_use]
    pub fn changed(&self) -> bool {
        !matches!(self, Outcome::Ignored)
    }
}
