//! Mode-aware keyboard mapping.
//!
//! [`InputContext`] turns key presses into editor [`Command`]s based on the
//! current [`Mode`] and modifier state. The windowing layer translates its
//! own key codes into [`Key`] first.
//!
//! # Example
//!
//! ```ignore
//! let mut input = InputContext::new();
//! input.set_mode(editor.mode());
//! input.set_modifiers(Modifiers { ctrl: true, ..Default::default() });
//!
//! if let Some(command) = input.map_key(Key::Char('z')) {
//!     editor.execute(command, &ctx)?; // Undo
//! }
//! ```

use crate::events::{Command, Mode, Modifiers};

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Delete,
    Backspace,
    Enter,
    /// A printable character, matched case-insensitively.
    Char(char),
}

/// Context for mode-aware input handling.
#[derive(Debug, Clone, Default)]
pub struct InputContext {
    /// Current editor mode.
    pub mode: Mode,
    /// Current keyboard modifiers.
    pub modifiers: Modifiers,
}

impl InputContext {
    /// Create a new input context in select mode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    /// Map a key press to a command.
    ///
    /// Returns `None` if the key does nothing in the current mode.
    #[must_use]
    pub fn map_key(&self, key: Key) -> Option<Command> {
        if key == Key::Escape {
            return Some(self.escape_action());
        }

        // History shortcuts work in every mode
        if self.modifiers.command() {
            return self.map_command_key(key);
        }

        if let Some(command) = self.map_mode_key(key) {
            return Some(command);
        }

        match self.mode {
            Mode::Select => self.map_key_select(key),
            Mode::DrawImpulse | Mode::DrawCorrection => self.map_key_drawing(key),
            Mode::Delete => None,
        }
    }

    fn escape_action(&self) -> Command {
        match self.mode {
            Mode::DrawImpulse | Mode::DrawCorrection | Mode::Delete => Command::Cancel,
            Mode::Select => Command::SelectWave(None),
        }
    }

    /// Ctrl/Cmd shortcuts.
    fn map_command_key(&self, key: Key) -> Option<Command> {
        let Key::Char(c) = key else {
            return None;
        };
        match c.to_ascii_lowercase() {
            'z' if self.modifiers.shift => Some(Command::Redo),
            'z' => Some(Command::Undo),
            'y' => Some(Command::Redo),
            'd' if self.mode == Mode::Select => Some(Command::DuplicateSelected),
            _ => None,
        }
    }

    /// Mode switching and snap toggle, available in every mode.
    fn map_mode_key(&self, key: Key) -> Option<Command> {
        let Key::Char(c) = key else {
            return None;
        };
        match c.to_ascii_lowercase() {
            'v' => Some(Command::SetMode(Mode::Select)),
            '1' => Some(Command::SetMode(Mode::DrawImpulse)),
            'a' => Some(Command::SetMode(Mode::DrawCorrection)),
            'x' => Some(Command::SetMode(Mode::Delete)),
            'g' => Some(Command::ToggleSnap),
            _ => None,
        }
    }

    fn map_key_select(&self, key: Key) -> Option<Command> {
        match key {
            Key::Delete | Key::Backspace => Some(Command::DeleteSelected),
            Key::Char(c) if c.eq_ignore_ascii_case(&'i') => Some(Command::InsertOnSegment),
            _ => None,
        }
    }

    fn map_key_drawing(&self, key: Key) -> Option<Command> {
        match key {
            Key::Backspace | Key::Delete => Some(Command::RemoveLastPoint),
            _ => None,
        }
    }
}
