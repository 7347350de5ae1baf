//! Bounded undo/redo stacks of document snapshots.

use std::collections::VecDeque;

use wave_core::Snapshot;

use crate::error::{EditorError, HistoryDirection, Result};

/// Undo/redo history.
///
/// Every committing edit pushes the pre-edit snapshot and clears the redo
/// stack. The oldest entries are dropped once `max_depth` is exceeded; a
/// depth of 0 keeps every entry.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<Snapshot>,
    redo: VecDeque<Snapshot>,
    max_depth: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(wave_config::HistoryConfig::default().max_depth)
    }
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: VecDeque::new(),
            max_depth,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Record the state preceding a committing edit.
    pub fn record(&mut self, before: Snapshot) {
        push_bounded(&mut self.undo, before, self.max_depth);
        self.redo.clear();
    }

    /// Pop the latest undo entry, parking `current` on the redo stack.
    pub fn undo(&mut self, current: Snapshot) -> Result<Snapshot> {
        let previous = self
            .undo
            .pop_back()
            .ok_or(EditorError::EmptyHistory(HistoryDirection::Undo))?;
        push_bounded(&mut self.redo, current, self.max_depth);
        Ok(previous)
    }

    /// Pop the latest redo entry, parking `current` on the undo stack.
    pub fn redo(&mut self, current: Snapshot) -> Result<Snapshot> {
        let next = self
            .redo
            .pop_back()
            .ok_or(EditorError::EmptyHistory(HistoryDirection::Redo))?;
        push_bounded(&mut self.undo, current, self.max_depth);
        Ok(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

fn push_bounded(stack: &mut VecDeque<Snapshot>, snapshot: Snapshot, max_depth: usize) {
    stack.push_back(snapshot);
    while max_depth > 0 && stack.len() > max_depth {
        stack.pop_front();
    }
}
