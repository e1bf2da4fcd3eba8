//! Undo/redo for editor commands.
//!
//! Provides:
//! - `UndoManager` trait for abstracting undo implementations
//! - `SnapshotHistory` - bounded stacks of whole-document snapshots

use super::selection::Selection;
use crate::schema::RichDocument;

/// Trait for managing undo/redo operations.
pub trait UndoManager {
    /// Check if undo is available.
    fn can_undo(&self) -> bool;

    /// Check if redo is available.
    fn can_redo(&self) -> bool;

    /// Clear all undo/redo history.
    fn clear_history(&mut self);
}

/// Editor state captured before a command ran.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub doc: RichDocument,
    pub selection: Selection,
}

/// Bounded undo and redo stacks of document snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotHistory {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    max_steps: usize,
}

impl Default for SnapshotHistory {
    fn default() -> Self {
        Self::new(100)
    }
}

impl SnapshotHistory {
    pub fn new(max_steps: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_steps,
        }
    }

    /// Record the state before an edit.
    pub fn record(&mut self, before: Snapshot) {
        // A new edit invalidates anything undone
        self.redo_stack.clear();
        self.undo_stack.push(before);

        while self.undo_stack.len() > self.max_steps {
            self.undo_stack.remove(0);
        }
    }

    /// Step back: returns the snapshot to restore, storing `current` for redo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Step forward again after an undo.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(next)
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }
}

impl UndoManager for SnapshotHistory {
    fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    fn clear_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
