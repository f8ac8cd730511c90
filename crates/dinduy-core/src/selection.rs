//! Multi-select batch state
//!
//! Selection mode is entered by a long press on a note and left by an
//! explicit cancel, a completed batch delete or duplicate, or by
//! deselecting the last selected note.

use tracing::debug;

use crate::models::NoteId;

/// Outcome of [`SelectionController::toggle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    /// The note was added to the batch
    Added,
    /// The note was removed and others remain selected
    Removed,
    /// The last selected note was removed; selection mode has exited
    Emptied,
    /// Selection mode is not active; nothing changed
    Inactive,
}

/// Tracks whether selection mode is on and which notes are in the batch
///
/// Invariant: when `active` is false the selected set is empty.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    active: bool,
    selected: Vec<NoteId>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn selection mode on with `initial` as the only selected note
    pub fn enter(&mut self, initial: NoteId) {
        debug!("entering selection mode with {}", initial);
        self.active = true;
        self.selected.clear();
        self.selected.push(initial);
    }

    /// Add or remove `id`; emptying the batch exits selection mode
    pub fn toggle(&mut self, id: NoteId) -> SelectionChange {
        if !self.active {
            return SelectionChange::Inactive;
        }

        if let Some(pos) = self.selected.iter().position(|s| *s == id) {
            self.selected.remove(pos);
            if self.selected.is_empty() {
                self.exit();
                return SelectionChange::Emptied;
            }
            SelectionChange::Removed
        } else {
            self.selected.push(id);
            SelectionChange::Added
        }
    }

    /// Clear the batch and leave selection mode
    pub fn exit(&mut self) {
        if self.active {
            debug!("leaving selection mode ({} selected)", self.selected.len());
        }
        self.active = false;
        self.selected.clear();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_selected(&self, id: NoteId) -> bool {
        self.selected.contains(&id)
    }

    /// Selected ids in the order they were picked
    pub fn selected(&self) -> &[NoteId] {
        &self.selected
    }

    pub fn count(&self) -> usize {
        self.selected.len()
    }

    /// Drop ids that no longer exist (after a delete or an import)
    pub fn retain(&mut self, mut keep: impl FnMut(NoteId) -> bool) {
        self.selected.retain(|id| keep(*id));
        if self.selected.is_empty() {
            self.active = false;
        }
    }
}
