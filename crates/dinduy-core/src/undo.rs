//! Bounded undo/redo history for one edit session
//!
//! A buffer is created when a note is opened, seeded with the note's
//! stored `{title, content}`, and dropped when the note closes. The
//! buffer never writes to the note store itself; callers mirror
//! [`UndoRedoBuffer::current`] into the note after every change.

use tracing::debug;

use crate::models::Snapshot;

/// Default number of snapshots kept per edit session
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Linear snapshot history with a cursor
#[derive(Debug, Clone)]
pub struct UndoRedoBuffer {
    history: Vec<Snapshot>,
    cursor: usize,
    limit: usize,
}

impl UndoRedoBuffer {
    /// Create a buffer holding `initial` as snapshot 0
    pub fn new(initial: Snapshot) -> Self {
        Self::with_limit(initial, DEFAULT_HISTORY_LIMIT)
    }

    /// Create a buffer with a custom bound (clamped to at least 1)
    pub fn with_limit(initial: Snapshot, limit: usize) -> Self {
        let mut history = Vec::with_capacity(limit.max(1));
        history.push(initial);
        Self {
            history,
            cursor: 0,
            limit: limit.max(1),
        }
    }

    /// Record a new state
    ///
    /// Returns false when `state` equals the current snapshot and nothing
    /// was recorded. Any redo history beyond the cursor is discarded.
    pub fn push(&mut self, state: Snapshot) -> bool {
        if self.history[self.cursor] == state {
            return false;
        }

        self.history.truncate(self.cursor + 1);
        self.history.push(state);
        if self.history.len() > self.limit {
            let overflow = self.history.len() - self.limit;
            self.history.drain(0..overflow);
        }
        self.cursor = self.history.len() - 1;
        true
    }

    /// Step back one snapshot; returns false at the start of history
    pub fn undo(&mut self) -> bool {
        if self.cursor == 0 {
            debug!("undo ignored at start of history");
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Step forward one snapshot; returns false at the end of history
    pub fn redo(&mut self) -> bool {
        if self.cursor + 1 >= self.history.len() {
            debug!("redo ignored at end of history");
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Snapshot at the cursor
    pub fn current(&self) -> &Snapshot {
        &self.history[self.cursor]
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.history.len()
    }

    /// Number of recorded snapshots
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(text: &str) -> Snapshot {
        Snapshot::new("title", text)
    }

    #[test]
    fn test_new_buffer() {
        let buffer = UndoRedoBuffer::new(content("seed"));
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.cursor(), 0);
        assert_eq!(buffer.current(), &content("seed"));
        assert!(!buffer.can_undo());
        assert!(!buffer.can_redo());
        assert!(!buffer.is_empty());
    }

    #[test]
    fn test_push_identical_is_noop() {
        let mut buffer = UndoRedoBuffer::new(content("seed"));
        assert!(!buffer.push(content("seed")));
        assert_eq!(buffer.len(), 1);

        assert!(buffer.push(content("a")));
        assert!(!buffer.push(content("a")));
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_undo_redo_cycle() {
        let mut buffer = UndoRedoBuffer::new(content("seed"));
        buffer.push(content("a"));
        buffer.push(content("b"));

        assert!(buffer.undo());
        assert_eq!(buffer.current(), &content("a"));
        assert!(buffer.redo());
        assert_eq!(buffer.current(), &content("b"));
        assert!(!buffer.redo());
        assert_eq!(buffer.current(), &content("b"));
    }

    #[test]
    fn test_undo_clamps_at_start() {
        let mut buffer = UndoRedoBuffer::new(content("seed"));
        buffer.push(content("a"));
        assert!(buffer.undo());
        assert!(!buffer.undo());
        assert_eq!(buffer.cursor(), 0);
        assert_eq!(buffer.current(), &content("seed"));
    }

    #[test]
    fn test_push_after_undo_discards_redo() {
        let mut buffer = UndoRedoBuffer::new(content("seed"));
        buffer.push(content("a"));
        buffer.push(content("b"));
        buffer.undo();
        buffer.undo();

        assert!(buffer.push(content("c")));
        assert_eq!(buffer.len(), 2);
        assert!(!buffer.can_redo());
        assert!(buffer.undo());
        assert_eq!(buffer.current(), &content("seed"));
    }

    #[test]
    fn test_push_equal_to_cursor_after_undo_keeps_redo() {
        let mut buffer = UndoRedoBuffer::new(content("seed"));
        buffer.push(content("a"));
        buffer.undo();
        assert!(!buffer.push(content("seed")));
        assert!(buffer.can_redo());
    }

    #[test]
    fn test_bounded_to_limit() {
        let mut buffer = UndoRedoBuffer::new(content("seed"));
        for i in 0..50 {
            buffer.push(content(&format!("edit {i}")));
            assert!(buffer.len() <= DEFAULT_HISTORY_LIMIT);
        }
        assert_eq!(buffer.len(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(buffer.cursor(), DEFAULT_HISTORY_LIMIT - 1);
        assert_eq!(buffer.current(), &content("edit 49"));

        while buffer.undo() {}
        // Oldest snapshots were evicted first
        assert_eq!(buffer.current(), &content("edit 30"));
    }

    #[test]
    fn test_custom_limit() {
        let mut buffer = UndoRedoBuffer::with_limit(content("seed"), 3);
        buffer.push(content("a"));
        buffer.push(content("b"));
        buffer.push(content("c"));
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.limit(), 3);

        let zero = UndoRedoBuffer::with_limit(content("seed"), 0);
        assert_eq!(zero.limit(), 1);
    }

    #[test]
    fn test_undo_then_redo_restores_current() {
        let mut buffer = UndoRedoBuffer::new(content("seed"));
        for text in ["a", "b", "c", "b", "d"] {
            buffer.push(content(text));
            let before = buffer.current().clone();
            if buffer.undo() {
                buffer.redo();
            }
            assert_eq!(buffer.current(), &before);
        }
    }
}
