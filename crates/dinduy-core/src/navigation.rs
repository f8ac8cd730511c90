//! Overlay navigation stack
//!
//! Every overlay (note editor, settings sheet, delete confirmation,
//! selection toolbar) owns exactly one entry in the host's back history.
//! The stack keeps those entries in the order they were opened so that a
//! single back signal always closes the most recent overlay.
//!
//! ## Pop order
//!
//! - A delete confirmation is always closed first, wherever it sits.
//! - Otherwise the most recently opened overlay is closed.
//!
//! At most one overlay of each kind is open at a time; opening a kind
//! that is already open is refused so entries never double up.

use std::fmt;

use tracing::debug;

use crate::models::NoteId;

/// Kind of overlay, without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    Editor,
    Settings,
    DeleteConfirm,
    Selection,
}

impl fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OverlayKind::Editor => "editor",
            OverlayKind::Settings => "settings",
            OverlayKind::DeleteConfirm => "delete-confirm",
            OverlayKind::Selection => "selection",
        };
        f.write_str(name)
    }
}

/// An open overlay and the state it carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    /// Detail editor for one note
    Editor(NoteId),
    /// Settings sheet
    Settings,
    /// Delete confirmation for a set of notes
    DeleteConfirm { targets: Vec<NoteId> },
    /// Multi-select toolbar
    Selection,
}

impl Overlay {
    pub fn kind(&self) -> OverlayKind {
        match self {
            Overlay::Editor(_) => OverlayKind::Editor,
            Overlay::Settings => OverlayKind::Settings,
            Overlay::DeleteConfirm { .. } => OverlayKind::DeleteConfirm,
            Overlay::Selection => OverlayKind::Selection,
        }
    }
}

/// Stack of open overlays mirroring the host back history
#[derive(Debug, Clone, Default)]
pub struct NavigationStack {
    entries: Vec<Overlay>,
}

impl NavigationStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an overlay on top of the stack
    ///
    /// Returns false, changing nothing, if an overlay of the same kind is
    /// already open.
    pub fn push(&mut self, overlay: Overlay) -> bool {
        let kind = overlay.kind();
        if self.is_open(kind) {
            debug!("overlay {} already open, push ignored", kind);
            return false;
        }
        debug!("push overlay {} (depth {})", kind, self.entries.len() + 1);
        self.entries.push(overlay);
        true
    }

    /// Close one overlay in back-signal order
    ///
    /// Returns `None` when nothing is open.
    pub fn pop(&mut self) -> Option<Overlay> {
        let index = self
            .position(OverlayKind::DeleteConfirm)
            .or_else(|| self.entries.len().checked_sub(1))?;
        let overlay = self.entries.remove(index);
        debug!("pop overlay {} (depth {})", overlay.kind(), self.entries.len());
        Some(overlay)
    }

    /// Close the overlay of `kind` wherever it sits
    pub fn remove(&mut self, kind: OverlayKind) -> Option<Overlay> {
        let index = self.position(kind)?;
        let overlay = self.entries.remove(index);
        debug!("remove overlay {} (depth {})", kind, self.entries.len());
        Some(overlay)
    }

    /// Swap the open overlay of the same kind in place
    ///
    /// Keeps its position and history entry. Returns false if no overlay
    /// of that kind is open.
    pub fn replace(&mut self, overlay: Overlay) -> bool {
        let Some(index) = self.position(overlay.kind()) else {
            return false;
        };
        debug!("replace overlay {}", overlay.kind());
        self.entries[index] = overlay;
        true
    }

    /// Overlay the next back signal would close
    pub fn top(&self) -> Option<&Overlay> {
        match self.position(OverlayKind::DeleteConfirm) {
            Some(index) => self.entries.get(index),
            None => self.entries.last(),
        }
    }

    /// Number of open overlays, equal to the pushed history depth
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// True when no overlay is open
    pub fn is_base(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_open(&self, kind: OverlayKind) -> bool {
        self.position(kind).is_some()
    }

    pub fn get(&self, kind: OverlayKind) -> Option<&Overlay> {
        self.entries.iter().find(|o| o.kind() == kind)
    }

    /// Note shown by the open editor, if any
    pub fn editor_note(&self) -> Option<NoteId> {
        self.entries.iter().find_map(|o| match o {
            Overlay::Editor(id) => Some(*id),
            _ => None,
        })
    }

    /// Targets of the open delete confirmation, if any
    pub fn delete_targets(&self) -> Option<&[NoteId]> {
        self.entries.iter().find_map(|o| match o {
            Overlay::DeleteConfirm { targets } => Some(targets.as_slice()),
            _ => None,
        })
    }

    /// Open overlays from bottom to top
    pub fn iter(&self) -> impl Iterator<Item = &Overlay> {
        self.entries.iter()
    }

    fn position(&self, kind: OverlayKind) -> Option<usize> {
        self.entries.iter().position(|o| o.kind() == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> NoteId {
        NoteId::new(f64::from(n))
    }

    #[test]
    fn test_empty_stack() {
        let mut nav = NavigationStack::new();
        assert!(nav.is_base());
        assert_eq!(nav.depth(), 0);
        assert!(nav.top().is_none());
        assert!(nav.pop().is_none());
    }

    #[test]
    fn test_lifo_order() {
        let mut nav = NavigationStack::new();
        assert!(nav.push(Overlay::Editor(id(5))));
        assert!(nav.push(Overlay::Settings));
        assert_eq!(nav.depth(), 2);
        assert_eq!(nav.top(), Some(&Overlay::Settings));

        assert_eq!(nav.pop(), Some(Overlay::Settings));
        assert_eq!(nav.pop(), Some(Overlay::Editor(id(5))));
        assert!(nav.is_base());
    }

    #[test]
    fn test_delete_confirm_pops_first() {
        let mut nav = NavigationStack::new();
        nav.push(Overlay::Selection);
        nav.push(Overlay::DeleteConfirm {
            targets: vec![id(1), id(2)],
        });
        nav.push(Overlay::Settings);

        assert_eq!(nav.top().map(Overlay::kind), Some(OverlayKind::DeleteConfirm));
        assert_eq!(
            nav.pop().map(|o| o.kind()),
            Some(OverlayKind::DeleteConfirm)
        );
        assert_eq!(nav.pop(), Some(Overlay::Settings));
        assert_eq!(nav.pop(), Some(Overlay::Selection));
        assert!(nav.pop().is_none());
    }

    #[test]
    fn test_duplicate_kind_refused() {
        let mut nav = NavigationStack::new();
        assert!(nav.push(Overlay::Editor(id(1))));
        assert!(!nav.push(Overlay::Editor(id(2))));
        assert_eq!(nav.depth(), 1);
        assert_eq!(nav.editor_note(), Some(id(1)));
    }

    #[test]
    fn test_remove_by_kind() {
        let mut nav = NavigationStack::new();
        nav.push(Overlay::Editor(id(1)));
        nav.push(Overlay::Settings);
        assert_eq!(nav.remove(OverlayKind::Editor), Some(Overlay::Editor(id(1))));
        assert_eq!(nav.depth(), 1);
        assert!(nav.remove(OverlayKind::Editor).is_none());
        assert!(nav.is_open(OverlayKind::Settings));
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut nav = NavigationStack::new();
        assert!(!nav.replace(Overlay::Editor(id(2))));
        nav.push(Overlay::Editor(id(1)));
        nav.push(Overlay::Settings);
        assert!(nav.replace(Overlay::Editor(id(2))));
        assert_eq!(nav.depth(), 2);
        assert_eq!(nav.editor_note(), Some(id(2)));
        assert_eq!(nav.top(), Some(&Overlay::Settings));
    }

    #[test]
    fn test_delete_targets() {
        let mut nav = NavigationStack::new();
        assert!(nav.delete_targets().is_none());
        nav.push(Overlay::DeleteConfirm {
            targets: vec![id(3)],
        });
        assert_eq!(nav.delete_targets(), Some(&[id(3)][..]));
    }

    #[test]
    fn test_n_pops_return_to_base() {
        let mut nav = NavigationStack::new();
        let overlays = vec![
            Overlay::Selection,
            Overlay::Settings,
            Overlay::DeleteConfirm { targets: vec![id(1)] },
        ];
        let n = overlays.len();
        for overlay in overlays {
            nav.push(overlay);
        }
        for _ in 0..n {
            assert!(nav.pop().is_some());
        }
        assert!(nav.is_base());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(OverlayKind::DeleteConfirm.to_string(), "delete-confirm");
        assert_eq!(OverlayKind::Editor.to_string(), "editor");
    }
}
