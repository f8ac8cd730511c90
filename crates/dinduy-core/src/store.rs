//! In-memory note collection
//!
//! `NoteStore` owns every note and the tag vocabulary. Notes are kept in
//! display order: new notes and duplicates are inserted at the head.
//!
//! The vocabulary is independent of the notes. Removing a label from the
//! vocabulary leaves it on notes that carry it; such labels are hidden by
//! [`NoteStore::visible_tags`] instead of being stripped.

use chrono::Utc;
use rand::Rng;
use tracing::debug;

use crate::models::{Note, NoteId};

/// Ordered collection of notes plus tag vocabulary
#[derive(Debug, Clone, Default)]
pub struct NoteStore {
    notes: Vec<Note>,
    tags: Vec<String>,
}

impl NoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from loaded data
    ///
    /// Duplicate vocabulary labels are dropped, keeping the first.
    pub fn with_contents(notes: Vec<Note>, tags: Vec<String>) -> Self {
        let mut store = Self {
            notes,
            tags: Vec::new(),
        };
        for tag in tags {
            store.add_tag(&tag);
        }
        store
    }

    // ==================== Note Operations ====================

    /// All notes in display order
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn get_mut(&mut self, id: NoteId) -> Option<&mut Note> {
        self.notes.iter_mut().find(|n| n.id == id)
    }

    pub fn contains(&self, id: NoteId) -> bool {
        self.get(id).is_some()
    }

    /// Insert a note at the head of the collection
    pub fn insert_front(&mut self, note: Note) {
        debug!("insert note {}", note.id);
        self.notes.insert(0, note);
    }

    /// Insert several notes at the head, keeping their relative order
    pub fn insert_all_front(&mut self, notes: Vec<Note>) {
        if notes.is_empty() {
            return;
        }
        debug!("insert {} notes at head", notes.len());
        self.notes.splice(0..0, notes);
    }

    /// Remove every note whose id is in `ids`
    ///
    /// Returns the removed notes; ids not present are ignored.
    pub fn remove_many(&mut self, ids: &[NoteId]) -> Vec<Note> {
        let mut removed = Vec::new();
        self.notes.retain(|note| {
            if ids.contains(&note.id) {
                removed.push(note.clone());
                false
            } else {
                true
            }
        });
        debug!("removed {} of {} requested notes", removed.len(), ids.len());
        removed
    }

    /// Replace all notes, and the vocabulary when given
    pub fn replace(&mut self, notes: Vec<Note>, tags: Option<Vec<String>>) {
        self.notes = notes;
        if let Some(tags) = tags {
            self.tags.clear();
            for tag in tags {
                self.add_tag(&tag);
            }
        }
    }

    /// Generate an id not used by any stored note
    pub fn fresh_id(&self) -> NoteId {
        self.fresh_id_excluding(&[])
    }

    /// Generate an id not used by any stored note nor by `reserved`
    pub fn fresh_id_excluding(&self, reserved: &[NoteId]) -> NoteId {
        let millis = Utc::now().timestamp_millis() as f64;
        self.fresh_id_at(millis, reserved, &mut rand::thread_rng())
    }

    /// Id derived from `millis`, with a random fraction on collision
    fn fresh_id_at(&self, millis: f64, reserved: &[NoteId], rng: &mut impl Rng) -> NoteId {
        let taken = |id: NoteId| self.contains(id) || reserved.contains(&id);

        let mut candidate = NoteId::new(millis);
        while taken(candidate) {
            let fraction: f64 = rng.gen_range(0.001..1.0);
            candidate = NoteId::new(millis + fraction);
        }
        candidate
    }

    // ==================== Tag Operations ====================

    /// The tag vocabulary in insertion order
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Add a label to the vocabulary
    ///
    /// Labels are trimmed; empty or already known labels are ignored.
    /// Returns true when the vocabulary changed.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.has_tag(tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Remove a label from the vocabulary, leaving notes untouched
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        match self.tags.iter().position(|t| t == tag) {
            Some(pos) => {
                self.tags.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Tags of `note` that are still in the vocabulary
    pub fn visible_tags<'a>(&self, note: &'a Note) -> Vec<&'a str> {
        note.tags
            .iter()
            .filter(|t| self.has_tag(t))
            .map(String::as_str)
            .collect()
    }

    /// Vocabulary labels with the number of notes carrying each
    pub fn tags_with_counts(&self) -> Vec<(String, usize)> {
        self.tags
            .iter()
            .map(|tag| {
                let count = self.notes.iter().filter(|n| n.has_tag(tag)).count();
                (tag.clone(), count)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    fn id(n: u32) -> NoteId {
        NoteId::new(f64::from(n))
    }

    fn sample_store() -> NoteStore {
        let notes = (1..=3)
            .map(|n| Note::with_text(id(n), format!("note {n}"), "body"))
            .collect();
        NoteStore::with_contents(notes, vec!["Kuliah".into(), "Hobi".into()])
    }

    #[test]
    fn test_insert_front() {
        let mut store = sample_store();
        store.insert_front(Note::new(id(9)));
        assert_eq!(store.notes()[0].id, id(9));
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_insert_all_front_keeps_order() {
        let mut store = sample_store();
        store.insert_all_front(vec![Note::new(id(7)), Note::new(id(8))]);
        let ids: Vec<_> = store.notes().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![id(7), id(8), id(1), id(2), id(3)]);
    }

    #[test]
    fn test_remove_many_exact() {
        let mut store = sample_store();
        let removed = store.remove_many(&[id(1), id(3), id(42)]);
        assert_eq!(removed.len(), 2);
        assert_eq!(store.len(), 1);
        assert!(store.contains(id(2)));
        assert!(!store.contains(id(1)));
        assert!(!store.contains(id(3)));
    }

    #[test]
    fn test_fresh_id_uses_millis_when_free() {
        let store = sample_store();
        let mut rng = StepRng::new(0, 1);
        let fresh = store.fresh_id_at(1_700_000_000_000.0, &[], &mut rng);
        assert_eq!(fresh, NoteId::new(1_700_000_000_000.0));
        assert!(!fresh.is_fractional());
    }

    #[test]
    fn test_fresh_id_avoids_collision() {
        let store = sample_store();
        let fresh = store.fresh_id_at(2.0, &[], &mut rand::thread_rng());
        assert_ne!(fresh, id(2));
        assert!(fresh.is_fractional());
        assert_eq!(fresh.value().floor(), 2.0);
    }

    #[test]
    fn test_fresh_id_respects_reserved() {
        let store = NoteStore::new();
        let first = store.fresh_id_at(10.0, &[], &mut rand::thread_rng());
        let second = store.fresh_id_at(10.0, &[first], &mut rand::thread_rng());
        assert_ne!(first, second);
    }

    #[test]
    fn test_fresh_id_unique_in_store() {
        let store = sample_store();
        let a = store.fresh_id();
        let b = store.fresh_id_excluding(&[a]);
        assert_ne!(a, b);
        assert!(!store.contains(a));
    }

    #[test]
    fn test_tag_vocabulary() {
        let mut store = sample_store();
        assert!(store.add_tag("  Art "));
        assert!(store.has_tag("Art"));
        assert!(!store.add_tag("Art"));
        assert!(!store.add_tag("   "));
        assert_eq!(store.tags(), &["Kuliah", "Hobi", "Art"]);

        assert!(store.remove_tag("Hobi"));
        assert!(!store.remove_tag("Hobi"));
        assert_eq!(store.tags(), &["Kuliah", "Art"]);
    }

    #[test]
    fn test_removed_tag_hidden_not_stripped() {
        let mut store = sample_store();
        store.get_mut(id(1)).unwrap().add_tag("Kuliah");
        store.get_mut(id(1)).unwrap().add_tag("Hobi");
        store.remove_tag("Hobi");

        let note = store.get(id(1)).unwrap();
        assert_eq!(note.tags, vec!["Kuliah", "Hobi"]);
        assert_eq!(store.visible_tags(note), vec!["Kuliah"]);
    }

    #[test]
    fn test_with_contents_dedupes_tags() {
        let store = NoteStore::with_contents(Vec::new(), vec!["a".into(), "a".into(), "b".into()]);
        assert_eq!(store.tags(), &["a", "b"]);
    }

    #[test]
    fn test_replace_keeps_tags_when_absent() {
        let mut store = sample_store();
        store.replace(vec![Note::new(id(100))], None);
        assert_eq!(store.len(), 1);
        assert_eq!(store.tags(), &["Kuliah", "Hobi"]);

        store.replace(Vec::new(), Some(vec!["Misc".into()]));
        assert!(store.is_empty());
        assert_eq!(store.tags(), &["Misc"]);
    }

    #[test]
    fn test_tags_with_counts() {
        let mut store = sample_store();
        store.get_mut(id(1)).unwrap().add_tag("Kuliah");
        store.get_mut(id(2)).unwrap().add_tag("Kuliah");
        let counts = store.tags_with_counts();
        assert_eq!(counts, vec![("Kuliah".to_string(), 2), ("Hobi".to_string(), 0)]);
    }
}
