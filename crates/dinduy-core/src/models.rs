//! Data models for dinduy
//!
//! Defines the core data structures: Note, its id, and the editable
//! snapshot recorded by the undo history.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Display date given to notes created from the "new note" action
pub const JUST_NOW: &str = "Just now";

/// Opaque note identifier
///
/// Stored as a JSON number: creation epoch-millis, with a random
/// fractional part added when two notes are created in the same
/// millisecond. Ids are never NaN, so bitwise equality is sound.
#[derive(Debug, Clone, Copy)]
pub struct NoteId(f64);

impl NoteId {
    /// Create an id from its numeric value
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    /// Numeric value of the id
    pub fn value(self) -> f64 {
        self.0
    }

    /// Whether the id has a fractional collision-avoidance part
    pub fn is_fractional(self) -> bool {
        self.0.fract() != 0.0
    }
}

impl PartialEq for NoteId {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for NoteId {}

impl Hash for NoteId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl PartialOrd for NoteId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NoteId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NoteId {
    type Err = std::num::ParseFloatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<f64>().map(Self)
    }
}

/// Largest integer an f64 represents exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl Serialize for NoteId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Whole ids go out as integers so exports match hand-written seed files
        if self.0.fract() == 0.0 && self.0.abs() <= MAX_SAFE_INTEGER {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for NoteId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        if value.is_nan() {
            return Err(serde::de::Error::custom("note id must be a number"));
        }
        Ok(Self(value))
    }
}

/// One recorded `{title, content}` state of a note
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub title: String,
    pub content: String,
}

impl Snapshot {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// A short text note
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    /// Unique identifier
    pub id: NoteId,
    /// Note title
    #[serde(default)]
    pub title: String,
    /// Note body content
    #[serde(default)]
    pub content: String,
    /// Display date, set once at creation
    #[serde(default)]
    pub date: String,
    /// Tags in insertion order, no duplicates
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Note {
    /// Create an empty note as produced by the "new note" action
    pub fn new(id: NoteId) -> Self {
        Self {
            id,
            title: String::new(),
            content: String::new(),
            date: JUST_NOW.to_string(),
            tags: Vec::new(),
        }
    }

    /// Create a note with the given title and content
    pub fn with_text(id: NoteId, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::new(id)
        }
    }

    /// Create a copy of `source` under a fresh id
    ///
    /// The copy keeps content and tags, marks its title with `suffix`
    /// and is dated at `created`.
    pub fn duplicate_of(source: &Note, id: NoteId, suffix: &str, created: DateTime<Local>) -> Self {
        Self {
            id,
            title: format!("{}{}", source.title, suffix),
            content: source.content.clone(),
            date: display_date(created),
            tags: source.tags.clone(),
        }
    }

    /// Current editable state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.title.clone(), self.content.clone())
    }

    /// Replace the editable fields with `snapshot`
    pub fn apply_snapshot(&mut self, snapshot: &Snapshot) {
        self.title.clone_from(&snapshot.title);
        self.content.clone_from(&snapshot.content);
    }

    /// Whether the note carries the tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Add a tag (ignored if already present)
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.has_tag(&tag) {
            self.tags.push(tag);
        }
    }

    /// Remove a tag
    pub fn remove_tag(&mut self, tag: &str) {
        if let Some(pos) = self.tags.iter().position(|t| t == tag) {
            self.tags.remove(pos);
        }
    }

    /// Add the tag if absent, remove it if present
    ///
    /// Returns true when the tag ends up on the note.
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        if self.has_tag(tag) {
            self.remove_tag(tag);
            false
        } else {
            self.tags.push(tag.to_string());
            true
        }
    }
}

/// Format a creation time the way note cards show it, e.g. "10:30 AM"
pub fn display_date(at: DateTime<Local>) -> String {
    at.format("%-I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    #[test]
    fn test_note_new() {
        let note = Note::new(NoteId::new(1.0));
        assert!(note.title.is_empty());
        assert!(note.content.is_empty());
        assert!(note.tags.is_empty());
        assert_eq!(note.date, JUST_NOW);
    }

    #[test]
    fn test_note_tags() {
        let mut note = Note::new(NoteId::new(1.0));
        note.add_tag("Kuliah");
        note.add_tag("Hobi");
        note.add_tag("Kuliah");
        assert_eq!(note.tags, vec!["Kuliah", "Hobi"]);

        assert!(!note.toggle_tag("Kuliah"));
        assert_eq!(note.tags, vec!["Hobi"]);
        assert!(note.toggle_tag("Art"));
        assert_eq!(note.tags, vec!["Hobi", "Art"]);
    }

    #[test]
    fn test_snapshot_apply() {
        let mut note = Note::with_text(NoteId::new(2.0), "a", "b");
        assert_eq!(note.snapshot(), Snapshot::new("a", "b"));
        note.apply_snapshot(&Snapshot::new("x", "y"));
        assert_eq!(note.title, "x");
        assert_eq!(note.content, "y");
    }

    #[test]
    fn test_duplicate_of() {
        let mut source = Note::with_text(NoteId::new(3.0), "Buku", "Sapiens");
        source.add_tag("Hobi");
        let created = Local.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap();
        let copy = Note::duplicate_of(&source, NoteId::new(4.0), " (Copy)", created);
        assert_eq!(copy.id, NoteId::new(4.0));
        assert_eq!(copy.title, "Buku (Copy)");
        assert_eq!(copy.content, "Sapiens");
        assert_eq!(copy.tags, vec!["Hobi"]);
        assert_eq!(copy.date, "10:30 AM");
    }

    #[test]
    fn test_note_id_equality_and_hash() {
        let mut set = HashSet::new();
        set.insert(NoteId::new(5.0));
        assert!(set.contains(&NoteId::new(5.0)));
        assert!(!set.contains(&NoteId::new(5.25)));
        assert!(NoteId::new(5.25).is_fractional());
        assert!(NoteId::new(5.0) < NoteId::new(5.25));
    }

    #[test]
    fn test_note_id_display_and_parse() {
        assert_eq!(NoteId::new(5.0).to_string(), "5");
        assert_eq!("5".parse::<NoteId>().unwrap(), NoteId::new(5.0));
        assert_eq!("1700000000000.5".parse::<NoteId>().unwrap().value(), 1_700_000_000_000.5);
        assert!("abc".parse::<NoteId>().is_err());
    }

    #[test]
    fn test_note_serialization() {
        let mut note = Note::with_text(NoteId::new(1.0), "Revisi", "Bab 1");
        note.date = "10:30 AM".to_string();
        note.add_tag("Kuliah");
        let json = serde_json::to_string(&note).unwrap();
        assert!(json.contains("\"id\":1,"));
        let parsed: Note = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, note);
    }

    #[test]
    fn test_fractional_id_serialization() {
        let json = serde_json::to_string(&NoteId::new(12.5)).unwrap();
        assert_eq!(json, "12.5");
    }

    #[test]
    fn test_note_deserialize_defaults() {
        let note: Note = serde_json::from_str(r#"{"id": 9, "title": "t"}"#).unwrap();
        assert_eq!(note.id, NoteId::new(9.0));
        assert!(note.content.is_empty());
        assert!(note.tags.is_empty());
    }
}
