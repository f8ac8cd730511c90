//! Persisted collection format
//!
//! A collection is exported as
//! `{ "notes": [...], "allTags": [...], "version": "19.0" }`.
//! Import replaces the whole collection; there is no merge.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::models::Note;
use crate::store::NoteStore;

/// Format version written into every export
pub const FORMAT_VERSION: &str = "19.0";

/// Full collection as written to disk
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionSnapshot {
    pub notes: Vec<Note>,
    #[serde(rename = "allTags")]
    pub all_tags: Vec<String>,
    pub version: String,
}

impl CollectionSnapshot {
    /// Capture the current contents of `store`
    pub fn from_store(store: &NoteStore) -> Self {
        Self {
            notes: store.notes().to_vec(),
            all_tags: store.tags().to_vec(),
            version: FORMAT_VERSION.to_string(),
        }
    }

    /// Pretty-printed JSON export
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Parsed import payload
///
/// `all_tags` is `None` when the payload did not carry a vocabulary, in
/// which case the current vocabulary is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportPayload {
    pub notes: Vec<Note>,
    pub all_tags: Option<Vec<String>>,
    pub version: Option<String>,
}

#[derive(Deserialize)]
struct RawPayload {
    notes: Option<Vec<Note>>,
    #[serde(rename = "allTags")]
    all_tags: Option<Vec<String>>,
    version: Option<String>,
}

/// Parse an import payload
///
/// Fails when the text is not valid JSON of the expected shape, when
/// the `notes` field is absent, or when two notes share an id. Repeated
/// tags on a note are collapsed to their first occurrence.
pub fn parse_import(json: &str) -> Result<ImportPayload> {
    let raw: RawPayload = serde_json::from_str(json)?;
    let mut notes = raw.notes.ok_or(CoreError::MissingNotes)?;

    let mut seen = HashSet::with_capacity(notes.len());
    for note in &mut notes {
        if !seen.insert(note.id) {
            return Err(CoreError::DuplicateNoteId(note.id));
        }
        dedupe_tags(&mut note.tags);
    }

    Ok(ImportPayload {
        notes,
        all_tags: raw.all_tags,
        version: raw.version,
    })
}

fn dedupe_tags(tags: &mut Vec<String>) {
    let mut seen = HashSet::with_capacity(tags.len());
    tags.retain(|tag| seen.insert(tag.clone()));
}

/// Suggested export file name, e.g. `dinduy-v19-2024-05-01.json`
pub fn export_file_name(date: NaiveDate) -> String {
    let major = FORMAT_VERSION.split('.').next().unwrap_or(FORMAT_VERSION);
    format!("dinduy-v{}-{}.json", major, date.format("%Y-%m-%d"))
}
