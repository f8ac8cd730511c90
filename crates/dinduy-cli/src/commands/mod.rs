//! Command handlers

pub mod config;
pub mod note;
pub mod tag;
pub mod transfer;

use anyhow::{bail, Result};

use dinduy_core::{NoteId, NoteStore};

/// Resolve a note ID (supports full ID or prefix)
pub fn resolve_id(id: &str, store: &NoteStore) -> Result<NoteId> {
    let id = id.trim();

    // Exact match first
    if let Ok(parsed) = id.parse::<NoteId>() {
        if store.contains(parsed) {
            return Ok(parsed);
        }
    }

    let matches: Vec<_> = store
        .notes()
        .iter()
        .filter(|n| n.id.to_string().starts_with(id))
        .collect();

    match matches.len() {
        0 => bail!("No note found matching: {}", id),
        1 => Ok(matches[0].id),
        _ => {
            eprintln!("Multiple notes match '{}':", id);
            for note in &matches {
                eprintln!("  {} - {}", note.id, note.title);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}

/// Resolve several IDs, keeping order and dropping repeats
pub fn resolve_ids(ids: &[String], store: &NoteStore) -> Result<Vec<NoteId>> {
    let mut resolved = Vec::with_capacity(ids.len());
    for id in ids {
        let id = resolve_id(id, store)?;
        if !resolved.contains(&id) {
            resolved.push(id);
        }
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dinduy_core::Note;

    fn store() -> NoteStore {
        NoteStore::with_contents(
            vec![
                Note::with_text(NoteId::new(1700000000123.0), "a", ""),
                Note::with_text(NoteId::new(1700000000456.0), "b", ""),
                Note::with_text(NoteId::new(1800000000000.0), "c", ""),
            ],
            Vec::new(),
        )
    }

    #[test]
    fn test_resolve_exact() {
        let id = resolve_id("1700000000456", &store()).unwrap();
        assert_eq!(id, NoteId::new(1700000000456.0));
    }

    #[test]
    fn test_resolve_prefix() {
        let id = resolve_id("18", &store()).unwrap();
        assert_eq!(id, NoteId::new(1800000000000.0));
    }

    #[test]
    fn test_resolve_ambiguous_and_missing() {
        assert!(resolve_id("17", &store()).is_err());
        assert!(resolve_id("99", &store()).is_err());
    }

    #[test]
    fn test_resolve_ids_dedupes() {
        let ids = resolve_ids(&["18".to_string(), "1800000000000".to_string()], &store()).unwrap();
        assert_eq!(ids, vec![NoteId::new(1800000000000.0)]);
    }
}
