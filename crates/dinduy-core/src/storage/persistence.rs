//! Typed access to persisted values
//!
//! Keys:
//! - `dinduy_collection` - the note collection in export format
//! - `dinduy_skip_delete_confirm` - "true" once the user opted out of
//!   delete confirmation
//! - `dinduy_appearance` - theme and dark mode

use anyhow::{Context, Result};
use tracing::warn;

use crate::appearance::Appearance;
use crate::export::{parse_import, CollectionSnapshot};
use crate::storage::kv::KeyValueStore;
use crate::store::NoteStore;

pub const COLLECTION_KEY: &str = "dinduy_collection";
pub const SKIP_DELETE_CONFIRM_KEY: &str = "dinduy_skip_delete_confirm";
pub const APPEARANCE_KEY: &str = "dinduy_appearance";

/// Load the stored collection; `None` if nothing has been saved yet
pub fn load_collection(kv: &dyn KeyValueStore) -> Result<Option<NoteStore>> {
    let Some(json) = kv.get(COLLECTION_KEY)? else {
        return Ok(None);
    };
    let payload = parse_import(&json).context("Stored collection is invalid")?;
    Ok(Some(NoteStore::with_contents(
        payload.notes,
        payload.all_tags.unwrap_or_default(),
    )))
}

/// Save the whole collection
pub fn save_collection(kv: &mut dyn KeyValueStore, store: &NoteStore) -> Result<()> {
    let json = CollectionSnapshot::from_store(store)
        .to_json()
        .context("Failed to serialize collection")?;
    kv.set(COLLECTION_KEY, &json)
}

/// Whether delete confirmation should be skipped
///
/// Read failures are logged and treated as "ask".
pub fn skip_delete_confirm(kv: &dyn KeyValueStore) -> bool {
    match kv.get(SKIP_DELETE_CONFIRM_KEY) {
        Ok(value) => value.as_deref() == Some("true"),
        Err(e) => {
            warn!("Failed to read delete confirmation preference: {:#}", e);
            false
        }
    }
}

/// Record that delete confirmation should be skipped from now on
pub fn set_skip_delete_confirm(kv: &mut dyn KeyValueStore) -> Result<()> {
    kv.set(SKIP_DELETE_CONFIRM_KEY, "true")
}

/// Load appearance, falling back to defaults when absent or unreadable
pub fn load_appearance(kv: &dyn KeyValueStore) -> Appearance {
    let stored = match kv.get(APPEARANCE_KEY) {
        Ok(stored) => stored,
        Err(e) => {
            warn!("Failed to read appearance: {:#}", e);
            return Appearance::default();
        }
    };
    stored
        .and_then(|json| match serde_json::from_str(&json) {
            Ok(appearance) => Some(appearance),
            Err(e) => {
                warn!("Ignoring invalid stored appearance: {}", e);
                None
            }
        })
        .unwrap_or_default()
}

/// Save appearance
pub fn save_appearance(kv: &mut dyn KeyValueStore, appearance: &Appearance) -> Result<()> {
    let json = serde_json::to_string(appearance).context("Failed to serialize appearance")?;
    kv.set(APPEARANCE_KEY, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appearance::ThemeKey;
    use crate::models::{Note, NoteId};
    use crate::storage::kv::MemoryStore;

    #[test]
    fn test_collection_roundtrip() {
        let mut kv = MemoryStore::new();
        assert!(load_collection(&kv).unwrap().is_none());

        let store = NoteStore::with_contents(
            vec![Note::with_text(NoteId::new(1.0), "t", "c")],
            vec!["Misc".into()],
        );
        save_collection(&mut kv, &store).unwrap();

        let loaded = load_collection(&kv).unwrap().unwrap();
        assert_eq!(loaded.notes(), store.notes());
        assert_eq!(loaded.tags(), store.tags());
    }

    #[test]
    fn test_invalid_stored_collection() {
        let mut kv = MemoryStore::new();
        kv.set(COLLECTION_KEY, "{\"allTags\": []}").unwrap();
        assert!(load_collection(&kv).is_err());
    }

    #[test]
    fn test_skip_delete_confirm_flag() {
        let mut kv = MemoryStore::new();
        assert!(!skip_delete_confirm(&kv));
        set_skip_delete_confirm(&mut kv).unwrap();
        assert!(skip_delete_confirm(&kv));

        kv.set(SKIP_DELETE_CONFIRM_KEY, "false").unwrap();
        assert!(!skip_delete_confirm(&kv));
    }

    #[test]
    fn test_appearance_roundtrip() {
        let mut kv = MemoryStore::new();
        assert_eq!(load_appearance(&kv), Appearance::default());

        let appearance = Appearance {
            theme: ThemeKey::Mint,
            dark: true,
        };
        save_appearance(&mut kv, &appearance).unwrap();
        assert_eq!(load_appearance(&kv), appearance);

        kv.set(APPEARANCE_KEY, "garbage").unwrap();
        assert_eq!(load_appearance(&kv), Appearance::default());
    }
}
