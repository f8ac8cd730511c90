//! Core error handling
//!
//! State transitions never fail: no-op conditions are logged and ignored.
//! Errors exist only for operations that take external input, such as
//! importing a collection or looking a note up by a host-supplied id.

use thiserror::Error;

use crate::models::NoteId;

/// Errors surfaced by the core to the host
#[derive(Error, Debug)]
pub enum CoreError {
    /// Import payload is not valid JSON or has the wrong shape
    #[error("Invalid import payload: {0}")]
    InvalidImport(#[from] serde_json::Error),

    /// Import payload parsed but carries no `notes` field
    #[error("Import payload has no notes")]
    MissingNotes,

    /// Two notes in an import payload share an id
    #[error("Import payload has more than one note with id {0}")]
    DuplicateNoteId(NoteId),

    /// Collection replacement attempted while a note is being edited
    #[error("Cannot replace the collection while note {0} is open")]
    EditSessionActive(NoteId),

    /// A note id supplied by the host does not exist
    #[error("Note not found: {0}")]
    NoteNotFound(NoteId),
}

/// Convenience alias that pins the error type to [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Short message suitable for an alert dialog
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidImport(_) | Self::MissingNotes | Self::DuplicateNoteId(_) => {
                "Error.".to_string()
            }
            Self::EditSessionActive(_) => "Close the open note before restoring.".to_string(),
            Self::NoteNotFound(_) => "Note no longer exists".to_string(),
        }
    }

    /// Whether the error came from a bad import payload
    pub fn is_import_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidImport(_) | Self::MissingNotes | Self::DuplicateNoteId(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_notes_message() {
        let err = CoreError::MissingNotes;
        assert!(err.to_string().contains("no notes"));
        assert_eq!(err.user_message(), "Error.");
        assert!(err.is_import_error());
    }

    #[test]
    fn test_invalid_import_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(matches!(err, CoreError::InvalidImport(_)));
        assert!(err.is_import_error());
    }

    #[test]
    fn test_note_not_found_is_not_import_error() {
        let err = CoreError::NoteNotFound(NoteId::new(5.0));
        assert_eq!(err.to_string(), "Note not found: 5");
        assert!(!err.is_import_error());
    }
}
