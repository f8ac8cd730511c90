//! Backup export and restore

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use dinduy_core::{export_file_name, AppController, Effect};

use crate::output::Output;

/// Write the whole collection to a JSON backup
pub fn export(app: &AppController, path: Option<PathBuf>, output: &Output) -> Result<()> {
    let path = path.unwrap_or_else(|| PathBuf::from(export_file_name(Local::now().date_naive())));
    let json = app.export_json().context("Failed to serialize notes")?;

    fs::write(&path, json).with_context(|| format!("Failed to write backup: {:?}", path))?;

    output.success(&format!(
        "Exported {} note(s) to {}",
        app.store().len(),
        path.display()
    ));
    Ok(())
}

/// Replace the collection from a JSON backup
pub fn import(app: &mut AppController, path: &Path, output: &Output) -> Result<()> {
    let json =
        fs::read_to_string(path).with_context(|| format!("Failed to read backup: {:?}", path))?;

    let result = app.import_collection(&json);
    for effect in app.drain_effects() {
        if let Effect::Alert(message) = effect {
            output.message(&message);
        }
    }

    let count = result.with_context(|| format!("Failed to import {:?}", path))?;
    output.success(&format!("Imported {} note(s)", count));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use dinduy_core::{Config, MemoryStore, Note, NoteId, NoteStore};

    fn app_with(notes: Vec<Note>) -> AppController {
        AppController::new(
            NoteStore::with_contents(notes, vec!["Kuliah".into()]),
            Box::new(MemoryStore::new()),
            &Config::default(),
        )
    }

    #[test]
    fn test_export_then_import_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("backup.json");
        let output = Output::new(OutputFormat::Quiet);

        let source = app_with(vec![Note::with_text(NoteId::new(3.0), "Tugas", "Bab 2")]);
        export(&source, Some(path.clone()), &output).unwrap();

        let mut target = app_with(Vec::new());
        import(&mut target, &path, &output).unwrap();
        assert_eq!(target.store().notes(), source.store().notes());
    }

    #[test]
    fn test_import_bad_file_keeps_notes() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("backup.json");
        fs::write(&path, r#"{"version": "19.0"}"#).unwrap();
        let output = Output::new(OutputFormat::Quiet);

        let mut app = app_with(vec![Note::with_text(NoteId::new(1.0), "keep", "")]);
        assert!(import(&mut app, &path, &output).is_err());
        assert_eq!(app.store().len(), 1);
    }

    #[test]
    fn test_import_missing_file() {
        let output = Output::new(OutputFormat::Quiet);
        let mut app = app_with(Vec::new());
        assert!(import(&mut app, Path::new("/definitely/not/here.json"), &output).is_err());
    }
}
