//! Tag command handlers

use std::time::Instant;

use anyhow::{bail, Result};

use dinduy_core::AppController;

use crate::commands::resolve_id;
use crate::output::Output;

/// List all tags with usage counts
pub fn list(app: &AppController, output: &Output) -> Result<()> {
    let tags = app.store().tags_with_counts();
    output.print_tags(&tags);
    Ok(())
}

/// Add a tag to the vocabulary
pub fn add(app: &mut AppController, label: &str, output: &Output) -> Result<()> {
    if !app.add_tag(label) {
        bail!("Tag '{}' is empty or already exists", label.trim());
    }
    output.success(&format!("Added tag: {}", label.trim()));
    Ok(())
}

/// Remove a tag from the vocabulary; notes keep it hidden
pub fn remove(app: &mut AppController, label: &str, output: &Output) -> Result<()> {
    if !app.remove_tag(label) {
        bail!("No tag named '{}'", label);
    }
    output.success(&format!("Removed tag: {}", label));
    Ok(())
}

/// Toggle a vocabulary tag on one note
pub fn toggle(app: &mut AppController, id: &str, label: &str, output: &Output) -> Result<()> {
    let id = resolve_id(id, app.store())?;
    if !app.store().has_tag(label) {
        bail!(
            "Unknown tag: '{}'. Add it first with `dinduy tags add {}`",
            label,
            label
        );
    }

    app.open_note(id, Instant::now());
    app.toggle_tag(label);
    let tagged = app.note(id)?.has_tag(label);
    app.close_note();

    if tagged {
        output.success(&format!("Tagged {} with {}", id, label));
    } else {
        output.success(&format!("Removed {} from {}", label, id));
    }
    Ok(())
}
