//! Note command handlers
//!
//! Each handler drives the same `AppController` flow the interactive
//! session uses: open, edit, close; select, act.

use std::time::Instant;

use anyhow::{anyhow, bail, Context, Result};

use dinduy_core::{AppController, NoteId, Snapshot};

use crate::commands::{resolve_id, resolve_ids};
use crate::editor::{confirm, edit_note};
use crate::output::{NoteView, Output};

/// List notes, optionally only those carrying `tag`
pub fn list(app: &AppController, tag: Option<String>, output: &Output) -> Result<()> {
    let store = app.store();
    let views: Vec<_> = store
        .notes()
        .iter()
        .filter(|note| tag.as_deref().map_or(true, |t| note.has_tag(t)))
        .map(|note| NoteView::new(note, store.visible_tags(note)))
        .collect();

    output.print_notes(&views);
    Ok(())
}

/// Show a single note
pub fn show(app: &AppController, id: &str, output: &Output) -> Result<()> {
    let id = resolve_id(id, app.store())?;
    print_note(app, id, output)
}

/// Create a new note
pub fn create(
    app: &mut AppController,
    title: Option<String>,
    content: Option<String>,
    tags: Vec<String>,
    output: &Output,
) -> Result<()> {
    for tag in &tags {
        if !app.store().has_tag(tag) {
            bail!(
                "Unknown tag: '{}'. Add it first with `dinduy tags add {}`",
                tag,
                tag
            );
        }
    }

    let id = app
        .new_note(Instant::now())
        .ok_or_else(|| anyhow!("Cannot create a note right now"))?;

    if let Some(title) = title {
        app.edit_title(title);
    }
    if let Some(content) = content {
        app.edit_content(content);
    }
    for tag in &tags {
        app.toggle_tag(tag);
    }
    app.close_note();

    output.success(&format!("Created note: {}", id));
    print_note(app, id, output)
}

/// Edit a note's title and content
pub fn edit(
    app: &mut AppController,
    id: &str,
    title: Option<String>,
    content: Option<String>,
    output: &Output,
) -> Result<()> {
    let id = resolve_id(id, app.store())?;
    app.open_note(id, Instant::now());

    if title.is_none() && content.is_none() {
        let current = app
            .current_snapshot()
            .cloned()
            .ok_or_else(|| anyhow!("Failed to open note {}", id))?;
        let (title, content) =
            edit_note(&current.title, &current.content).context("Failed to edit note")?;
        app.edit(Snapshot::new(title, content));
    } else {
        if let Some(title) = title {
            app.edit_title(title);
        }
        if let Some(content) = content {
            app.edit_content(content);
        }
    }

    let changed = app.can_undo();
    app.close_note();

    if changed {
        output.success(&format!("Updated note: {}", id));
    } else {
        output.message("No changes made.");
    }
    Ok(())
}

/// Delete notes, asking first unless confirmation is turned off
pub fn delete(
    app: &mut AppController,
    ids: &[String],
    yes: bool,
    dont_ask: bool,
    output: &Output,
) -> Result<()> {
    let ids = resolve_ids(ids, app.store())?;
    let before = app.store().len();

    app.request_delete(ids);

    if let Some(prompt) = app.delete_prompt() {
        if output.should_prompt() && !yes {
            for id in &prompt.targets {
                if let Some(note) = app.store().get(*id) {
                    println!("Delete note: {} - {}", note.id, note.title);
                }
            }
            if !confirm(&format!("Delete {} note(s)?", prompt.count))? {
                app.cancel_delete();
                println!("Cancelled.");
                return Ok(());
            }
        }
        app.confirm_delete(dont_ask);
    }

    let deleted = before - app.store().len();
    output.success(&format!("Deleted {} note(s)", deleted));
    Ok(())
}

/// Duplicate notes; copies go to the top of the list
pub fn duplicate(app: &mut AppController, ids: &[String], output: &Output) -> Result<()> {
    let ids = resolve_ids(ids, app.store())?;
    let Some((first, rest)) = ids.split_first() else {
        bail!("No notes given");
    };

    app.enter_selection(*first);
    for id in rest {
        app.toggle_selection(*id);
    }
    let copies = app.duplicate_selected();

    output.success(&format!("Duplicated {} note(s)", copies.len()));
    for id in copies {
        print_note(app, id, output)?;
    }
    Ok(())
}

fn print_note(app: &AppController, id: NoteId, output: &Output) -> Result<()> {
    let store = app.store();
    let note = app.note(id)?;
    output.print_note(&NoteView::new(note, store.visible_tags(note)));
    Ok(())
}
