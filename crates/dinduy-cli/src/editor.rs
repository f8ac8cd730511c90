//! Terminal interaction
//!
//! Notes are edited in `$VISUAL`/`$EDITOR` as plain text: the first line
//! is the title, the rest after one blank line is the content.

use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::Command;

use anyhow::{bail, Context, Result};

const FALLBACK_EDITOR: &str = "vi";

/// Edit a note's title and content in an external editor
pub fn edit_note(title: &str, content: &str) -> Result<(String, String)> {
    let edited = edit_text(&compose_note(title, content))?;
    Ok(split_note(&edited))
}

/// Run the editor on a scratch file seeded with `initial` and return
/// what was saved
fn edit_text(initial: &str) -> Result<String> {
    let editor = editor_command();
    let scratch = scratch_path();

    fs::write(&scratch, initial)
        .with_context(|| format!("Failed to write scratch file {:?}", scratch))?;

    let result = Command::new(&editor)
        .arg(&scratch)
        .status()
        .with_context(|| format!("Could not start editor '{}'", editor))
        .and_then(|status| {
            if !status.success() {
                bail!("Editor '{}' exited with {}", editor, status);
            }
            fs::read_to_string(&scratch)
                .with_context(|| format!("Failed to read scratch file {:?}", scratch))
        });

    let _ = fs::remove_file(&scratch);
    result
}

/// Editor to launch: `$VISUAL`, then `$EDITOR`, then `vi`
fn editor_command() -> String {
    ["VISUAL", "EDITOR"]
        .into_iter()
        .filter_map(|var| env::var(var).ok())
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_EDITOR.to_string())
}

fn scratch_path() -> PathBuf {
    env::temp_dir().join(format!("dinduy-note-{}.txt", std::process::id()))
}

/// Text handed to the editor: title line, blank line, content
pub fn compose_note(title: &str, content: &str) -> String {
    format!("{}\n\n{}", title, content)
}

/// Split edited text back into title and content
///
/// The first line is the title; a single blank separator line after it
/// is dropped.
pub fn split_note(text: &str) -> (String, String) {
    let (title, rest) = text.split_once('\n').unwrap_or((text, ""));
    let content = rest.strip_prefix('\n').unwrap_or(rest);
    (
        title.trim_end_matches('\r').to_string(),
        content.trim_end_matches('\n').to_string(),
    )
}

/// Ask a yes/no question on the terminal
///
/// Without a TTY on stdin the answer is always no.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    read_answer(&mut io::stdin().lock())
}

fn read_answer(input: &mut impl BufRead) -> Result<bool> {
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
