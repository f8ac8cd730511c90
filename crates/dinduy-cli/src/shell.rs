//! Interactive session
//!
//! The shell stands in for the platform: it owns the back history the
//! controller's effects push and pop, delivers `back` as a platform back
//! signal, and advances gesture timers with the wall clock before every
//! command. Holding a note is `hold <id>`, waiting, then `release`.

use std::io::{self, BufRead, Write};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use tracing::debug;

use dinduy_core::{AppController, Effect, NoteId};

use crate::commands::resolve_id;
use crate::output::{display_title, truncate_line, Output};

const HELP: &str = "\
Commands:
  list                 list notes
  open <id>            open a note (toggles it in selection mode)
  close                close the open note
  back                 platform back
  settings             open settings
  title <text>         set the open note's title
  content <text>       set the open note's content
  undo | redo          step through the open note's history
  tag <label>          toggle a tag on the open note
  hold <id>            press and hold a note
  release              release the press
  swipe <id> <dx>      drag a note sideways
  select <id>          enter selection or toggle a note in it
  dup                  duplicate selected notes
  del                  delete selected notes or the open note
  confirm [--dont-ask] confirm the delete prompt
  cancel               dismiss the top overlay
  new                  create and open a note
  status               show overlays and selection
  quit                 save and exit";

/// Whether the session should keep reading commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Line-command driver around an `AppController`
pub struct Shell<'a> {
    app: &'a mut AppController,
    /// Platform back-history entries pushed by the controller
    history: usize,
    lines: Vec<String>,
}

impl<'a> Shell<'a> {
    pub fn new(app: &'a mut AppController) -> Self {
        Self {
            app,
            history: 0,
            lines: Vec::new(),
        }
    }

    /// Depth of the simulated platform history
    pub fn history(&self) -> usize {
        self.history
    }

    /// Take the lines produced since the last call
    pub fn take_lines(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }

    /// Run one command line at time `now`
    pub fn execute(&mut self, line: &str, now: Instant) -> Result<Flow> {
        self.app.tick(now);
        self.apply_effects();

        let line = line.trim();
        let (cmd, arg) = match line.split_once(char::is_whitespace) {
            Some((cmd, arg)) => (cmd, arg.trim()),
            None => (line, ""),
        };
        debug!("shell command '{}'", cmd);

        let flow = self.dispatch(cmd, arg, now);
        self.apply_effects();
        flow
    }

    fn dispatch(&mut self, cmd: &str, arg: &str, now: Instant) -> Result<Flow> {
        match cmd {
            "" => {}
            "help" | "?" => self.say(HELP),
            "list" | "ls" => self.list(),
            "open" => {
                let id = self.resolve(arg)?;
                self.app.tap_note(id, now);
            }
            "close" => self.app.close_note(),
            "back" => self.back(),
            "settings" => self.app.open_settings(),
            "title" => {
                self.require_open_note()?;
                self.app.edit_title(arg);
            }
            "content" => {
                self.require_open_note()?;
                self.app.edit_content(arg.replace("\\n", "\n"));
            }
            "undo" => self.app.undo(),
            "redo" => self.app.redo(),
            "tag" => {
                self.require_open_note()?;
                if !self.app.toggle_tag(arg) {
                    bail!("Unknown tag: '{}'", arg);
                }
            }
            "hold" => {
                let id = self.resolve(arg)?;
                self.app.pointer_down(id, now);
            }
            "release" => self.app.pointer_up(),
            "swipe" => {
                let (id, dx) = arg
                    .split_once(char::is_whitespace)
                    .context("Usage: swipe <id> <dx>")?;
                let id = self.resolve(id)?;
                let dx: f64 = dx.trim().parse().context("Invalid drag offset")?;
                self.app.drag_start();
                self.app.drag_end(id, dx);
            }
            "select" => {
                let id = self.resolve(arg)?;
                if self.app.selection().is_active() {
                    self.app.toggle_selection(id);
                } else {
                    self.app.enter_selection(id);
                }
            }
            "dup" => {
                let copies = self.app.duplicate_selected();
                self.say(&format!("Duplicated {} note(s)", copies.len()));
            }
            "del" => {
                if self.app.selection().is_active() {
                    self.app.delete_selected();
                } else if let Some(id) = self.app.active_note() {
                    self.app.request_delete(vec![id]);
                } else {
                    bail!("Nothing selected");
                }
                if let Some(prompt) = self.app.delete_prompt() {
                    self.say(&format!(
                        "Delete {} note(s)? (confirm / cancel)",
                        prompt.count
                    ));
                }
            }
            "confirm" => {
                let deleted = self.app.confirm_delete(arg == "--dont-ask");
                self.say(&format!("Deleted {} note(s)", deleted));
            }
            "cancel" => {
                self.app.dismiss_top();
            }
            "new" => {
                if let Some(id) = self.app.new_note(now) {
                    self.say(&format!("Created note {}", id));
                }
            }
            "status" => self.status(),
            "quit" | "exit" => return Ok(Flow::Quit),
            _ => bail!("Unknown command: '{}'. Type 'help' for commands.", cmd),
        }
        Ok(Flow::Continue)
    }

    /// Deliver a platform back: consume one history entry, then notify
    fn back(&mut self) {
        if self.history == 0 {
            self.say("Nothing to go back to.");
            return;
        }
        self.history -= 1;
        if let Some(kind) = self.app.go_back() {
            self.say(&format!("Closed {}", kind));
        }
    }

    fn apply_effects(&mut self) {
        for effect in self.app.drain_effects() {
            match effect {
                Effect::PushHistory(kind) => {
                    self.history += 1;
                    debug!("history push {} (depth {})", kind, self.history);
                }
                Effect::HistoryBack => {
                    self.history = self.history.saturating_sub(1);
                    debug!("history back (depth {})", self.history);
                }
                Effect::ScrollTo { id, offset } => {
                    self.say(&format!("(scrolled to {} at {}px)", id, offset));
                }
                Effect::Vibrate(duration) => {
                    self.say(&format!("(bzz {}ms)", duration.as_millis()));
                }
                Effect::Alert(message) => self.say(&format!("! {}", message)),
            }
        }
    }

    fn list(&mut self) {
        let store = self.app.store();
        let open = self.app.active_note();
        let selection = self.app.selection();
        let mut lines = Vec::with_capacity(store.len());
        for note in store.notes() {
            let marker = if open == Some(note.id) {
                ">"
            } else if selection.is_selected(note.id) {
                "*"
            } else {
                " "
            };
            let tags = store.visible_tags(note);
            let tags = if tags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", tags.join(", "))
            };
            lines.push(format!(
                "{} {} | {}{} | {}",
                marker,
                note.id,
                display_title(&note.title),
                tags,
                truncate_line(&note.content, 40)
            ));
        }
        if lines.is_empty() {
            lines.push("No notes.".to_string());
        }
        self.lines.extend(lines);
    }

    fn status(&mut self) {
        let overlays: Vec<String> = self
            .app
            .navigation()
            .iter()
            .map(|o| o.kind().to_string())
            .collect();
        let overlays = if overlays.is_empty() {
            "(none)".to_string()
        } else {
            overlays.join(" > ")
        };
        let open = match self.app.active_note() {
            Some(id) => format!(
                "{} (undo: {}, redo: {})",
                id,
                yes_no(self.app.can_undo()),
                yes_no(self.app.can_redo())
            ),
            None => "(none)".to_string(),
        };
        let selection = if self.app.selection().is_active() {
            format!("{} selected", self.app.selection().count())
        } else {
            "off".to_string()
        };

        let lines = vec![
            format!("Overlays:  {}", overlays),
            format!("History:   {}", self.history),
            format!("Open note: {}", open),
            format!("Selection: {}", selection),
            format!("Appearance: {}", self.app.appearance().theme),
        ];
        self.lines.extend(lines);
    }

    fn resolve(&self, arg: &str) -> Result<NoteId> {
        if arg.is_empty() {
            bail!("Missing note ID");
        }
        resolve_id(arg, self.app.store())
    }

    fn require_open_note(&self) -> Result<()> {
        if self.app.active_note().is_none() {
            bail!("No note open. Use 'open <id>' first.");
        }
        Ok(())
    }

    fn say(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// Run the interactive session until `quit` or end of input
pub fn run(app: &mut AppController, output: &Output) -> Result<()> {
    let interactive = atty::is(atty::Stream::Stdin);
    if interactive && !output.is_quiet() {
        println!("dinduy shell. Type 'help' for commands.");
    }

    let mut shell = Shell::new(app);
    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        if interactive {
            print!("dinduy> ");
            io::stdout().flush()?;
        }

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let flow = shell.execute(&line, Instant::now());
        for line in shell.take_lines() {
            output.message(&line);
        }
        match flow {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => eprintln!("Error: {:#}", e),
        }
    }

    shell.app.save().context("Failed to save notes")
}
