//! Dinduy CLI
//!
//! Command-line interface for Dinduy - notes with tags, batch selection
//! and undo history.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dinduy_core::{AppController, Config, FileStore};

mod commands;
mod editor;
mod output;
mod shell;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "dinduy")]
#[command(about = "Dinduy - Notes with tags, batch selection and undo")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session (default)
    Shell,
    /// List notes
    #[command(alias = "ls")]
    List {
        /// Only notes carrying this tag
        #[arg(short, long)]
        tag: Option<String>,
    },
    /// Show a note
    Show {
        /// Note ID (full or prefix)
        id: String,
    },
    /// Create a new note
    #[command(alias = "add")]
    New {
        /// Note title
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// Note content
        #[arg(short, long)]
        content: Option<String>,
        /// Tags to add (must exist in the vocabulary)
        #[arg(short, long)]
        tag: Vec<String>,
    },
    /// Edit a note (opens $EDITOR without -T/-c)
    Edit {
        /// Note ID (full or prefix)
        id: String,
        /// New title
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// New content
        #[arg(short, long)]
        content: Option<String>,
    },
    /// Delete notes
    #[command(alias = "rm")]
    Delete {
        /// Note IDs (full or prefix)
        #[arg(required = true)]
        ids: Vec<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
        /// Never ask for confirmation again
        #[arg(long)]
        dont_ask: bool,
    },
    /// Duplicate notes
    #[command(alias = "dup")]
    Duplicate {
        /// Note IDs (full or prefix)
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Toggle a tag on a note
    Tag {
        /// Note ID (full or prefix)
        id: String,
        /// Tag label
        label: String,
    },
    /// Manage the tag vocabulary
    Tags {
        #[command(subcommand)]
        command: Option<TagCommands>,
    },
    /// Export all notes to a JSON backup
    Export {
        /// Output file (defaults to dinduy-v19-<date>.json)
        path: Option<PathBuf>,
    },
    /// Replace all notes from a JSON backup
    Import {
        /// Backup file
        path: PathBuf,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum TagCommands {
    /// List tags with usage counts
    #[command(alias = "ls")]
    List,
    /// Add a tag to the vocabulary
    Add { label: String },
    /// Remove a tag from the vocabulary
    #[command(alias = "remove")]
    Rm { label: String },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands don't need the note store
    if let Some(Commands::Config { command }) = &cli.command {
        return match command {
            Some(ConfigCommands::Show) | None => commands::config::show(config_path, &output),
            Some(ConfigCommands::Set { key, value }) => {
                commands::config::set(key, value, config_path, &output)
            }
        };
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    init_logging(&config);

    let kv = FileStore::open(config.store_path()).context("Failed to open note store")?;
    let mut app = AppController::load(Box::new(kv), &config)?;

    let command = cli.command.unwrap_or(Commands::Shell);
    let is_write = !matches!(
        command,
        Commands::List { .. }
            | Commands::Show { .. }
            | Commands::Export { .. }
            | Commands::Shell
            | Commands::Tags {
                command: Some(TagCommands::List) | None
            }
    );

    match command {
        Commands::Shell => return shell::run(&mut app, &output),
        Commands::List { tag } => commands::note::list(&app, tag, &output)?,
        Commands::Show { id } => commands::note::show(&app, &id, &output)?,
        Commands::New {
            title,
            content,
            tag,
        } => commands::note::create(&mut app, title, content, tag, &output)?,
        Commands::Edit { id, title, content } => {
            commands::note::edit(&mut app, &id, title, content, &output)?
        }
        Commands::Delete { ids, yes, dont_ask } => {
            commands::note::delete(&mut app, &ids, yes, dont_ask, &output)?
        }
        Commands::Duplicate { ids } => commands::note::duplicate(&mut app, &ids, &output)?,
        Commands::Tag { id, label } => commands::tag::toggle(&mut app, &id, &label, &output)?,
        Commands::Tags { command } => match command {
            Some(TagCommands::List) | None => commands::tag::list(&app, &output)?,
            Some(TagCommands::Add { label }) => commands::tag::add(&mut app, &label, &output)?,
            Some(TagCommands::Rm { label }) => commands::tag::remove(&mut app, &label, &output)?,
        },
        Commands::Export { path } => commands::transfer::export(&app, path, &output)?,
        Commands::Import { path } => commands::transfer::import(&mut app, &path, &output)?,
        Commands::Config { .. } => unreachable!(), // Handled above
    }

    if is_write {
        app.save().context("Failed to save notes")?;
    }

    Ok(())
}

/// Initialize file logging
///
/// Only initializes if DINDUY_LOG environment variable is set.
/// Logs to file (config.log_file or default {data_dir}/debug.log).
fn init_logging(config: &Config) {
    let Ok(log_level) = std::env::var("DINDUY_LOG") else {
        return;
    };

    let log_path = config.log_path();

    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!(
        "dinduy_core={},dinduy_cli={}",
        log_level, log_level
    ));

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("logging initialized to {:?}", log_path);
}
