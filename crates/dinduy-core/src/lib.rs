//! Dinduy Core Library
//!
//! This crate provides the view-navigation and editing-state engine for
//! Dinduy, a local-first note-taking app with tags, batch selection and
//! per-note undo history.
//!
//! # Architecture
//!
//! - **AppController**: routes user intents into store mutations and keeps
//!   overlays, selection and the open editor consistent
//! - **Effects**: outward actions (history, scroll, haptics, alerts) are
//!   queued for the host to drain
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let kv = FileStore::open(config.store_path())?;
//! let mut app = AppController::load(Box::new(kv), &config)?;
//!
//! let id = app.new_note(Instant::now());
//! app.edit_title("Groceries");
//! app.close_note();
//! app.save()?;
//! ```
//!
//! # Modules
//!
//! - `app`: Application controller (main entry point)
//! - `store`: Note collection and tag vocabulary
//! - `undo`: Bounded undo/redo history
//! - `navigation`: Overlay stack mirroring back history
//! - `selection`: Batch selection mode
//! - `gesture`: Long-press, scroll and swipe timing
//! - `export`: Backup format
//! - `storage`: Key-value persistence
//! - `config`: Application configuration

pub mod app;
pub mod appearance;
pub mod config;
pub mod error;
pub mod export;
pub mod gesture;
pub mod models;
pub mod navigation;
pub mod selection;
pub mod storage;
pub mod store;
pub mod undo;

pub use app::{AppController, DeletePrompt, Effect};
pub use appearance::{Appearance, ThemeKey};
pub use config::Config;
pub use error::{CoreError, Result};
pub use export::{export_file_name, parse_import, CollectionSnapshot, ImportPayload};
pub use models::{Note, NoteId, Snapshot};
pub use navigation::{NavigationStack, Overlay, OverlayKind};
pub use selection::{SelectionChange, SelectionController};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::NoteStore;
pub use undo::UndoRedoBuffer;
