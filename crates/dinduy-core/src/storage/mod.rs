//! Storage layer
//!
//! The note collection and user preferences live in a string key-value
//! store supplied by the host. Values are JSON.

pub mod kv;
pub mod persistence;

pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use persistence::{
    load_appearance, load_collection, save_appearance, save_collection,
    set_skip_delete_confirm, skip_delete_confirm,
};
