//! Application controller
//!
//! `AppController` routes user intents (open, edit, select, delete,
//! duplicate, tag) into mutations on the [`NoteStore`] while keeping the
//! [`NavigationStack`] and [`SelectionController`] consistent.
//!
//! ## Back history
//!
//! Each overlay owns one entry in the host's back history. Opening an
//! overlay queues [`Effect::PushHistory`]. There are two ways to close:
//!
//! - [`AppController::go_back`]: the host delivers a back signal that
//!   already consumed its history entry (hardware back, browser back).
//! - Explicit dismiss (close button, confirm, cancel): the controller
//!   closes the overlay and queues [`Effect::HistoryBack`] so the host
//!   drops one entry without delivering it back as a signal.
//!
//! Either way the number of open overlays equals the number of pushed
//! history entries.
//!
//! ## Editing
//!
//! Opening a note starts an edit session with a fresh
//! [`UndoRedoBuffer`]. Every buffer change is written straight into the
//! note; there is no save step. Closing the note drops the buffer.

use std::time::{Duration, Instant};

use anyhow::Context;
use chrono::Local;
use tracing::{debug, info, warn};

use crate::appearance::{Appearance, ThemeKey};
use crate::config::Config;
use crate::error::{CoreError, Result};
use crate::export::{parse_import, CollectionSnapshot};
use crate::gesture::{is_swipe, LongPress, ScrollScheduler, SELECTION_VIBRATE};
use crate::models::{Note, NoteId, Snapshot};
use crate::navigation::{NavigationStack, Overlay, OverlayKind};
use crate::selection::{SelectionChange, SelectionController};
use crate::storage::{self, KeyValueStore};
use crate::store::NoteStore;
use crate::undo::UndoRedoBuffer;

/// Alert shown after a successful import
pub const RESTORED_MESSAGE: &str = "Restored!";

/// Outward action for the host to perform
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Push one entry onto the platform back history
    PushHistory(OverlayKind),
    /// Drop one platform history entry without signalling back
    HistoryBack,
    /// Scroll so the note sits `offset` below the viewport top
    ScrollTo { id: NoteId, offset: u32 },
    /// Haptic pulse
    Vibrate(Duration),
    /// User-visible message
    Alert(String),
}

/// Pending delete confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePrompt {
    pub targets: Vec<NoteId>,
    pub count: usize,
}

/// Open editor and its history
#[derive(Debug, Clone)]
struct EditSession {
    id: NoteId,
    buffer: UndoRedoBuffer,
}

/// Tunables taken from [`Config`]
#[derive(Debug, Clone)]
struct Settings {
    history_limit: usize,
    header_offset: u32,
    swipe_threshold: f64,
    copy_suffix: String,
}

impl From<&Config> for Settings {
    fn from(config: &Config) -> Self {
        Self {
            history_limit: config.history_limit,
            header_offset: config.header_offset,
            swipe_threshold: config.swipe_threshold,
            copy_suffix: config.copy_suffix.clone(),
        }
    }
}

/// View-navigation and editing-state engine
pub struct AppController {
    store: NoteStore,
    nav: NavigationStack,
    selection: SelectionController,
    editor: Option<EditSession>,
    kv: Box<dyn KeyValueStore>,
    appearance: Appearance,
    search_query: String,
    active_tag: Option<String>,
    long_press: LongPress,
    scroll: ScrollScheduler,
    settings: Settings,
    effects: Vec<Effect>,
}

impl AppController {
    /// Create a controller over an existing collection
    pub fn new(store: NoteStore, kv: Box<dyn KeyValueStore>, config: &Config) -> Self {
        let appearance = storage::load_appearance(kv.as_ref());
        Self {
            store,
            nav: NavigationStack::new(),
            selection: SelectionController::new(),
            editor: None,
            kv,
            appearance,
            search_query: String::new(),
            active_tag: None,
            long_press: LongPress::new(config.long_press()),
            scroll: ScrollScheduler::new(config.scroll_settle()),
            settings: Settings::from(config),
            effects: Vec::new(),
        }
    }

    /// Create a controller from the collection saved in `kv`
    ///
    /// Starts with an empty collection when nothing has been saved.
    pub fn load(kv: Box<dyn KeyValueStore>, config: &Config) -> anyhow::Result<Self> {
        let store = storage::load_collection(kv.as_ref())
            .context("Failed to load note collection")?
            .unwrap_or_default();
        Ok(Self::new(store, kv, config))
    }

    /// Write the collection back to the key-value store
    pub fn save(&mut self) -> anyhow::Result<()> {
        storage::save_collection(self.kv.as_mut(), &self.store)
    }

    // ==================== Queries ====================

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    pub fn navigation(&self) -> &NavigationStack {
        &self.nav
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn appearance(&self) -> Appearance {
        self.appearance
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn active_tag(&self) -> Option<&str> {
        self.active_tag.as_deref()
    }

    /// Note currently open in the editor
    pub fn active_note(&self) -> Option<NoteId> {
        self.editor.as_ref().map(|session| session.id)
    }

    /// Editable state at the undo cursor of the open note
    pub fn current_snapshot(&self) -> Option<&Snapshot> {
        self.editor.as_ref().map(|session| session.buffer.current())
    }

    pub fn can_undo(&self) -> bool {
        self.editor
            .as_ref()
            .is_some_and(|session| session.buffer.can_undo())
    }

    pub fn can_redo(&self) -> bool {
        self.editor
            .as_ref()
            .is_some_and(|session| session.buffer.can_redo())
    }

    /// The open delete confirmation, if any
    pub fn delete_prompt(&self) -> Option<DeletePrompt> {
        self.nav.delete_targets().map(|targets| DeletePrompt {
            targets: targets.to_vec(),
            count: targets.len(),
        })
    }

    /// Whether deletes currently skip confirmation
    pub fn skips_delete_confirm(&self) -> bool {
        storage::skip_delete_confirm(self.kv.as_ref())
    }

    /// Take every queued effect
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    // ==================== Navigation ====================

    /// Handle a back signal from the platform
    ///
    /// Closes exactly one overlay and returns its kind, or `None` when
    /// nothing was open.
    pub fn go_back(&mut self) -> Option<OverlayKind> {
        let Some(overlay) = self.nav.pop() else {
            debug!("back signal with nothing open");
            return None;
        };
        let kind = overlay.kind();
        self.after_close(overlay);
        Some(kind)
    }

    /// Close the top overlay as an explicit dismiss
    pub fn dismiss_top(&mut self) -> Option<OverlayKind> {
        let kind = self.nav.top()?.kind();
        self.dismiss(kind);
        Some(kind)
    }

    fn open_overlay(&mut self, overlay: Overlay) -> bool {
        let kind = overlay.kind();
        if !self.nav.push(overlay) {
            return false;
        }
        self.effects.push(Effect::PushHistory(kind));
        true
    }

    /// Close `kind` and drop its history entry
    fn dismiss(&mut self, kind: OverlayKind) -> bool {
        let Some(overlay) = self.nav.remove(kind) else {
            return false;
        };
        self.after_close(overlay);
        self.effects.push(Effect::HistoryBack);
        true
    }

    fn after_close(&mut self, overlay: Overlay) {
        match overlay {
            Overlay::Editor(id) => {
                debug!("closing editor for {}", id);
                self.editor = None;
                self.scroll.note_closed();
            }
            Overlay::Selection => self.selection.exit(),
            Overlay::Settings | Overlay::DeleteConfirm { .. } => {}
        }
    }

    // ==================== Editor ====================

    /// Tap on a note card: toggles selection in selection mode, opens otherwise
    pub fn tap_note(&mut self, id: NoteId, now: Instant) {
        if self.selection.is_active() {
            self.toggle_selection(id);
        } else {
            self.open_note(id, now);
        }
    }

    /// Open `id` in the editor
    ///
    /// Opening another note while one is open reuses the editor's history
    /// entry. Ignored in selection mode or for unknown ids.
    pub fn open_note(&mut self, id: NoteId, now: Instant) {
        if self.selection.is_active() {
            debug!("open ignored in selection mode");
            return;
        }
        let Some(note) = self.store.get(id) else {
            debug!("open ignored for unknown note {}", id);
            return;
        };
        if self.active_note() == Some(id) {
            return;
        }

        let buffer = UndoRedoBuffer::with_limit(note.snapshot(), self.settings.history_limit);
        let switched = self.nav.replace(Overlay::Editor(id));
        if !switched && !self.open_overlay(Overlay::Editor(id)) {
            return;
        }
        if switched {
            self.scroll.note_closed();
        }

        self.long_press.cancel();
        self.editor = Some(EditSession { id, buffer });
        self.scroll.note_opened(id, now);
    }

    /// Close the editor (close button)
    pub fn close_note(&mut self) {
        self.dismiss(OverlayKind::Editor);
    }

    /// Replace the open note's title
    pub fn edit_title(&mut self, title: impl Into<String>) {
        if let Some(current) = self.current_snapshot() {
            let next = Snapshot::new(title, current.content.clone());
            self.edit(next);
        }
    }

    /// Replace the open note's content
    pub fn edit_content(&mut self, content: impl Into<String>) {
        if let Some(current) = self.current_snapshot() {
            let next = Snapshot::new(current.title.clone(), content);
            self.edit(next);
        }
    }

    /// Record a new editable state for the open note
    pub fn edit(&mut self, state: Snapshot) {
        let Some(session) = self.editor.as_mut() else {
            debug!("edit ignored with no open note");
            return;
        };
        if session.buffer.push(state) {
            self.mirror_editor();
        }
    }

    pub fn undo(&mut self) {
        if let Some(session) = self.editor.as_mut() {
            if session.buffer.undo() {
                self.mirror_editor();
            }
        }
    }

    pub fn redo(&mut self) {
        if let Some(session) = self.editor.as_mut() {
            if session.buffer.redo() {
                self.mirror_editor();
            }
        }
    }

    /// Write the buffer's current state into the open note
    fn mirror_editor(&mut self) {
        if let Some(session) = &self.editor {
            if let Some(note) = self.store.get_mut(session.id) {
                note.apply_snapshot(session.buffer.current());
            }
        }
    }

    /// Toggle a vocabulary tag on the open note
    ///
    /// Labels missing from the vocabulary are ignored. Returns true when
    /// the note changed.
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        let Some(id) = self.active_note() else {
            return false;
        };
        if !self.store.has_tag(tag) {
            debug!("tag '{}' not in vocabulary, toggle ignored", tag);
            return false;
        }
        match self.store.get_mut(id) {
            Some(note) => {
                note.toggle_tag(tag);
                true
            }
            None => false,
        }
    }

    /// Create an empty note at the head and open it
    ///
    /// Clears the search query. Ignored in selection mode.
    pub fn new_note(&mut self, now: Instant) -> Option<NoteId> {
        if self.selection.is_active() {
            debug!("new note ignored in selection mode");
            return None;
        }
        let id = self.store.fresh_id();
        self.store.insert_front(Note::new(id));
        self.search_query.clear();
        self.open_note(id, now);
        info!("created note {}", id);
        Some(id)
    }

    // ==================== Gestures ====================

    /// Pointer pressed on a note card
    ///
    /// Starts the long-press timer unless a note is open, selection mode
    /// is already on, or the settings sheet covers the list.
    pub fn pointer_down(&mut self, id: NoteId, now: Instant) {
        if !self.accepts_long_press() {
            return;
        }
        self.long_press.start(id, now);
    }

    /// Long presses only reach the bare list
    fn accepts_long_press(&self) -> bool {
        !self.selection.is_active()
            && self.editor.is_none()
            && !self.nav.is_open(OverlayKind::Settings)
    }

    /// Pointer released or left the card
    pub fn pointer_up(&mut self) {
        self.long_press.cancel();
    }

    /// Horizontal drag started on a card
    pub fn drag_start(&mut self) {
        self.long_press.cancel();
    }

    /// Horizontal drag ended; a long enough swipe asks to delete the note
    pub fn drag_end(&mut self, id: NoteId, offset_x: f64) {
        if self.selection.is_active() || self.active_note() == Some(id) {
            return;
        }
        if is_swipe(offset_x, self.settings.swipe_threshold) {
            self.request_delete(vec![id]);
        }
    }

    /// Advance timers to `now`
    pub fn tick(&mut self, now: Instant) {
        if let Some(id) = self.long_press.poll(now) {
            if self.accepts_long_press() && self.store.contains(id) {
                self.enter_selection(id);
            }
        }

        if let Some(id) = self.scroll.poll(now) {
            if self.store.contains(id) {
                self.effects.push(Effect::ScrollTo {
                    id,
                    offset: self.settings.header_offset,
                });
            }
        }
    }

    // ==================== Selection ====================

    /// Turn selection mode on with `id` selected
    pub fn enter_selection(&mut self, id: NoteId) {
        if self.selection.is_active() || self.editor.is_some() {
            return;
        }
        if !self.open_overlay(Overlay::Selection) {
            return;
        }
        self.selection.enter(id);
        self.effects.push(Effect::Vibrate(SELECTION_VIBRATE));
    }

    /// Add or remove a note from the batch
    ///
    /// Deselecting the last note leaves selection mode like a cancel.
    pub fn toggle_selection(&mut self, id: NoteId) {
        if self.selection.toggle(id) == SelectionChange::Emptied {
            self.dismiss(OverlayKind::Selection);
        }
    }

    /// Cancel button on the selection toolbar
    pub fn cancel_selection(&mut self) {
        self.dismiss(OverlayKind::Selection);
    }

    /// Ask to delete the selected batch
    pub fn delete_selected(&mut self) {
        if !self.selection.is_active() {
            return;
        }
        let ids = self.selection.selected().to_vec();
        self.request_delete(ids);
    }

    /// Copy every selected note to the head of the collection
    ///
    /// Copies keep the collection order of their sources. Returns the new
    /// ids; selection mode is left afterwards.
    pub fn duplicate_selected(&mut self) -> Vec<NoteId> {
        if !self.selection.is_active() {
            return Vec::new();
        }

        let created = Local::now();
        let mut copies: Vec<Note> = Vec::new();
        let mut new_ids: Vec<NoteId> = Vec::new();
        for source in self.store.notes() {
            if !self.selection.is_selected(source.id) {
                continue;
            }
            let id = self.store.fresh_id_excluding(&new_ids);
            new_ids.push(id);
            copies.push(Note::duplicate_of(
                source,
                id,
                &self.settings.copy_suffix,
                created,
            ));
        }

        info!("duplicated {} notes", copies.len());
        self.store.insert_all_front(copies);
        self.dismiss(OverlayKind::Selection);
        new_ids
    }

    // ==================== Delete ====================

    /// Delete `ids`, asking first unless the user opted out
    pub fn request_delete(&mut self, ids: Vec<NoteId>) {
        if ids.is_empty() {
            return;
        }
        if self.skips_delete_confirm() {
            self.perform_delete(&ids);
            return;
        }
        self.open_overlay(Overlay::DeleteConfirm { targets: ids });
    }

    /// Confirm the open delete prompt
    ///
    /// With `dont_ask_again`, later deletes skip confirmation.
    pub fn confirm_delete(&mut self, dont_ask_again: bool) -> usize {
        let Some(targets) = self.nav.delete_targets().map(<[NoteId]>::to_vec) else {
            debug!("confirm ignored with no delete prompt");
            return 0;
        };
        if dont_ask_again {
            if let Err(e) = storage::set_skip_delete_confirm(self.kv.as_mut()) {
                warn!("Failed to save delete confirmation preference: {:#}", e);
            }
        }
        self.perform_delete(&targets)
    }

    /// Dismiss the delete prompt without deleting
    pub fn cancel_delete(&mut self) {
        self.dismiss(OverlayKind::DeleteConfirm);
    }

    fn perform_delete(&mut self, ids: &[NoteId]) -> usize {
        let removed = self.store.remove_many(ids).len();
        info!("deleted {} notes", removed);

        self.dismiss(OverlayKind::DeleteConfirm);
        if self.selection.is_active() {
            self.dismiss(OverlayKind::Selection);
        }
        if self.active_note().is_some_and(|id| ids.contains(&id)) {
            self.dismiss(OverlayKind::Editor);
        }
        removed
    }

    // ==================== Settings ====================

    pub fn open_settings(&mut self) {
        self.open_overlay(Overlay::Settings);
    }

    pub fn close_settings(&mut self) {
        self.dismiss(OverlayKind::Settings);
    }

    /// Add a label to the tag vocabulary
    pub fn add_tag(&mut self, tag: &str) -> bool {
        self.store.add_tag(tag)
    }

    /// Remove a label from the vocabulary; notes keep it but hide it
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        if self.active_tag.as_deref() == Some(tag) {
            self.active_tag = None;
        }
        self.store.remove_tag(tag)
    }

    pub fn toggle_dark(&mut self) {
        self.appearance.toggle_dark();
        self.persist_appearance();
    }

    pub fn set_theme(&mut self, theme: ThemeKey) {
        self.appearance.set_theme(theme);
        self.persist_appearance();
    }

    fn persist_appearance(&mut self) {
        if let Err(e) = storage::save_appearance(self.kv.as_mut(), &self.appearance) {
            warn!("Failed to save appearance: {:#}", e);
        }
    }

    /// Export the whole collection as JSON
    pub fn export_json(&self) -> Result<String> {
        CollectionSnapshot::from_store(&self.store).to_json()
    }

    /// Replace the whole collection from an export
    ///
    /// On failure an alert is queued and nothing changes. Refused while a
    /// note is open so an edit session never spans a replacement.
    pub fn import_collection(&mut self, json: &str) -> Result<usize> {
        match self.try_import(json) {
            Ok(count) => {
                self.effects.push(Effect::Alert(RESTORED_MESSAGE.to_string()));
                Ok(count)
            }
            Err(e) => {
                warn!("Import rejected: {}", e);
                self.effects.push(Effect::Alert(e.user_message()));
                Err(e)
            }
        }
    }

    fn try_import(&mut self, json: &str) -> Result<usize> {
        if let Some(id) = self.active_note() {
            return Err(CoreError::EditSessionActive(id));
        }
        let payload = parse_import(json)?;
        let count = payload.notes.len();

        // Pending targets refer to the collection being replaced
        self.dismiss(OverlayKind::DeleteConfirm);
        self.store.replace(payload.notes, payload.all_tags);
        info!("imported {} notes", count);

        let store = &self.store;
        self.selection.retain(|id| store.contains(id));
        if !self.selection.is_active() {
            self.dismiss(OverlayKind::Selection);
        }
        if let Some(tag) = &self.active_tag {
            if !self.store.has_tag(tag) {
                self.active_tag = None;
            }
        }
        Ok(count)
    }

    // ==================== Search ====================

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn clear_search(&mut self) {
        self.search_query.clear();
    }

    /// Filter by a vocabulary tag, or show all with `None`
    pub fn set_active_tag(&mut self, tag: Option<String>) {
        match tag {
            Some(tag) if !self.store.has_tag(&tag) => {
                debug!("unknown filter tag '{}' ignored", tag);
            }
            tag => self.active_tag = tag,
        }
    }

    /// Look a note up by id
    pub fn note(&self, id: NoteId) -> Result<&Note> {
        self.store.get(id).ok_or(CoreError::NoteNotFound(id))
    }
}
