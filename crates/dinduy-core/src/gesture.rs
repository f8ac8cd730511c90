//! Gesture timers
//!
//! The host feeds pointer events and polls with the current time; the
//! timers hold deadlines rather than threads, so they can be driven from
//! a single event loop and tested with synthetic instants.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::models::NoteId;

/// Default hold time before a press enters selection mode
pub const LONG_PRESS: Duration = Duration::from_millis(500);

/// Default delay before scrolling an opened note into place
pub const SCROLL_SETTLE: Duration = Duration::from_millis(400);

/// Haptic pulse length on entering selection mode
pub const SELECTION_VIBRATE: Duration = Duration::from_millis(50);

/// Long-press detector for a single pointer
#[derive(Debug, Clone)]
pub struct LongPress {
    threshold: Duration,
    pending: Option<(NoteId, Instant)>,
}

impl LongPress {
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            pending: None,
        }
    }

    /// Start timing a press on `id`, replacing any earlier press
    pub fn start(&mut self, id: NoteId, now: Instant) {
        self.pending = Some((id, now + self.threshold));
    }

    /// Cancel on pointer-up, pointer-leave or drag-start
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            debug!("long press cancelled");
        }
    }

    /// Returns the pressed note once the hold has lasted long enough
    pub fn poll(&mut self, now: Instant) -> Option<NoteId> {
        match self.pending {
            Some((id, deadline)) if now >= deadline => {
                self.pending = None;
                debug!("long press fired on {}", id);
                Some(id)
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Default for LongPress {
    fn default() -> Self {
        Self::new(LONG_PRESS)
    }
}

/// One-shot scroll after a note opens
///
/// Fires once per open; re-renders of the same open note never re-arm it
/// because the last opened id is remembered until the note closes.
#[derive(Debug, Clone)]
pub struct ScrollScheduler {
    settle: Duration,
    last_scrolled: Option<NoteId>,
    pending: Option<(NoteId, Instant)>,
}

impl ScrollScheduler {
    pub fn new(settle: Duration) -> Self {
        Self {
            settle,
            last_scrolled: None,
            pending: None,
        }
    }

    /// Arm the scroll for `id` unless it was already armed for this open
    pub fn note_opened(&mut self, id: NoteId, now: Instant) {
        if self.last_scrolled == Some(id) {
            return;
        }
        self.pending = Some((id, now + self.settle));
        self.last_scrolled = Some(id);
    }

    /// Drop any pending scroll and forget the last opened note so the
    /// next open scrolls again
    pub fn note_closed(&mut self) {
        self.last_scrolled = None;
        self.pending = None;
    }

    /// Returns the note to scroll to once the settle delay has passed
    pub fn poll(&mut self, now: Instant) -> Option<NoteId> {
        match self.pending {
            Some((id, deadline)) if now >= deadline => {
                self.pending = None;
                Some(id)
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Default for ScrollScheduler {
    fn default() -> Self {
        Self::new(SCROLL_SETTLE)
    }
}

/// Whether a horizontal drag travelled far enough to count as a swipe
pub fn is_swipe(offset_x: f64, threshold: f64) -> bool {
    offset_x.abs() > threshold
}
