//! Notifications emitted by the cursors controller.
//!
//! Events are pushed into an [`EventsCollector`] owned by the caller and
//! drained after each intent; nothing is dispatched synchronously.

use std::fmt;

use crate::core::position::Range;
use crate::core::selection::Selection;

/// Why the cursor state changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorChangeReason {
    #[default]
    NotSet,
    /// The buffer content was replaced wholesale
    ContentFlush,
    /// Selections were rebuilt from their shadow markers after an outside edit
    RecoverFromMarkers,
    Explicit,
    Paste,
    Undo,
    Redo,
}

impl fmt::Display for CursorChangeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CursorChangeReason::NotSet => "not-set",
            CursorChangeReason::ContentFlush => "content-flush",
            CursorChangeReason::RecoverFromMarkers => "recover-from-markers",
            CursorChangeReason::Explicit => "explicit",
            CursorChangeReason::Paste => "paste",
            CursorChangeReason::Undo => "undo",
            CursorChangeReason::Redo => "redo",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollType {
    #[default]
    Smooth,
    Immediate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalRevealType {
    #[default]
    Simple,
    Center,
}

/// Ask the view to scroll a range into sight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealRangeRequest {
    pub source: String,
    /// Range in display space
    pub range: Range,
    pub vertical_type: VerticalRevealType,
    pub reveal_horizontal: bool,
    pub scroll_type: ScrollType,
}

/// Outgoing cursor change, described in buffer space
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorStateChangedEvent {
    pub old_selections: Option<Vec<Selection>>,
    pub selections: Vec<Selection>,
    pub old_model_version_id: u64,
    pub model_version_id: u64,
    pub source: String,
    pub reason: CursorChangeReason,
    pub reached_max_cursor_count: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorEvent {
    /// Display-side view of the new cursor state
    ViewCursorStateChanged {
        view_selections: Vec<Selection>,
        model_selections: Vec<Selection>,
    },
    CursorStateChanged(CursorStateChangedEvent),
    RevealRange(RevealRangeRequest),
    /// An error swallowed at a transaction boundary
    UnexpectedError(String),
}

/// Accumulates events emitted while handling intents
#[derive(Debug, Default)]
pub struct EventsCollector {
    events: Vec<CursorEvent>,
}

impl EventsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: CursorEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[CursorEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove and return everything collected so far
    pub fn drain(&mut self) -> Vec<CursorEvent> {
        std::mem::take(&mut self.events)
    }

    /// Cursor state changes collected so far
    pub fn cursor_state_changes(&self) -> impl Iterator<Item = &CursorStateChangedEvent> {
        self.events.iter().filter_map(|e| match e {
            CursorEvent::CursorStateChanged(change) => Some(change),
            _ => None,
        })
    }

    /// Reveal requests collected so far
    pub fn reveal_requests(&self) -> impl Iterator<Item = &RevealRangeRequest> {
        self.events.iter().filter_map(|e| match e {
            CursorEvent::RevealRange(request) => Some(request),
            _ => None,
        })
    }
}
