//! Input focus.
//!
//! Screens hand focus to an element when they finish opening and take it
//! back when they finish closing. The host's event system sits behind the
//! `FocusService` trait so it can be passed in explicitly.

use crate::hierarchy::NodeId;
use tracing::trace;

/// The host's focus/selection system.
pub trait FocusService {
    /// Give focus to `element`, or clear focus with `None`.
    fn set_focus(&mut self, element: Option<NodeId>);

    /// The element that currently has focus.
    fn current_focus(&self) -> Option<NodeId>;
}

/// Number of focus changes `FocusTracker` keeps.
pub const HISTORY_LIMIT: usize = 256;

/// Minimal focus service that records recent changes.
///
/// Only the last `HISTORY_LIMIT` values are kept.
#[derive(Debug, Clone, Default)]
pub struct FocusTracker {
    current: Option<NodeId>,
    history: Vec<Option<NodeId>>,
}

impl FocusTracker {
    /// Create a tracker with nothing focused.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recent values passed to `set_focus`, oldest first.
    pub fn history(&self) -> &[Option<NodeId>] {
        &self.history
    }

    /// Forget recorded focus changes. The current focus is kept.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

impl FocusService for FocusTracker {
    fn set_focus(&mut self, element: Option<NodeId>) {
        trace!("focus {:?} -> {:?}", self.current, element);
        self.current = element;
        if self.history.len() == HISTORY_LIMIT {
            self.history.remove(0);
        }
        self.history.push(element);
    }

    fn current_focus(&self) -> Option<NodeId> {
        self.current
    }
}
