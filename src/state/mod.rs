//! Navigation state management.
//!
//! This module owns the rule that only one screen is open at a time.
//! `ScreenManager` turns open/close requests into a serialized sequence of
//! screen transitions and reports progress as `ScreenEvent`s.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                   ScreenManager                      │
//! ├──────────────────────────────────────────────────────┤
//! │  queue: [Open(B), CloseCurrent, ...]                 │
//! │                                                      │
//! │  pending:  Idle ──► Closing(A, then B) ──► Opening(B)│
//! │                          │                    │      │
//! │                 A.update() == Closed   B.update() == Open
//! │                                                      │
//! │  current: Some(A) ──────► None ─────────────► Some(B)│
//! └──────────────────────────────────────────────────────┘
//! ```

pub mod manager;

pub use manager::ScreenManager;

use crate::hierarchy::NodeId;
use crate::screens::ScreenId;

/// Progress reported by the manager, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenEvent {
    /// A screen was asked to open.
    Opening(ScreenId),
    /// A screen finished opening and is now current.
    Opened(ScreenId),
    /// A screen was asked to close.
    Closing(ScreenId),
    /// A screen finished closing.
    Closed(ScreenId),
}

impl ScreenEvent {
    /// The screen this event is about.
    pub fn screen(self) -> ScreenId {
        match self {
            Self::Opening(id) | Self::Opened(id) | Self::Closing(id) | Self::Closed(id) => id,
        }
    }
}

/// Navigation request waiting for the manager to become idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationRequest {
    /// Switch to the screen on this node.
    Open(NodeId),
    /// Close whatever is open.
    CloseCurrent,
}
