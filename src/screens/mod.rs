//! Screens: exclusive, transitionable UI panels.
//!
//! This module provides the `Screen` trait the manager drives and
//! `MenuScreen`, the standard panel implementation.
//!
//! # Lifecycle
//!
//! ```text
//!            open()                update()
//!   Closed ─────────► Entering ─────────────► Open
//!     ▲                (transition playing)     │
//!     │                                         │ close(destination)
//!     │      update()                           ▼
//!     └──────────────────────────────────── Exiting
//! ```
//!
//! Screens without a transition skip `Entering`/`Exiting` entirely: `open`
//! and `close` finish inside the call.

pub mod menu_screen;
pub mod screen_trait;

pub use menu_screen::MenuScreen;
pub use screen_trait::{Screen, ScreenContext, ScreenError, ScreenId, ScreenPhase};
