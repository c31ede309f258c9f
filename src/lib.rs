//! menu-screens - exclusive menu screens with sequenced transitions
//!
//! This library provides the screen/manager layer of a game menu: panels
//! that open and close through host-driven transitions, and a manager that
//! keeps exactly one of them open at a time.

// Core modules
pub mod app;
pub mod cli;
pub mod config;
pub mod focus;
pub mod hierarchy;
pub mod screens;
pub mod state;
pub mod transition;
pub mod utils;

// Re-exports for convenience
pub use app::MenuScene;
pub use config::Config;
pub use focus::{FocusService, FocusTracker};
pub use hierarchy::{Hierarchy, NodeId, SceneTree};
pub use screens::{MenuScreen, Screen, ScreenContext, ScreenError, ScreenId, ScreenPhase};
pub use state::{ScreenEvent, ScreenManager};
pub use transition::{FramedTransition, SharedTransition, Transition, TransitionState};
