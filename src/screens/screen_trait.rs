//! Screen trait and associated types.
//!
//! This module defines the `Screen` trait the manager drives. The key points
//! are:
//!
//! 1. Screens start their transition and report progress through `update`
//!    instead of blocking until it finishes
//! 2. Focus and hierarchy access come in through a context object instead of
//!    engine globals
//! 3. The manager only ever sees `dyn Screen`, so panel types can customize
//!    open/close freely

use crate::focus::FocusService;
use crate::hierarchy::{Hierarchy, NodeId};
use thiserror::Error;

/// Numeric screen id, passed to transitions as the close destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScreenId(pub u32);

impl std::fmt::Display for ScreenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Logical phase of a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenPhase {
    /// Inactive, not animating.
    #[default]
    Closed,
    /// Active, enter transition still playing.
    Entering,
    /// Active and focused.
    Open,
    /// Exit transition playing; still active until it ends.
    Exiting,
}

impl ScreenPhase {
    /// Whether the screen is mid-transition.
    pub fn is_in_flight(self) -> bool {
        matches!(self, Self::Entering | Self::Exiting)
    }
}

/// Errors returned by screen operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScreenError {
    /// Open or close was called while a transition is still playing
    #[error("Screen '{name}' is busy ({phase:?})")]
    TransitionInFlight {
        /// Name of the busy screen
        name: String,
        /// Phase it was in when the call arrived
        phase: ScreenPhase,
    },
}

/// Context provided to screen operations.
///
/// Gives screens mutable access to the host services they touch when a
/// transition finishes.
pub struct ScreenContext<'a> {
    /// Scene graph, for activating and deactivating panels.
    pub hierarchy: &'a mut dyn Hierarchy,
    /// Focus system, for selecting the first element on open.
    pub focus: &'a mut dyn FocusService,
}

impl<'a> ScreenContext<'a> {
    /// Create a new screen context.
    pub fn new(hierarchy: &'a mut dyn Hierarchy, focus: &'a mut dyn FocusService) -> Self {
        Self { hierarchy, focus }
    }
}

/// Trait for exclusive, transitionable UI panels.
///
/// # Example
///
/// ```rust,ignore
/// let phase = screen.open(&mut ctx)?;
/// while screen.update(&mut ctx) != ScreenPhase::Open {
///     // host advances the transition once per frame
/// }
/// ```
pub trait Screen {
    /// Screen id, used as the destination hint for other screens' exits.
    fn id(&self) -> ScreenId;

    /// Screen name, used by `ScreenManager::open_by_name`.
    fn name(&self) -> &str;

    /// The hierarchy node this screen lives on.
    fn node(&self) -> NodeId;

    /// Current logical phase.
    fn phase(&self) -> ScreenPhase;

    /// Whether the transition is playing its enter animation.
    fn is_opening(&self) -> bool;

    /// Whether the transition is playing its exit animation.
    fn is_closing(&self) -> bool;

    /// Activate the panel and start entering.
    ///
    /// Returns the phase after the call: `Open` when there was nothing to
    /// animate, `Entering` otherwise.
    fn open(&mut self, ctx: &mut ScreenContext<'_>) -> Result<ScreenPhase, ScreenError>;

    /// Start exiting, telling the transition where the user is headed.
    ///
    /// Returns `Closed` when there was nothing to animate, `Exiting` otherwise.
    fn close(
        &mut self,
        destination: Option<ScreenId>,
        ctx: &mut ScreenContext<'_>,
    ) -> Result<ScreenPhase, ScreenError>;

    /// Poll the transition once and finish a pending open/close if it is done.
    fn update(&mut self, ctx: &mut ScreenContext<'_>) -> ScreenPhase;
}
