//! Screen transitions.
//!
//! A transition is the host-side animation that plays while a screen enters
//! or exits. Screens only start it and watch its state; how it animates is
//! up to the host. `FramedTransition` is a frame-counted stand-in used by
//! the headless driver and the tests.

use crate::screens::ScreenId;
use std::cell::RefCell;
use std::rc::Rc;

/// Where a transition is in its animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionState {
    /// Not animating.
    #[default]
    Idle,
    /// Playing the enter animation.
    Entering,
    /// Playing the exit animation.
    Exiting,
}

/// Host animation driving a screen's enter/exit.
pub trait Transition {
    /// Start the enter animation.
    fn enter(&mut self);

    /// Start the exit animation.
    fn exit(&mut self);

    /// Current animation state.
    fn state(&self) -> TransitionState;

    /// Tell the transition which screen comes next, for directional exits.
    ///
    /// `None` means there is no destination. The default ignores the hint.
    fn set_destination(&mut self, _destination: Option<ScreenId>) {}
}

/// A transition shared between the host and the screen that plays it.
pub type SharedTransition = Rc<RefCell<dyn Transition>>;

/// Transition that lasts a fixed number of frames in each direction.
///
/// A zero-frame direction finishes as soon as it starts.
#[derive(Debug, Clone, Default)]
pub struct FramedTransition {
    enter_frames: u32,
    exit_frames: u32,
    remaining: u32,
    state: TransitionState,
    destination: Option<ScreenId>,
    enters: u32,
    exits: u32,
}

impl FramedTransition {
    /// Create a transition with the given enter/exit lengths.
    pub fn new(enter_frames: u32, exit_frames: u32) -> Self {
        Self {
            enter_frames,
            exit_frames,
            ..Self::default()
        }
    }

    /// Wrap in an `Rc<RefCell<_>>` so it can be handed to a screen while the
    /// host keeps ticking it.
    pub fn shared(enter_frames: u32, exit_frames: u32) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new(enter_frames, exit_frames)))
    }

    /// Advance one frame.
    pub fn tick(&mut self) {
        if self.state == TransitionState::Idle {
            return;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.state = TransitionState::Idle;
        }
    }

    /// Last destination passed to `set_destination`.
    pub fn destination(&self) -> Option<ScreenId> {
        self.destination
    }

    /// How many times `enter` has been called.
    pub fn enter_count(&self) -> u32 {
        self.enters
    }

    /// How many times `exit` has been called.
    pub fn exit_count(&self) -> u32 {
        self.exits
    }

    fn start(&mut self, state: TransitionState, frames: u32) {
        self.remaining = frames;
        self.state = if frames == 0 { TransitionState::Idle } else { state };
    }
}

impl Transition for FramedTransition {
    fn enter(&mut self) {
        self.enters += 1;
        self.start(TransitionState::Entering, self.enter_frames);
    }

    fn exit(&mut self) {
        self.exits += 1;
        self.start(TransitionState::Exiting, self.exit_frames);
    }

    fn state(&self) -> TransitionState {
        self.state
    }

    fn set_destination(&mut self, destination: Option<ScreenId>) {
        self.destination = destination;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_runs_for_configured_frames() {
        let mut t = FramedTransition::new(3, 1);
        t.enter();
        assert_eq!(t.state(), TransitionState::Entering);
        t.tick();
        t.tick();
        assert_eq!(t.state(), TransitionState::Entering);
        t.tick();
        assert_eq!(t.state(), TransitionState::Idle);
        assert_eq!(t.enter_count(), 1);
    }

    #[test]
    fn test_zero_frames_finish_immediately() {
        let mut t = FramedTransition::new(0, 0);
        t.exit();
        assert_eq!(t.state(), TransitionState::Idle);
        assert_eq!(t.exit_count(), 1);
    }

    #[test]
    fn test_tick_while_idle_is_noop() {
        let mut t = FramedTransition::new(2, 2);
        t.tick();
        assert_eq!(t.state(), TransitionState::Idle);
    }

    #[test]
    fn test_destination_is_recorded() {
        let mut t = FramedTransition::new(1, 1);
        t.set_destination(Some(ScreenId(4)));
        assert_eq!(t.destination(), Some(ScreenId(4)));
        t.set_destination(None);
        assert_eq!(t.destination(), None);
    }
}
