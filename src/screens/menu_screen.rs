//! Standard menu panel.

use super::screen_trait::{Screen, ScreenContext, ScreenError, ScreenId, ScreenPhase};
use crate::hierarchy::NodeId;
use crate::transition::{SharedTransition, TransitionState};
use tracing::debug;

/// A menu panel with an optional transition and focus memory.
///
/// The first open selects `first_focus`. Later opens select whatever was
/// focused inside the panel when it last closed.
pub struct MenuScreen {
    id: ScreenId,
    name: String,
    node: NodeId,
    transition: Option<SharedTransition>,
    first_focus: Option<NodeId>,
    previously_focused: Option<NodeId>,
    phase: ScreenPhase,
}

impl MenuScreen {
    /// Create a closed screen on `node` with no transition.
    pub fn new(id: ScreenId, name: impl Into<String>, node: NodeId) -> Self {
        Self {
            id,
            name: name.into(),
            node,
            transition: None,
            first_focus: None,
            previously_focused: None,
            phase: ScreenPhase::Closed,
        }
    }

    /// Play `transition` on open and close.
    pub fn with_transition(mut self, transition: SharedTransition) -> Self {
        self.transition = Some(transition);
        self
    }

    /// Select `element` the first time the screen opens.
    pub fn with_first_focus(mut self, element: NodeId) -> Self {
        self.first_focus = Some(element);
        self
    }

    /// Element remembered from the last close, if any.
    pub fn previously_focused(&self) -> Option<NodeId> {
        self.previously_focused
    }

    fn transition_state(&self) -> Option<TransitionState> {
        self.transition.as_ref().map(|t| t.borrow().state())
    }

    fn busy(&self) -> ScreenError {
        ScreenError::TransitionInFlight {
            name: self.name.clone(),
            phase: self.phase,
        }
    }

    fn finish_open(&mut self, ctx: &mut ScreenContext<'_>) {
        if let Some(target) = self.previously_focused.or(self.first_focus) {
            ctx.focus.set_focus(Some(target));
        }
        self.phase = ScreenPhase::Open;
        debug!("Screen '{}' opened", self.name);
    }

    fn finish_close(&mut self, ctx: &mut ScreenContext<'_>) {
        // Only remember selections that belong to this panel
        if let Some(focused) = ctx.focus.current_focus() {
            if ctx.hierarchy.is_descendant_of(focused, self.node) {
                self.previously_focused = Some(focused);
            }
        }
        ctx.focus.set_focus(None);
        ctx.hierarchy.set_active(self.node, false);
        self.phase = ScreenPhase::Closed;
        debug!("Screen '{}' closed", self.name);
    }
}

impl Screen for MenuScreen {
    fn id(&self) -> ScreenId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn node(&self) -> NodeId {
        self.node
    }

    fn phase(&self) -> ScreenPhase {
        self.phase
    }

    fn is_opening(&self) -> bool {
        self.transition_state() == Some(TransitionState::Entering)
    }

    fn is_closing(&self) -> bool {
        self.transition_state() == Some(TransitionState::Exiting)
    }

    fn open(&mut self, ctx: &mut ScreenContext<'_>) -> Result<ScreenPhase, ScreenError> {
        match self.phase {
            ScreenPhase::Open => return Ok(self.phase),
            ScreenPhase::Entering | ScreenPhase::Exiting => return Err(self.busy()),
            ScreenPhase::Closed => {}
        }

        ctx.hierarchy.set_active(self.node, true);
        match self.transition.clone() {
            Some(transition) => {
                transition.borrow_mut().enter();
                self.phase = ScreenPhase::Entering;
                debug!("Screen '{}' entering", self.name);
                Ok(self.update(ctx))
            }
            None => {
                self.finish_open(ctx);
                Ok(self.phase)
            }
        }
    }

    fn close(
        &mut self,
        destination: Option<ScreenId>,
        ctx: &mut ScreenContext<'_>,
    ) -> Result<ScreenPhase, ScreenError> {
        match self.phase {
            ScreenPhase::Closed => return Ok(self.phase),
            ScreenPhase::Entering | ScreenPhase::Exiting => return Err(self.busy()),
            ScreenPhase::Open => {}
        }

        match self.transition.clone() {
            Some(transition) => {
                {
                    let mut transition = transition.borrow_mut();
                    transition.set_destination(destination);
                    transition.exit();
                }
                self.phase = ScreenPhase::Exiting;
                debug!("Screen '{}' exiting (destination: {:?})", self.name, destination);
                Ok(self.update(ctx))
            }
            None => {
                self.finish_close(ctx);
                Ok(self.phase)
            }
        }
    }

    fn update(&mut self, ctx: &mut ScreenContext<'_>) -> ScreenPhase {
        match self.phase {
            ScreenPhase::Entering if !self.is_opening() => self.finish_open(ctx),
            ScreenPhase::Exiting if !self.is_closing() => self.finish_close(ctx),
            _ => {}
        }
        self.phase
    }
}
