//! Screen manager: keeps one child screen open at a time.

use super::{NavigationRequest, ScreenEvent};
use crate::hierarchy::{Hierarchy, NodeId};
use crate::screens::{Screen, ScreenContext, ScreenPhase};
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// Operation currently waiting on a screen's transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Idle,
    /// Waiting for `screen` to close, then opening `then` if set.
    Closing { screen: usize, then: Option<usize> },
    /// Waiting for `screen` to finish entering.
    Opening { screen: usize },
}

/// Owner of a set of sibling screens.
///
/// Switching always closes the current screen completely before the next
/// one starts opening. Requests that arrive while a switch is in flight are
/// queued and handled in order once it completes.
pub struct ScreenManager {
    node: NodeId,
    screens: Vec<Box<dyn Screen>>,
    /// Indices into `screens` for the immediate children of `node`.
    children: Vec<usize>,
    current: Option<usize>,
    first_screen: Option<NodeId>,
    pending: Pending,
    queue: VecDeque<NavigationRequest>,
}

impl ScreenManager {
    /// Create a manager living on `node`.
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            screens: Vec::new(),
            children: Vec::new(),
            current: None,
            first_screen: None,
            pending: Pending::Idle,
            queue: VecDeque::new(),
        }
    }

    /// Screen to open from `start`.
    pub fn with_first_screen(mut self, node: NodeId) -> Self {
        self.first_screen = Some(node);
        self
    }

    /// Register a screen. Call `update_list` afterwards to pick it up as a
    /// child.
    pub fn attach(&mut self, screen: Box<dyn Screen>) {
        debug!("Attaching screen '{}' on node {}", screen.name(), screen.node());
        self.screens.push(screen);
    }

    /// The hierarchy node the manager lives on.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Rebuild the child list from the hierarchy, keeping only registered
    /// screens that are immediate children of the manager's node.
    pub fn update_list(&mut self, hierarchy: &dyn Hierarchy) {
        self.children = hierarchy
            .children(self.node)
            .into_iter()
            .filter_map(|child| self.index_of(child))
            .collect();
        debug!("Manager {} has {} child screens", self.node, self.children.len());
    }

    /// Call when the manager's place in the hierarchy changes.
    pub fn on_parent_changed(&mut self, hierarchy: &dyn Hierarchy) {
        self.update_list(hierarchy);
    }

    /// Hide every closed child screen, then open the first screen if one is
    /// set.
    ///
    /// Screens that are open or mid-transition keep their node active, so
    /// calling `start` again does not strand the current screen.
    pub fn start(&mut self, ctx: &mut ScreenContext<'_>) -> Vec<ScreenEvent> {
        self.update_list(&*ctx.hierarchy);
        for &index in &self.children {
            let screen = &self.screens[index];
            if screen.phase() == ScreenPhase::Closed {
                ctx.hierarchy.set_active(screen.node(), false);
            } else {
                debug!("Screen '{}' is {:?}, leaving it active", screen.name(), screen.phase());
            }
        }
        info!("Screen manager started with {} screens", self.children.len());

        match self.first_screen {
            Some(first) => self.open(first, ctx),
            None => Vec::new(),
        }
    }

    /// Switch to the screen on `target`.
    ///
    /// Opening the current screen does nothing. Unregistered nodes are
    /// ignored.
    pub fn open(&mut self, target: NodeId, ctx: &mut ScreenContext<'_>) -> Vec<ScreenEvent> {
        if self.index_of(target).is_none() {
            warn!("No screen registered on node {}", target);
            return Vec::new();
        }
        self.request(NavigationRequest::Open(target), ctx)
    }

    /// Switch to the child screen called `name`. Unknown names do nothing.
    pub fn open_by_name(&mut self, name: &str, ctx: &mut ScreenContext<'_>) -> Vec<ScreenEvent> {
        match self.child_index_by_name(name) {
            Some(index) => {
                let node = self.screens[index].node();
                self.request(NavigationRequest::Open(node), ctx)
            }
            None => {
                debug!("No child screen named '{}'", name);
                Vec::new()
            }
        }
    }

    /// Close the current screen, if any.
    pub fn close_current(&mut self, ctx: &mut ScreenContext<'_>) -> Vec<ScreenEvent> {
        self.request(NavigationRequest::CloseCurrent, ctx)
    }

    /// Advance in-flight work by one frame.
    pub fn tick(&mut self, ctx: &mut ScreenContext<'_>) -> Vec<ScreenEvent> {
        self.pump(ctx)
    }

    /// The screen that is fully open, if any.
    pub fn current(&self) -> Option<&dyn Screen> {
        let index = self.current?;
        Some(self.screens[index].as_ref())
    }

    /// Whether a switch is in flight or queued.
    pub fn is_busy(&self) -> bool {
        self.pending != Pending::Idle || !self.queue.is_empty()
    }

    /// Number of requests waiting behind the in-flight one.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Every registered screen, in registration order.
    pub fn screens(&self) -> &[Box<dyn Screen>] {
        &self.screens
    }

    /// Registered screen on `node`.
    pub fn screen(&self, node: NodeId) -> Option<&dyn Screen> {
        let index = self.index_of(node)?;
        Some(self.screens[index].as_ref())
    }

    /// Child screen called `name`.
    pub fn screen_by_name(&self, name: &str) -> Option<&dyn Screen> {
        let index = self.child_index_by_name(name)?;
        Some(self.screens[index].as_ref())
    }

    /// Names of the child screens, in hierarchy order.
    pub fn child_names(&self) -> Vec<&str> {
        self.children.iter().map(|&i| self.screens[i].name()).collect()
    }

    fn index_of(&self, node: NodeId) -> Option<usize> {
        self.screens.iter().position(|s| s.node() == node)
    }

    fn child_index_by_name(&self, name: &str) -> Option<usize> {
        self.children
            .iter()
            .copied()
            .find(|&i| self.screens[i].name() == name)
    }

    fn request(&mut self, request: NavigationRequest, ctx: &mut ScreenContext<'_>) -> Vec<ScreenEvent> {
        if self.pending != Pending::Idle {
            debug!("Manager busy, queueing {:?}", request);
        }
        self.queue.push_back(request);
        self.pump(ctx)
    }

    fn pump(&mut self, ctx: &mut ScreenContext<'_>) -> Vec<ScreenEvent> {
        let mut events = Vec::new();
        loop {
            match self.pending {
                Pending::Idle => {
                    let Some(request) = self.queue.pop_front() else {
                        break;
                    };
                    self.begin(request, ctx, &mut events);
                }
                Pending::Closing { screen, then } => match self.screens[screen].update(ctx) {
                    ScreenPhase::Closed => {
                        events.push(ScreenEvent::Closed(self.screens[screen].id()));
                        if self.current == Some(screen) {
                            self.current = None;
                        }
                        match then {
                            Some(next) => self.begin_open(next, ctx, &mut events),
                            None => self.pending = Pending::Idle,
                        }
                    }
                    ScreenPhase::Exiting => break,
                    phase => {
                        warn!(
                            "Screen '{}' left its exit early ({:?}), dropping switch",
                            self.screens[screen].name(),
                            phase
                        );
                        self.pending = Pending::Idle;
                    }
                },
                Pending::Opening { screen } => match self.screens[screen].update(ctx) {
                    ScreenPhase::Open => {
                        events.push(ScreenEvent::Opened(self.screens[screen].id()));
                        self.current = Some(screen);
                        self.pending = Pending::Idle;
                        info!("Screen '{}' is now current", self.screens[screen].name());
                    }
                    ScreenPhase::Entering => break,
                    phase => {
                        warn!(
                            "Screen '{}' left its entry early ({:?}), dropping open",
                            self.screens[screen].name(),
                            phase
                        );
                        self.pending = Pending::Idle;
                    }
                },
            }
        }
        events
    }

    fn begin(&mut self, request: NavigationRequest, ctx: &mut ScreenContext<'_>, events: &mut Vec<ScreenEvent>) {
        match request {
            NavigationRequest::Open(target) => {
                let Some(index) = self.index_of(target) else {
                    warn!("No screen registered on node {}", target);
                    return;
                };
                if self.current == Some(index) {
                    debug!("Screen '{}' is already open", self.screens[index].name());
                    return;
                }
                match self.current {
                    Some(current) => self.begin_close(current, Some(index), ctx, events),
                    None => self.begin_open(index, ctx, events),
                }
            }
            NavigationRequest::CloseCurrent => match self.current {
                Some(current) => self.begin_close(current, None, ctx, events),
                None => debug!("No screen open, nothing to close"),
            },
        }
    }

    fn begin_close(
        &mut self,
        screen: usize,
        then: Option<usize>,
        ctx: &mut ScreenContext<'_>,
        events: &mut Vec<ScreenEvent>,
    ) {
        let destination = then.map(|next| self.screens[next].id());
        match self.screens[screen].close(destination, ctx) {
            Ok(_) => {
                events.push(ScreenEvent::Closing(self.screens[screen].id()));
                self.pending = Pending::Closing { screen, then };
            }
            Err(e) => {
                warn!("Close rejected: {}", e);
                self.pending = Pending::Idle;
            }
        }
    }

    fn begin_open(&mut self, screen: usize, ctx: &mut ScreenContext<'_>, events: &mut Vec<ScreenEvent>) {
        match self.screens[screen].open(ctx) {
            Ok(_) => {
                events.push(ScreenEvent::Opening(self.screens[screen].id()));
                self.pending = Pending::Opening { screen };
            }
            Err(e) => {
                warn!("Open rejected: {}", e);
                self.pending = Pending::Idle;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::FocusTracker;
    use crate::hierarchy::SceneTree;
    use crate::screens::{MenuScreen, ScreenId};
    use crate::transition::FramedTransition;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Harness {
        tree: SceneTree,
        focus: FocusTracker,
        manager: ScreenManager,
        transitions: Vec<Rc<RefCell<FramedTransition>>>,
        nodes: Vec<NodeId>,
    }

    impl Harness {
        fn new(frames: &[Option<(u32, u32)>]) -> Self {
            let mut tree = SceneTree::new();
            let root = tree.add_root("Menu");
            let mut manager = ScreenManager::new(root);
            let mut transitions = Vec::new();
            let mut nodes = Vec::new();
            for (i, frames) in frames.iter().enumerate() {
                let name = format!("S{}", i);
                let node = tree.add_child(root, name.clone()).unwrap();
                let mut screen = MenuScreen::new(ScreenId(i as u32), name, node);
                if let Some((enter, exit)) = frames {
                    let t = FramedTransition::shared(*enter, *exit);
                    screen = screen.with_transition(t.clone());
                    transitions.push(t);
                }
                manager.attach(Box::new(screen));
                nodes.push(node);
            }
            manager.update_list(&tree);
            Self {
                tree,
                focus: FocusTracker::new(),
                manager,
                transitions,
                nodes,
            }
        }

        fn open(&mut self, i: usize) -> Vec<ScreenEvent> {
            let mut ctx = ScreenContext::new(&mut self.tree, &mut self.focus);
            self.manager.open(self.nodes[i], &mut ctx)
        }

        fn close(&mut self) -> Vec<ScreenEvent> {
            let mut ctx = ScreenContext::new(&mut self.tree, &mut self.focus);
            self.manager.close_current(&mut ctx)
        }

        fn tick(&mut self) -> Vec<ScreenEvent> {
            for t in &self.transitions {
                t.borrow_mut().tick();
            }
            let mut ctx = ScreenContext::new(&mut self.tree, &mut self.focus);
            self.manager.tick(&mut ctx)
        }

        fn settle(&mut self) -> Vec<ScreenEvent> {
            let mut events = Vec::new();
            while self.manager.is_busy() {
                events.extend(self.tick());
            }
            events
        }

        fn current_name(&self) -> Option<&str> {
            self.manager.current().map(|s| s.name())
        }
    }

    #[test]
    fn test_open_without_transitions_is_synchronous() {
        let mut h = Harness::new(&[None, None]);
        let events = h.open(0);
        assert_eq!(events, vec![ScreenEvent::Opening(ScreenId(0)), ScreenEvent::Opened(ScreenId(0))]);
        assert_eq!(h.current_name(), Some("S0"));
        assert!(!h.manager.is_busy());
    }

    #[test]
    fn test_switch_closes_before_opening() {
        let mut h = Harness::new(&[Some((1, 2)), Some((2, 1))]);
        h.open(0);
        h.settle();

        let mut events = h.open(1);
        assert_eq!(events, vec![ScreenEvent::Closing(ScreenId(0))]);
        events.extend(h.settle());
        assert_eq!(
            events,
            vec![
                ScreenEvent::Closing(ScreenId(0)),
                ScreenEvent::Closed(ScreenId(0)),
                ScreenEvent::Opening(ScreenId(1)),
                ScreenEvent::Opened(ScreenId(1)),
            ]
        );
        assert_eq!(h.current_name(), Some("S1"));
        assert_eq!(h.transitions[0].borrow().destination(), Some(ScreenId(1)));
    }

    #[test]
    fn test_current_is_none_while_switching() {
        let mut h = Harness::new(&[Some((1, 2)), Some((2, 1))]);
        h.open(0);
        h.settle();
        h.open(1);
        assert_eq!(h.current_name(), Some("S0"));
        h.tick();
        h.tick();
        assert_eq!(h.current_name(), None);
        h.settle();
        assert_eq!(h.current_name(), Some("S1"));
    }

    #[test]
    fn test_open_current_is_noop() {
        let mut h = Harness::new(&[Some((1, 1))]);
        h.open(0);
        h.settle();
        assert!(h.open(0).is_empty());
        assert_eq!(h.transitions[0].borrow().enter_count(), 1);
        assert_eq!(h.transitions[0].borrow().exit_count(), 0);
    }

    #[test]
    fn test_close_with_nothing_open_is_noop() {
        let mut h = Harness::new(&[None]);
        assert!(h.close().is_empty());
        assert!(h.manager.current().is_none());
        assert!(!h.manager.is_busy());
    }

    #[test]
    fn test_requests_queue_while_busy() {
        let mut h = Harness::new(&[Some((2, 2)), Some((2, 2)), Some((2, 2))]);
        h.open(0);
        h.open(1);
        h.open(2);
        assert_eq!(h.manager.queued(), 2);

        let events = h.settle();
        let opened: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                ScreenEvent::Opened(id) => Some(*id),
                _ => None,
            })
            .collect();
        assert_eq!(opened, vec![ScreenId(0), ScreenId(1), ScreenId(2)]);
        assert_eq!(h.current_name(), Some("S2"));
    }

    #[test]
    fn test_repeated_open_while_entering_runs_once() {
        let mut h = Harness::new(&[Some((3, 1))]);
        h.open(0);
        h.open(0);
        h.settle();
        assert_eq!(h.transitions[0].borrow().enter_count(), 1);
        assert_eq!(h.current_name(), Some("S0"));
    }

    #[test]
    fn test_unknown_node_is_ignored() {
        let mut h = Harness::new(&[None]);
        let stray = h.tree.add_root("Stray");
        let mut ctx = ScreenContext::new(&mut h.tree, &mut h.focus);
        assert!(h.manager.open(stray, &mut ctx).is_empty());
        assert!(!h.manager.is_busy());
    }

    #[test]
    fn test_open_by_name_missing_is_noop() {
        let mut h = Harness::new(&[None, None]);
        h.open(0);
        let mut ctx = ScreenContext::new(&mut h.tree, &mut h.focus);
        assert!(h.manager.open_by_name("Missing", &mut ctx).is_empty());
        assert_eq!(h.current_name(), Some("S0"));
    }

    #[test]
    fn test_start_hides_children_and_opens_first() {
        let mut h = Harness::new(&[None, None]);
        h.manager.first_screen = Some(h.nodes[1]);
        let mut ctx = ScreenContext::new(&mut h.tree, &mut h.focus);
        let events = h.manager.start(&mut ctx);
        assert_eq!(events.last(), Some(&ScreenEvent::Opened(ScreenId(1))));
        assert!(!h.tree.is_active(h.nodes[0]));
        assert!(h.tree.is_active(h.nodes[1]));
    }

    #[test]
    fn test_second_start_keeps_current_screen_active() {
        let mut h = Harness::new(&[Some((1, 1)), None]);
        h.manager.first_screen = Some(h.nodes[0]);
        {
            let mut ctx = ScreenContext::new(&mut h.tree, &mut h.focus);
            h.manager.start(&mut ctx);
        }
        h.settle();
        assert_eq!(h.current_name(), Some("S0"));

        let mut ctx = ScreenContext::new(&mut h.tree, &mut h.focus);
        assert!(h.manager.start(&mut ctx).is_empty());
        assert_eq!(h.current_name(), Some("S0"));
        assert!(h.tree.is_active(h.nodes[0]));
        assert!(!h.tree.is_active(h.nodes[1]));
        assert_eq!(h.transitions[0].borrow().enter_count(), 1);
    }

    #[test]
    fn test_update_list_keeps_immediate_children_only() {
        let mut h = Harness::new(&[None, None]);
        h.tree.reparent(h.nodes[1], Some(h.nodes[0])).unwrap();
        h.manager.update_list(&h.tree);
        assert_eq!(h.manager.child_names(), vec!["S0"]);
        assert!(h.manager.screen_by_name("S1").is_none());
        assert!(h.manager.screen(h.nodes[1]).is_some());
    }
}
