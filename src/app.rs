use anyhow::{bail, Context, Result};
use crate::config::Config;
use crate::focus::{FocusService, FocusTracker};
use crate::hierarchy::{Hierarchy, NodeId, SceneTree};
use crate::screens::{MenuScreen, ScreenContext};
use crate::state::{ScreenEvent, ScreenManager};
use crate::transition::FramedTransition;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info};

/// Frame cap used by `settle` when the caller has no better bound
pub const DEFAULT_SETTLE_FRAMES: u32 = 10_000;

/// Headless host: scene graph, focus, transitions and one screen manager
pub struct MenuScene {
    tree: SceneTree,
    focus: FocusTracker,
    manager: ScreenManager,
    /// Frame-counted transitions, keyed by screen name
    transitions: Vec<(String, Rc<RefCell<FramedTransition>>)>,
    frame: u64,
}

impl MenuScene {
    /// Build the scene graph and screens described by `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate().context("Cannot build scene from invalid config")?;

        let mut tree = SceneTree::new();
        let root = tree.add_root(config.manager.clone());
        let mut manager = ScreenManager::new(root);
        let mut transitions = Vec::new();

        for (index, screen_config) in config.screens.iter().enumerate() {
            let node = tree.add_child(root, screen_config.name.clone())?;
            let mut first_focus = None;
            for element in &screen_config.elements {
                let element_node = tree.add_child(node, element.clone())?;
                if screen_config.first_focus.as_ref() == Some(element) {
                    first_focus = Some(element_node);
                }
            }

            let mut screen = MenuScreen::new(screen_config.screen_id(index), screen_config.name.clone(), node);
            if let Some(element) = first_focus {
                screen = screen.with_first_focus(element);
            }
            if let Some(frames) = screen_config.transition {
                let transition = FramedTransition::shared(frames.enter_frames, frames.exit_frames);
                screen = screen.with_transition(transition.clone());
                transitions.push((screen_config.name.clone(), transition));
            }
            manager.attach(Box::new(screen));

            if config.first_screen.as_ref() == Some(&screen_config.name) {
                manager = manager.with_first_screen(node);
            }
        }

        manager.update_list(&tree);
        debug!("Built scene with {} nodes", tree.len());

        Ok(Self {
            tree,
            focus: FocusTracker::new(),
            manager,
            transitions,
            frame: 0,
        })
    }

    /// Hide every screen and open the configured first screen
    pub fn start(&mut self) -> Vec<ScreenEvent> {
        info!("Starting menu '{}'", self.tree.name(self.manager.node()).unwrap_or_default());
        let mut ctx = ScreenContext::new(&mut self.tree, &mut self.focus);
        self.manager.start(&mut ctx)
    }

    /// Request a switch to the child screen called `name`
    pub fn open(&mut self, name: &str) -> Vec<ScreenEvent> {
        let mut ctx = ScreenContext::new(&mut self.tree, &mut self.focus);
        self.manager.open_by_name(name, &mut ctx)
    }

    /// Request the current screen to close
    pub fn close_current(&mut self) -> Vec<ScreenEvent> {
        let mut ctx = ScreenContext::new(&mut self.tree, &mut self.focus);
        self.manager.close_current(&mut ctx)
    }

    /// Advance every transition by one frame, then the manager
    pub fn tick(&mut self) -> Vec<ScreenEvent> {
        self.frame += 1;
        for (_, transition) in &self.transitions {
            transition.borrow_mut().tick();
        }
        let mut ctx = ScreenContext::new(&mut self.tree, &mut self.focus);
        self.manager.tick(&mut ctx)
    }

    /// Tick until the manager is idle, failing after `max_frames`
    pub fn settle(&mut self, max_frames: u32) -> Result<Vec<ScreenEvent>> {
        let mut events = Vec::new();
        let mut frames = 0;
        while self.manager.is_busy() {
            if frames == max_frames {
                bail!("Menu did not settle within {} frames", max_frames);
            }
            events.extend(self.tick());
            frames += 1;
        }
        Ok(events)
    }

    /// Move focus to `element` inside the current screen
    pub fn focus_element(&mut self, element: &str) -> Result<()> {
        let Some(screen) = self.manager.current() else {
            bail!("No screen is open");
        };
        let screen_node = screen.node();
        let screen_name = screen.name().to_string();
        let Some(node) = self.element_in(screen_node, element) else {
            bail!("Screen '{}' has no element '{}'", screen_name, element);
        };
        self.focus.set_focus(Some(node));
        Ok(())
    }

    /// Name of the focused element, if any
    pub fn focused_element(&self) -> Option<&str> {
        self.focus.current_focus().and_then(|node| self.tree.name(node))
    }

    /// Name of the fully open screen, if any
    pub fn current_screen(&self) -> Option<&str> {
        self.manager.current().map(|s| s.name())
    }

    /// Element node `element` under screen `screen`
    pub fn element(&self, screen: &str, element: &str) -> Option<NodeId> {
        let screen_node = self.manager.screen_by_name(screen)?.node();
        self.element_in(screen_node, element)
    }

    /// Transition played by screen `name`, if it has one
    pub fn transition(&self, name: &str) -> Option<Rc<RefCell<FramedTransition>>> {
        self.transitions
            .iter()
            .find(|(screen, _)| screen == name)
            .map(|(_, t)| Rc::clone(t))
    }

    /// Rebuild the manager's child list after editing the tree
    pub fn refresh_children(&mut self) {
        self.manager.update_list(&self.tree);
    }

    pub fn manager(&self) -> &ScreenManager {
        &self.manager
    }

    pub fn tree(&self) -> &SceneTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut SceneTree {
        &mut self.tree
    }

    pub fn focus(&self) -> &FocusTracker {
        &self.focus
    }

    /// Frames ticked so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    fn element_in(&self, screen_node: NodeId, element: &str) -> Option<NodeId> {
        self.tree
            .children(screen_node)
            .into_iter()
            .find(|child| self.tree.name(*child) == Some(element))
    }
}
