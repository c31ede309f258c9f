//! Shared test utilities for menu workflow integration tests.
//!
//! Provides `TestEnv` - a headless menu scene built from a config assembled
//! with `TestEnvBuilder`.

use anyhow::Result;

use menu_screens::app::DEFAULT_SETTLE_FRAMES;
use menu_screens::config::{Config, ScreenConfig, TransitionConfig};
use menu_screens::{Hierarchy, MenuScene, Screen, ScreenEvent, ScreenId, ScreenPhase};

/// A headless menu ready to drive from a test.
pub struct TestEnv {
    pub scene: MenuScene,
}

/// Builder for `TestEnv`.
pub struct TestEnvBuilder {
    config: Config,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new TestEnvBuilder for fluent configuration.
    pub fn new() -> TestEnvBuilder {
        TestEnvBuilder {
            config: Config {
                manager: "Menu".to_string(),
                first_screen: None,
                screens: Vec::new(),
            },
        }
    }

    /// Request a switch to `name`.
    pub fn open(&mut self, name: &str) -> Vec<ScreenEvent> {
        self.scene.open(name)
    }

    /// Request the current screen to close.
    pub fn close(&mut self) -> Vec<ScreenEvent> {
        self.scene.close_current()
    }

    /// Advance one frame.
    pub fn tick(&mut self) -> Vec<ScreenEvent> {
        self.scene.tick()
    }

    /// Tick until idle.
    pub fn settle(&mut self) -> Result<Vec<ScreenEvent>> {
        self.scene.settle(DEFAULT_SETTLE_FRAMES)
    }

    /// Phase of screen `name`.
    pub fn phase(&self, name: &str) -> ScreenPhase {
        self.scene
            .manager()
            .screen_by_name(name)
            .map(|s| s.phase())
            .unwrap_or_else(|| panic!("no screen named {}", name))
    }

    /// Id of screen `name`.
    pub fn id(&self, name: &str) -> ScreenId {
        self.scene
            .manager()
            .screen_by_name(name)
            .map(|s| s.id())
            .unwrap_or_else(|| panic!("no screen named {}", name))
    }

    /// Whether the hierarchy node of screen `name` is active.
    pub fn is_active(&self, name: &str) -> bool {
        let node = self
            .scene
            .manager()
            .screen_by_name(name)
            .map(|s| s.node())
            .unwrap_or_else(|| panic!("no screen named {}", name));
        self.scene.tree().is_active(node)
    }

    /// Number of screens that are Open or Entering.
    pub fn open_or_entering(&self) -> usize {
        self.scene
            .manager()
            .screens()
            .iter()
            .filter(|s| matches!(s.phase(), ScreenPhase::Open | ScreenPhase::Entering))
            .count()
    }

    /// Assert that at most one screen is Open or Entering.
    pub fn assert_single_open(&self) {
        let count = self.open_or_entering();
        assert!(
            count <= 1,
            "{} screens open or entering at frame {}",
            count,
            self.scene.frame()
        );
    }
}

#[allow(dead_code)]
impl TestEnvBuilder {
    /// Add a screen with no transition.
    pub fn with_screen(mut self, name: &str, elements: &[&str]) -> Self {
        self.config.screens.push(ScreenConfig {
            elements: elements.iter().map(|e| (*e).to_string()).collect(),
            ..ScreenConfig::new(name)
        });
        self
    }

    /// Add a screen whose transition lasts `enter`/`exit` frames.
    pub fn with_animated_screen(mut self, name: &str, elements: &[&str], enter: u32, exit: u32) -> Self {
        self.config.screens.push(ScreenConfig {
            elements: elements.iter().map(|e| (*e).to_string()).collect(),
            transition: Some(TransitionConfig {
                enter_frames: enter,
                exit_frames: exit,
            }),
            ..ScreenConfig::new(name)
        });
        self
    }

    /// Select `element` the first time `screen` opens.
    pub fn with_first_focus(mut self, screen: &str, element: &str) -> Self {
        if let Some(s) = self.config.screens.iter_mut().find(|s| s.name == screen) {
            s.first_focus = Some(element.to_string());
        }
        self
    }

    /// Open `screen` when the menu starts.
    pub fn with_first_screen(mut self, screen: &str) -> Self {
        self.config.first_screen = Some(screen.to_string());
        self
    }

    /// Build the scene and start the manager.
    pub fn build(self) -> Result<TestEnv> {
        let mut scene = MenuScene::from_config(&self.config)?;
        scene.start();
        Ok(TestEnv { scene })
    }
}
