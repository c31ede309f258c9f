use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::screens::ScreenId;

/// Menu description: the manager node and the screens under it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Name of the manager's hierarchy node (default: Menu)
    #[serde(default = "default_manager_name")]
    pub manager: String,
    /// Screen opened when the manager starts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_screen: Option<String>,
    /// Screens, in hierarchy order
    #[serde(default)]
    pub screens: Vec<ScreenConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenConfig {
    /// Screen name (also the hierarchy node name)
    pub name: String,
    /// Id passed to transitions as a destination (default: declaration index)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    /// Focusable elements, created as children of the screen node
    #[serde(default)]
    pub elements: Vec<String>,
    /// Element selected on first open
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_focus: Option<String>,
    /// Enter/exit animation; absent means instantaneous
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<TransitionConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionConfig {
    /// Frames the enter animation lasts
    #[serde(default = "default_frames")]
    pub enter_frames: u32,
    /// Frames the exit animation lasts
    #[serde(default = "default_frames")]
    pub exit_frames: u32,
}

impl ScreenConfig {
    /// Create a screen entry with no elements and no transition
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            elements: Vec::new(),
            first_focus: None,
            transition: None,
        }
    }

    /// Resolved screen id; `index` is the declaration position
    pub fn screen_id(&self, index: usize) -> ScreenId {
        ScreenId(self.id.unwrap_or_else(|| u32::try_from(index).unwrap_or(u32::MAX)))
    }
}

fn default_manager_name() -> String {
    "Menu".to_string()
}

fn default_frames() -> u32 {
    8
}

impl Config {
    /// Load and validate configuration from a TOML file
    pub fn load(config_path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {:?}", config_path))
    }

    /// Load configuration from file, or fall back to the built-in sample menu
    pub fn load_or_default(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            Self::load(config_path)
        } else {
            tracing::info!("No config at {:?}, using built-in menu", config_path);
            Ok(Self::default())
        }
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).with_context(|| "Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, config_path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        Ok(())
    }

    /// Check names, ids and focus targets for consistency
    pub fn validate(&self) -> Result<()> {
        if self.manager.trim().is_empty() {
            bail!("Manager name must not be empty");
        }

        let mut names = HashSet::new();
        let mut ids = HashSet::new();
        for (index, screen) in self.screens.iter().enumerate() {
            if screen.name.trim().is_empty() {
                bail!("Screen #{} has an empty name", index);
            }
            if !names.insert(screen.name.as_str()) {
                bail!("Duplicate screen name '{}'", screen.name);
            }
            let id = screen.screen_id(index);
            if !ids.insert(id) {
                bail!("Duplicate screen id {} (screen '{}')", id, screen.name);
            }
            if let Some(first) = &screen.first_focus {
                if !screen.elements.contains(first) {
                    bail!(
                        "Screen '{}': first_focus '{}' is not one of its elements",
                        screen.name,
                        first
                    );
                }
            }
        }

        if let Some(first) = &self.first_screen {
            if self.screen(first).is_none() {
                bail!("first_screen '{}' does not name a screen", first);
            }
        }

        Ok(())
    }

    /// Get a screen by name
    pub fn screen(&self, name: &str) -> Option<&ScreenConfig> {
        self.screens.iter().find(|s| s.name == name)
    }
}

impl Default for Config {
    /// Sample title menu with options and credits screens
    fn default() -> Self {
        let fade = Some(TransitionConfig {
            enter_frames: 6,
            exit_frames: 4,
        });
        Self {
            manager: default_manager_name(),
            first_screen: Some("Title".to_string()),
            screens: vec![
                ScreenConfig {
                    elements: vec!["Start".to_string(), "Options".to_string(), "Credits".to_string(), "Quit".to_string()],
                    first_focus: Some("Start".to_string()),
                    transition: fade,
                    ..ScreenConfig::new("Title")
                },
                ScreenConfig {
                    elements: vec!["Music".to_string(), "Sound".to_string(), "Back".to_string()],
                    first_focus: Some("Music".to_string()),
                    transition: fade,
                    ..ScreenConfig::new("Options")
                },
                ScreenConfig {
                    elements: vec!["Back".to_string()],
                    first_focus: Some("Back".to_string()),
                    ..ScreenConfig::new("Credits")
                },
            ],
        }
    }
}
