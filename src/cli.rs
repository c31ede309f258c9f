use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use crate::app::{MenuScene, DEFAULT_SETTLE_FRAMES};
use crate::config::Config;
use crate::state::ScreenEvent;
use std::path::PathBuf;
use std::str::FromStr;

/// Headless driver for menu screen layouts
#[derive(Parser, Debug)]
#[command(name = "menu-screens", version, about = "Headless driver for menu screen layouts", long_about = None)]
pub struct Cli {
    /// Menu config file (default: ~/.config/menu-screens/menu.toml, or the built-in menu)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the screens under the manager
    List,
    /// Check the config for errors
    Validate,
    /// Start the menu and run a script of steps
    Run {
        /// Steps: open:<name>, close, tick[:<n>], focus:<element>, settle
        steps: Vec<Step>,
        /// Give up on a settle after this many frames
        #[arg(long, default_value_t = DEFAULT_SETTLE_FRAMES)]
        max_frames: u32,
    },
}

/// One scripted action for `run`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Open(String),
    Close,
    Tick(u32),
    Focus(String),
    Settle,
}

impl FromStr for Step {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (verb, arg) = match s.split_once(':') {
            Some((verb, arg)) => (verb, Some(arg)),
            None => (s, None),
        };
        match (verb, arg) {
            ("open", Some(name)) if !name.is_empty() => Ok(Self::Open(name.to_string())),
            ("close", None) => Ok(Self::Close),
            ("tick", None) => Ok(Self::Tick(1)),
            ("tick", Some(n)) => {
                let frames = n.parse().with_context(|| format!("Invalid frame count in '{}'", s))?;
                Ok(Self::Tick(frames))
            }
            ("focus", Some(element)) if !element.is_empty() => Ok(Self::Focus(element.to_string())),
            ("settle", None) => Ok(Self::Settle),
            _ => bail!("Unknown step '{}'", s),
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let config = self.load_config()?;
        match self.command {
            Commands::List => Self::cmd_list(&config),
            Commands::Validate => Self::cmd_validate(&config),
            Commands::Run { steps, max_frames } => Self::cmd_run(&config, &steps, max_frames),
        }
    }

    fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load(path),
            None => Config::load_or_default(&crate::utils::get_config_path()),
        }
    }

    fn cmd_validate(config: &Config) -> Result<()> {
        config.validate()?;
        println!("✅ Config is valid ({} screens)", config.screens.len());
        Ok(())
    }

    fn cmd_list(config: &Config) -> Result<()> {
        println!("Manager: {}", config.manager);
        for (index, screen) in config.screens.iter().enumerate() {
            let marker = if config.first_screen.as_ref() == Some(&screen.name) { "*" } else { " " };
            let transition = match screen.transition {
                Some(t) => format!("enter {}f / exit {}f", t.enter_frames, t.exit_frames),
                None => "instant".to_string(),
            };
            println!(
                "{} [{}] {} ({}) elements: {} first focus: {}",
                marker,
                screen.screen_id(index),
                screen.name,
                transition,
                screen.elements.join(", "),
                screen.first_focus.as_deref().unwrap_or("-"),
            );
        }
        Ok(())
    }

    fn cmd_run(config: &Config, steps: &[Step], max_frames: u32) -> Result<()> {
        let mut scene = MenuScene::from_config(config)?;
        let events = scene.start();
        report(&scene, "start", &events);

        for step in steps {
            let label = format!("{:?}", step);
            let events = match step {
                Step::Open(name) => scene.open(name),
                Step::Close => scene.close_current(),
                Step::Tick(frames) => {
                    let mut events = Vec::new();
                    for _ in 0..*frames {
                        events.extend(scene.tick());
                    }
                    events
                }
                Step::Focus(element) => {
                    scene.focus_element(element)?;
                    Vec::new()
                }
                Step::Settle => scene.settle(max_frames)?,
            };
            report(&scene, &label, &events);
        }

        let events = scene.settle(max_frames)?;
        report(&scene, "final settle", &events);
        Ok(())
    }
}

fn describe(scene: &MenuScene, event: ScreenEvent) -> String {
    let name = scene
        .manager()
        .screens()
        .iter()
        .find(|s| s.id() == event.screen())
        .map(|s| s.name().to_string())
        .unwrap_or_else(|| event.screen().to_string());
    match event {
        ScreenEvent::Opening(_) => format!("opening {}", name),
        ScreenEvent::Opened(_) => format!("opened {}", name),
        ScreenEvent::Closing(_) => format!("closing {}", name),
        ScreenEvent::Closed(_) => format!("closed {}", name),
    }
}

fn report(scene: &MenuScene, label: &str, events: &[ScreenEvent]) {
    let described: Vec<String> = events.iter().map(|e| describe(scene, *e)).collect();
    println!(
        "[frame {:>4}] {:<16} current: {:<10} focus: {:<10} {}",
        scene.frame(),
        label,
        scene.current_screen().unwrap_or("-"),
        scene.focused_element().unwrap_or("-"),
        described.join(", "),
    );
}
