//! Configuration for the crosswin demo
//!
//! Loads configuration from TOML file at `~/.config/crosswin/config.toml`
//! Writes the default file on first run if missing.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::window::{Position, Size, WindowState, WindowType};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file, or use defaults if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            info!("Config file not found at {:?}, using defaults", config_path);
            if let Err(e) = Self::save_default(&config_path) {
                warn!("Failed to create default config file: {}", e);
            }
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).context("Failed to read config file")?;
        let config = Self::parse(&content)?;

        info!("Configuration loaded from {:?}", config_path);
        debug!("Config: {:?}", config);
        Ok(config)
    }

    /// Parse and validate a TOML document
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;
        config.window.initial_state()?;
        Ok(config)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("crosswin");

        Ok(config_dir.join("config.toml"))
    }

    fn save_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_string = toml::to_string_pretty(&Self::default())
            .context("Failed to serialize default config")?;
        fs::write(path, toml_string).context("Failed to write default config file")?;

        info!("Created default config file at {:?}", path);
        Ok(())
    }
}

/// Demo window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub x: i32,
    pub y: i32,
    /// Ask the window manager for decorations
    pub bordered: bool,
    pub window_type: WindowType,
    /// State names applied right after creation, e.g. "maximized_vert"
    pub state: Vec<String>,
    pub min_size: Option<Size>,
    pub max_size: Option<Size>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "crosswin".to_string(),
            width: 960,
            height: 540,
            x: 10,
            y: 20,
            bordered: true,
            window_type: WindowType::Normal,
            state: Vec::new(),
            min_size: None,
            max_size: None,
        }
    }
}

impl WindowConfig {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Fold the configured state names into one mask
    pub fn initial_state(&self) -> Result<WindowState> {
        let mut state = WindowState::empty();
        for name in &self.state {
            match WindowState::from_config_name(name) {
                Some(bit) => state |= bit,
                None => bail!("Unknown window state {:?} in config", name),
            }
        }
        Ok(state)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by RUST_LOG
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "crosswin=debug,info".to_string(),
        }
    }
}
