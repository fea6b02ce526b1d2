// Configuration management for podpipe
// Handles loading/saving settings, with sensible defaults when config is missing

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub episodes_file: PathBuf,
    #[serde(default)]
    pub audio: AudioSettings,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioSettings {
    pub volume: f32,
    pub silent: bool, // no output device, just the clock
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub dark_theme: bool,
    pub tick_ms: u64,
    pub seek_step_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub directory: PathBuf,
    pub filter: String,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            volume: 0.7,
            silent: false,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            dark_theme: false,
            tick_ms: 250,
            seek_step_seconds: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: app_dir().join("logs"),
            filter: "info,podpipe=debug".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            episodes_file: app_dir().join("episodes.json"),
            audio: AudioSettings::default(),
            ui: UiConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn app_dir() -> PathBuf {
    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("podpipe")
}

impl Config {
    /// Load from the default location, writing defaults on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = fs::read_to_string(config_path)
                .with_context(|| format!("reading {}", config_path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("parsing {}", config_path.display()))?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(config_path, content)
            .with_context(|| format!("writing {}", config_path.display()))?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("podpipe");

        Ok(config_dir.join("config.toml"))
    }
}
