//! Application configuration.
//!
//! Values come from `<config_dir>/hilo/config.json` layered with `HILO_*`
//! environment variables. Every field has a default, so a missing or
//! partial file is fine.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::{
    controls::{KeyBindings, Keymap},
    session::ExhaustionPolicy,
};

/// Directory under the platform config directory.
pub const APP_DIR: &str = "hilo";
/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "HILO";

const CONFIG_FILE: &str = "config.json";

/// Runtime settings shared by all front ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Fixed shuffle seed; entropy when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// What dealing from an empty deck does.
    pub exhaustion: ExhaustionPolicy,
    /// Where log files are written.
    pub log_dir: PathBuf,
    /// Whether the controls panel is drawn.
    pub show_controls: bool,
    /// Key names per action.
    pub keys: KeyBindings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seed: None,
            exhaustion: ExhaustionPolicy::default(),
            log_dir: default_log_dir(),
            show_controls: true,
            keys: KeyBindings::default(),
        }
    }
}

impl AppConfig {
    /// Load from the default config file and environment.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from an explicit file, still honouring environment overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_env(path, ENV_PREFIX)
    }

    fn load_with_env(path: impl AsRef<Path>, prefix: &str) -> Result<Self> {
        let path = path.as_ref();
        let settings = Config::builder()
            .add_source(
                File::from(path)
                    .format(FileFormat::Json)
                    .required(false),
            )
            .add_source(Environment::with_prefix(prefix).try_parsing(true))
            .build()
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: AppConfig = settings
            .try_deserialize()
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config
            .keymap()
            .with_context(|| format!("invalid key bindings in {}", path.display()))?;
        Ok(config)
    }

    /// Validated key lookup for these settings.
    pub fn keymap(&self) -> Result<Keymap> {
        Ok(self.keys.keymap()?)
    }
}

/// `<config_dir>/hilo/config.json`, falling back to the working directory.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CONFIG_FILE)
}

fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("logs")
}

/// Write a default config file if none exists yet and return its path.
///
/// Called before logging is initialised, so it emits no events itself.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = default_config_path();
    write_default_config(&path)?;
    Ok(path)
}

fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    let serialized = serde_json::to_string_pretty(&AppConfig::default())
        .context("failed to serialize default config")?;
    fs::write(path, serialized)
        .with_context(|| format!("failed to write config {}", path.display()))?;
    Ok(())
}
