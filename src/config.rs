//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory unless a path is
//! given on the command line:
//! - Windows: %APPDATA%\songreq\config.toml
//! - macOS: ~/Library/Application Support/songreq/config.toml
//! - Linux: ~/.config/songreq/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cooldown::CooldownPolicy;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub chat: ChatConfig,
    pub cooldown: CooldownConfig,
    pub player: PlayerConfig,
    pub curation: CurationConfig,
}

/// Chat-facing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Channel name; its owner is exempt from user cooldowns
    pub channel: String,

    /// Command trigger prefix
    pub prefix: String,

    /// Appended to the usage prompt
    pub usage_hint: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            channel: String::new(),
            prefix: "!".to_string(),
            usage_hint: String::new(),
        }
    }
}

/// Cooldown lengths in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CooldownConfig {
    pub song_secs: u64,
    pub user_secs: u64,
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            song_secs: 1800,
            user_secs: 300,
        }
    }
}

/// foo_httpcontrol connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub base_url: String,

    /// foo_httpcontrol template serving `playlist.json`
    pub template: String,

    pub timeout_secs: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8888".to_string(),
            template: "playlistviewer".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Unmatched query log
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CurationConfig {
    pub unmatched_log: PathBuf,
}

impl Default for CurationConfig {
    fn default() -> Self {
        Self {
            unmatched_log: PathBuf::from("unmatched.log"),
        }
    }
}

impl Config {
    /// Cooldown policy, exempting the channel owner when a channel is set.
    pub fn cooldown_policy(&self) -> CooldownPolicy {
        let policy = CooldownPolicy::new(
            Duration::from_secs(self.cooldown.song_secs),
            Duration::from_secs(self.cooldown.user_secs),
        );
        if self.chat.channel.is_empty() {
            policy
        } else {
            policy.with_privileged(self.chat.channel.trim_start_matches('#'))
        }
    }

    pub fn player_timeout(&self) -> Duration {
        Duration::from_secs(self.player.timeout_secs)
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("songreq"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match load_from(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            tracing::warn!("Using default configuration");
            Config::default()
        }
    }
}

/// Load configuration from an explicit path
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    let config = toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
    tracing::info!("Loaded config from {:?}", path);
    Ok(config)
}

/// Save configuration to `path`
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
