//! Configuration loading and validation.
//!
//! A [`BotConfig`] is built once at start-up and then shared by reference;
//! secrets come from the environment and never live in the config file.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DISCORD_TOKEN_VAR: &str = "DISCORD_TOKEN";
pub const HYPIXEL_API_KEY_VAR: &str = "HYPIXEL_API_KEY";

/// Chat platform settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Bot token. Usually supplied via `DISCORD_TOKEN`.
    #[serde(default, skip_serializing)]
    pub token: String,

    /// Prefix every command starts with
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// "Watching ..." status shown once connected
    #[serde(default = "default_activity")]
    pub activity: String,
}

fn default_prefix() -> String {
    ".".to_string()
}

fn default_activity() -> String {
    "Mini Walls stats | .help".to_string()
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            prefix: default_prefix(),
            activity: default_activity(),
        }
    }
}

/// Upstream API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Hypixel API key. Usually supplied via `HYPIXEL_API_KEY`.
    #[serde(default, skip_serializing)]
    pub api_key: String,

    #[serde(default = "default_mojang_base_url")]
    pub mojang_base_url: String,

    #[serde(default = "default_hypixel_base_url")]
    pub hypixel_base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Key of the game mode in the live counts response
    #[serde(default = "default_game_mode_key")]
    pub game_mode_key: String,
}

fn default_mojang_base_url() -> String {
    "https://api.mojang.com".to_string()
}

fn default_hypixel_base_url() -> String {
    "https://api.hypixel.net".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    "MiniWalls-Discord-Bot/2.0".to_string()
}

fn default_game_mode_key() -> String {
    "MINI_WALLS".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            mojang_base_url: default_mojang_base_url(),
            hypixel_base_url: default_hypixel_base_url(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
            game_mode_key: default_game_mode_key(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Embed accent colors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EmbedConfig {
    #[serde(default = "default_primary_color")]
    pub primary_color: u32,
    #[serde(default = "default_success_color")]
    pub success_color: u32,
    #[serde(default = "default_error_color")]
    pub error_color: u32,
    #[serde(default = "default_warning_color")]
    pub warning_color: u32,
}

fn default_primary_color() -> u32 {
    0x5865F2
}

fn default_success_color() -> u32 {
    0x57F287
}

fn default_error_color() -> u32 {
    0xED4245
}

fn default_warning_color() -> u32 {
    0xFEE75C
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            primary_color: default_primary_color(),
            success_color: default_success_color(),
            error_color: default_error_color(),
            warning_color: default_warning_color(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub discord: DiscordConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub embed: EmbedConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            discord: DiscordConfig::default(),
            api: ApiConfig::default(),
            embed: EmbedConfig::default(),
        }
    }
}

impl BotConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load from `path` if it exists, overlay secrets from the environment, then validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Overlay secrets using `lookup` (normally `std::env::var`).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(DISCORD_TOKEN_VAR).filter(|v| !v.is_empty()) {
            self.discord.token = token;
        }
        if let Some(key) = lookup(HYPIXEL_API_KEY_VAR).filter(|v| !v.is_empty()) {
            self.api.api_key = key;
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.discord.token.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "Discord token missing, set {DISCORD_TOKEN_VAR}"
            )));
        }
        if self.api.api_key.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "Hypixel API key missing, set {HYPIXEL_API_KEY_VAR}"
            )));
        }
        if self.discord.prefix.is_empty() {
            return Err(ConfigError::Validation(
                "command prefix must not be empty".to_string(),
            ));
        }
        if self.api.timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "API timeout must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
