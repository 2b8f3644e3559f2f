//! Configuration management
//!
//! This module handles loading, saving, and migrating the stls configuration file.
//! The configuration file is stored in TOML format at ~/.config/stls/config.toml,
//! or under `$STLS_CONFIG_DIR` when that variable is set.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::alias::Alias;
use crate::error::{Error, Result};
use crate::normalize::SeparatorStyle;

/// Current configuration schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "STLS_CONFIG_DIR";

/// Default output format
const DEFAULT_OUTPUT: &str = "human";

/// Default color setting
const DEFAULT_COLOR: &str = "auto";

/// Default separator style for display keys
const DEFAULT_SEPARATOR: &str = "native";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Schema version for migration support
    pub schema_version: u32,

    /// Default settings
    #[serde(default)]
    pub defaults: Defaults,

    /// Configured aliases
    #[serde(default)]
    pub aliases: Vec<Alias>,
}

/// Default settings for CLI behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    /// Output format: "human" or "json"
    #[serde(default = "default_output")]
    pub output: String,

    /// Color mode: "auto", "always", or "never"
    #[serde(default = "default_color")]
    pub color: String,

    /// Separator style for keys: "native", "slash", or "backslash"
    #[serde(default = "default_separator")]
    pub separator: String,
}

fn default_output() -> String {
    DEFAULT_OUTPUT.to_string()
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            separator: default_separator(),
        }
    }
}

impl Defaults {
    /// Whether JSON output is the configured default
    pub fn json(&self) -> bool {
        self.output == "json"
    }

    /// Parsed separator style
    pub fn separator_style(&self) -> Result<SeparatorStyle> {
        self.separator.parse().map_err(Error::Config)
    }

    /// Check that every setting has a known value
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.output.as_str(), "human" | "json") {
            return Err(Error::Config(format!(
                "output must be 'human' or 'json', got '{}'",
                self.output
            )));
        }
        if !matches!(self.color.as_str(), "auto" | "always" | "never") {
            return Err(Error::Config(format!(
                "color must be 'auto', 'always' or 'never', got '{}'",
                self.color
            )));
        }
        self.separator_style().map(|_| ())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            defaults: Defaults::default(),
            aliases: Vec::new(),
        }
    }
}

/// Configuration manager handles loading and saving config
#[derive(Debug)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the default config path
    pub fn new() -> Result<Self> {
        let config_dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::config_dir()
                .ok_or_else(|| Error::Config("Could not determine config directory".into()))?
                .join("stls"),
        };
        Ok(Self {
            config_path: config_dir.join("config.toml"),
        })
    }

    /// Create a ConfigManager with a custom path (useful for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Load configuration from disk
    ///
    /// If the configuration file doesn't exist, returns a default configuration.
    /// If the schema version doesn't match, attempts migration.
    pub fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&self.config_path)?;
        let mut config: Config = toml::from_str(&content)?;

        // Check schema version and migrate if necessary
        if config.schema_version < SCHEMA_VERSION {
            config = self.migrate(config)?;
        } else if config.schema_version > SCHEMA_VERSION {
            return Err(Error::Config(format!(
                "Configuration file version {} is newer than supported version {}. Please upgrade stls.",
                config.schema_version, SCHEMA_VERSION
            )));
        }
        config.defaults.validate()?;

        Ok(config)
    }

    /// Save configuration to disk
    ///
    /// Creates parent directories if they don't exist.
    /// Sets file permissions to 600 (owner read/write only).
    pub fn save(&self, config: &Config) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(config)?;
        std::fs::write(&self.config_path, content)?;

        // Set restrictive permissions on Unix systems
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.config_path, permissions)?;
        }

        Ok(())
    }

    /// Migrate configuration from older schema version
    fn migrate(&self, mut config: Config) -> Result<Config> {
        // Version 0 files predate the schema field and need no changes.
        config.schema_version = SCHEMA_VERSION;
        Ok(config)
    }
}
