//! Configuration system for tweetlens.
//!
//! Provides layered configuration from multiple sources:
//!
//! 1. **Compiled defaults** - Sensible defaults built into the binary
//! 2. **User config file** - `~/.config/tweetlens/config.toml`
//! 3. **Environment variables** - `TWEETLENS_*` prefix
//! 4. **CLI arguments** - Highest priority, always wins
//!
//! # Example Configuration File
//!
//! ```toml
//! [paths]
//! db = "~/.local/share/tweetlens/tweetlens.db"
//!
//! [batching]
//! batch_size = 100
//! page_size = 5
//!
//! [completion]
//! endpoint = "https://api.openai.com/v1"
//! model = "gpt-4o"
//!
//! [server]
//! host = "127.0.0.1"
//! port = 5000
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Main configuration structure for tweetlens.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path-related configuration.
    pub paths: PathsConfig,
    /// Batch window and feed page sizing.
    pub batching: BatchingConfig,
    /// Chat-completion provider configuration.
    pub completion: CompletionConfig,
    /// HTTP API server configuration.
    pub server: ServerConfig,
}

/// Path configuration for the tweet store location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Path to the `SQLite` database file.
    /// Environment variable: `TWEETLENS_DB`
    pub db: Option<PathBuf>,
}

/// Batch window and feed page sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchingConfig {
    /// Records per batch window over the store.
    /// Environment variable: `TWEETLENS_BATCH_SIZE`
    pub batch_size: usize,

    /// Tweets shown per feed page.
    pub page_size: usize,
}

/// Chat-completion provider configuration.
///
/// The API key is deliberately not a config-file field; it is read from
/// `OPENAI_API_KEY` so keys stay out of dotfiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Base URL of an OpenAI-compatible API.
    /// Environment variable: `TWEETLENS_COMPLETION_ENDPOINT`
    pub endpoint: String,

    /// Model name sent with every completion request.
    /// Environment variable: `TWEETLENS_COMPLETION_MODEL`
    pub model: String,
}

/// HTTP API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address. Environment variable: `TWEETLENS_HOST`
    pub host: String,

    /// Bind port. Environment variable: `TWEETLENS_PORT`
    pub port: u16,
}

impl Default for BatchingConfig {
    fn default() -> Self {
        Self {
            batch_size: crate::BATCH_SIZE,
            page_size: crate::FEED_PAGE_SIZE,
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. User config file (~/.config/tweetlens/config.toml)
    /// 3. Compiled defaults
    pub fn load() -> Self {
        let mut config = Self::default();

        // Load from user config file
        if let Some(user_config) = Self::load_user_config() {
            config.merge(user_config);
        }

        // Override from environment variables
        config.apply_env_overrides();

        debug!("Configuration loaded: {:?}", config);
        config
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &PathBuf) -> Option<Self> {
        if !path.exists() {
            debug!("Config file not found: {}", path.display());
            return None;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    info!("Loaded config from: {}", path.display());
                    Some(config)
                }
                Err(e) => {
                    warn!("Failed to parse config file {}: {}", path.display(), e);
                    None
                }
            },
            Err(e) => {
                warn!("Failed to read config file {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Load the user configuration file from the standard location.
    fn load_user_config() -> Option<Self> {
        let config_path = Self::user_config_path()?;
        Self::load_from_file(&config_path)
    }

    /// Get the path to the user configuration file.
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tweetlens").join("config.toml"))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(db) = std::env::var("TWEETLENS_DB") {
            self.paths.db = Some(PathBuf::from(db));
        }

        if let Ok(size) = std::env::var("TWEETLENS_BATCH_SIZE") {
            if let Ok(n) = size.parse() {
                self.batching.batch_size = n;
            }
        }
        if let Ok(size) = std::env::var("TWEETLENS_PAGE_SIZE") {
            if let Ok(n) = size.parse() {
                self.batching.page_size = n;
            }
        }

        if let Ok(endpoint) = std::env::var("TWEETLENS_COMPLETION_ENDPOINT") {
            self.completion.endpoint = endpoint;
        }
        if let Ok(model) = std::env::var("TWEETLENS_COMPLETION_MODEL") {
            self.completion.model = model;
        }

        if let Ok(host) = std::env::var("TWEETLENS_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("TWEETLENS_PORT") {
            if let Ok(n) = port.parse() {
                self.server.port = n;
            }
        }
    }

    /// Merge another config into this one (other takes precedence).
    fn merge(&mut self, other: Self) {
        if other.paths.db.is_some() {
            self.paths.db = other.paths.db;
        }

        self.batching.batch_size = other.batching.batch_size;
        self.batching.page_size = other.batching.page_size;

        self.completion.endpoint = other.completion.endpoint;
        self.completion.model = other.completion.model;

        self.server.host = other.server.host;
        self.server.port = other.server.port;
    }

    /// Get the database path, using defaults if not configured.
    pub fn db_path(&self) -> PathBuf {
        self.paths
            .db
            .clone()
            .unwrap_or_else(crate::default_db_path)
    }

    /// The completion API key, from the environment only.
    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        std::env::var(crate::ask::API_KEY_VAR).ok()
    }

    /// Save the current configuration to the user config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined,
    /// the parent directory cannot be created, or the file cannot be written.
    pub fn save(&self) -> std::io::Result<()> {
        let config_path = Self::user_config_path().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            )
        })?;

        // Create parent directory if needed
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        std::fs::write(&config_path, content)?;
        info!("Saved config to: {}", config_path.display());
        Ok(())
    }

    /// Generate a default configuration file content.
    #[must_use]
    pub fn default_config_content() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}
