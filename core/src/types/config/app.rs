use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Deployment configuration, persisted as worldfeel.toml.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
}

impl AppConfig {
    /// Returns the config file path within the given directory.
    pub fn path(dir: &Path) -> PathBuf {
        dir.join("worldfeel.toml")
    }

    /// Loads config from a TOML file. Returns default config if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, AppConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves config to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), AppConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validates config values and returns list of validation errors.
    /// Returns empty vec if config is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.lifecycle.retention_hours == 0 {
            errors.push("retention_hours must be at least 1".to_string());
        }

        if self.lifecycle.edit_window_minutes == 0 {
            errors.push("edit_window_minutes must be at least 1".to_string());
        }

        if self.lifecycle.cache_ttl_secs == 0 {
            errors.push("cache_ttl_secs must be at least 1".to_string());
        }

        if self.lifecycle.purge_interval_secs == 0 {
            errors.push("purge_interval_secs must be at least 1".to_string());
        }

        if u64::from(self.lifecycle.edit_window_minutes) * 60
            >= u64::from(self.lifecycle.retention_hours) * 60 * 60
        {
            errors.push("edit_window_minutes must be shorter than retention_hours".to_string());
        }

        if self.server.request_timeout_secs == 0 {
            errors.push("request_timeout_secs must be at least 1".to_string());
        }

        errors
    }

    /// Returns a validated config, replacing invalid values with defaults.
    pub fn with_defaults_for_invalid(&self) -> Self {
        let defaults = Self::default();
        let or_default = |value: u32, default: u32| if value == 0 { default } else { value };

        let mut lifecycle = LifecycleConfig {
            retention_hours: or_default(
                self.lifecycle.retention_hours,
                defaults.lifecycle.retention_hours,
            ),
            edit_window_minutes: or_default(
                self.lifecycle.edit_window_minutes,
                defaults.lifecycle.edit_window_minutes,
            ),
            cache_ttl_secs: or_default(
                self.lifecycle.cache_ttl_secs,
                defaults.lifecycle.cache_ttl_secs,
            ),
            purge_interval_secs: or_default(
                self.lifecycle.purge_interval_secs,
                defaults.lifecycle.purge_interval_secs,
            ),
        };
        if u64::from(lifecycle.edit_window_minutes) * 60
            >= u64::from(lifecycle.retention_hours) * 60 * 60
        {
            lifecycle.edit_window_minutes = defaults.lifecycle.edit_window_minutes;
            lifecycle.retention_hours = defaults.lifecycle.retention_hours;
        }

        Self {
            server: ServerConfig {
                bind: self.server.bind.clone(),
                request_timeout_secs: or_default(
                    self.server.request_timeout_secs,
                    defaults.server.request_timeout_secs,
                ),
            },
            storage: self.storage.clone(),
            lifecycle,
            identity: self.identity.clone(),
            vocabulary: self.vocabulary.clone(),
        }
    }
}

/// HTTP listener settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_request_timeout_secs() -> u32 {
    5
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

/// Record lifetime, edit window and cache settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LifecycleConfig {
    #[serde(default = "default_retention_hours")]
    pub retention_hours: u32,
    #[serde(default = "default_edit_window_minutes")]
    pub edit_window_minutes: u32,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u32,
    #[serde(default = "default_purge_interval_secs")]
    pub purge_interval_secs: u32,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            retention_hours: default_retention_hours(),
            edit_window_minutes: default_edit_window_minutes(),
            cache_ttl_secs: default_cache_ttl_secs(),
            purge_interval_secs: default_purge_interval_secs(),
        }
    }
}

fn default_retention_hours() -> u32 {
    24
}

fn default_edit_window_minutes() -> u32 {
    5
}

fn default_cache_ttl_secs() -> u32 {
    3
}

fn default_purge_interval_secs() -> u32 {
    300
}

/// Identity salt settings. The secret is usually supplied through the
/// environment instead of the file.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct IdentityConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

impl std::fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Deployment-specific canonical words on top of the built-in vocabulary.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VocabularyConfig {
    #[serde(default)]
    pub extra_words: Vec<String>,
}

/// Errors that can occur when loading or saving config.
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
