//! Configuration Storage Implementation
//!
//! JSON file-based storage with:
//! - Atomic writes using temp file + rename
//! - Validation before anything reaches disk
//! - Thread-safe access via RwLock
//! - Default configuration generation

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;

use super::settings::SidebarConfig;
use crate::core::types::WorkArea;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Default location of `config.json`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("widget-sidebar")
        .join("config.json")
}

/// Configuration store settings
#[derive(Debug, Clone)]
pub struct ConfigStoreConfig {
    /// Path to the configuration file
    pub config_path: PathBuf,
    /// Whether to create default config if not exists
    pub create_default: bool,
}

impl Default for ConfigStoreConfig {
    fn default() -> Self {
        Self {
            config_path: default_config_path(),
            create_default: true,
        }
    }
}

impl ConfigStoreConfig {
    pub fn at(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            create_default: true,
        }
    }
}

/// Configuration store with thread-safe access
pub struct ConfigStore {
    config: Arc<RwLock<SidebarConfig>>,
    settings: ConfigStoreConfig,
}

impl ConfigStore {
    /// Open the store, writing defaults when the file does not exist yet.
    ///
    /// A file that does not parse or validate is ignored in favor of
    /// defaults, so the settings commands can still repair it.
    pub async fn new(settings: ConfigStoreConfig) -> ConfigResult<Self> {
        if let Some(parent) = settings.config_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let config = if tokio::fs::try_exists(&settings.config_path).await? {
            match Self::load_from_file(&settings.config_path).await {
                Ok(config) => config,
                // Keep the file as is until the next write so it can be fixed by hand
                Err(e @ (ConfigError::Json(_) | ConfigError::Invalid(_))) => {
                    tracing::warn!(
                        "Ignoring unusable config at {:?}, using defaults: {}",
                        settings.config_path,
                        e
                    );
                    SidebarConfig::default()
                }
                Err(e) => return Err(e),
            }
        } else if settings.create_default {
            let default_config = SidebarConfig::default();
            Self::save_to_file(&settings.config_path, &default_config).await?;
            tracing::info!("Created default config at {:?}", settings.config_path);
            default_config
        } else {
            return Err(ConfigError::NotFound(settings.config_path.clone()));
        };

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            settings,
        })
    }

    async fn load_from_file(path: &Path) -> ConfigResult<SidebarConfig> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: SidebarConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    async fn save_to_file(path: &Path, config: &SidebarConfig) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(config)?;

        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &content).await?;
        tokio::fs::rename(&temp_path, path).await?;

        Ok(())
    }

    /// Get current configuration (read-only)
    pub async fn get(&self) -> SidebarConfig {
        self.config.read().await.clone()
    }

    /// Apply `updater`, validate, then persist.
    ///
    /// An invalid result is rejected and neither memory nor disk change.
    pub async fn update<F>(&self, updater: F) -> ConfigResult<SidebarConfig>
    where
        F: FnOnce(&mut SidebarConfig),
    {
        let mut config = self.config.write().await;

        let mut next = config.clone();
        updater(&mut next);
        next.validate()?;
        next.last_modified = chrono::Utc::now().to_rfc3339();

        Self::save_to_file(&self.settings.config_path, &next).await?;
        *config = next;

        Ok(config.clone())
    }

    /// Replace the entire configuration
    pub async fn set(&self, new_config: SidebarConfig) -> ConfigResult<()> {
        self.update(|config| *config = new_config).await?;
        Ok(())
    }

    /// Reset to default configuration
    pub async fn reset(&self) -> ConfigResult<SidebarConfig> {
        let default_config = SidebarConfig::default();
        self.set(default_config).await?;
        Ok(self.get().await)
    }

    /// Get configuration file path
    pub fn config_path(&self) -> &Path {
        &self.settings.config_path
    }
}

// Convenience methods for specific config sections
impl ConfigStore {
    /// Switch work area reservation on or off
    pub async fn set_reservation_enabled(&self, enabled: bool) -> ConfigResult<SidebarConfig> {
        self.update(|config| {
            config.reservation.enabled = enabled;
        })
        .await
    }

    /// Remember the baseline while space is reserved; `None` once restored
    pub async fn record_baseline(&self, baseline: Option<WorkArea>) -> ConfigResult<SidebarConfig> {
        self.update(|config| {
            config.saved_baseline = baseline;
        })
        .await
    }
}
