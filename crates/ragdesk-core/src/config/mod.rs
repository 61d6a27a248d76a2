use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{endpoints, limits, locale, paths};
use crate::error::DeskError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub locale: LocaleSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub health_timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Overrides the default location of the session file.
    pub sessions_path: Option<PathBuf>,
}

/// Presentation knobs for timestamps and failure entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleSettings {
    pub timestamp_format: String,
    pub error_template: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: endpoints::DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: limits::REQUEST_TIMEOUT_SECS,
            health_timeout_secs: limits::HEALTH_TIMEOUT_SECS,
        }
    }
}

impl ApiSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.health_timeout_secs)
    }
}

impl Default for LocaleSettings {
    fn default() -> Self {
        Self {
            timestamp_format: locale::TIMESTAMP_FORMAT.to_string(),
            error_template: locale::ERROR_TEMPLATE.to_string(),
        }
    }
}

impl LocaleSettings {
    /// Current local time rendered with the configured format.
    pub fn now_timestamp(&self) -> String {
        chrono::Local::now()
            .format(&self.timestamp_format)
            .to_string()
    }

    pub fn render_error(&self, error: &str) -> String {
        if self.error_template.contains(locale::ERROR_PLACEHOLDER) {
            self.error_template.replace(locale::ERROR_PLACEHOLDER, error)
        } else {
            format!("{}{}", self.error_template, error)
        }
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(paths::CONFIG_DIR)
            .join(paths::CONFIG_FILE)
    }

    /// Load settings from the default location, falling back to defaults.
    pub fn load() -> Self {
        let mut settings = Self::load_from(&Self::config_path());
        settings.apply_env_overrides();
        settings
    }

    /// Load settings from an explicit file. Missing or malformed files yield defaults.
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            if let Ok(content) = std::fs::read_to_string(path) {
                match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Ignoring malformed config {}: {}", path.display(), e)
                    }
                }
            }
        }
        Self::default()
    }

    pub fn save(&self) -> Result<(), DeskError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), DeskError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| DeskError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(endpoints::BASE_URL_ENV) {
            if !url.trim().is_empty() {
                self.api.base_url = url.trim().to_string();
            }
        }
    }

    /// Where the session collection lives on disk.
    pub fn sessions_path(&self) -> PathBuf {
        if let Some(ref path) = self.storage.sessions_path {
            return path.clone();
        }
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(paths::CONFIG_DIR)
            .join(paths::SESSIONS_FILE)
    }
}
