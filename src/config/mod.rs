//! Configuration management for tornboard

mod sellers;

pub use sellers::{extract_player_ids, import_player_ids};

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client::queue::{DEFAULT_CALLS_PER_MINUTE, DEFAULT_INTER_CALL_DELAY};
use crate::client::torn::{API_BASE_URL, DEFAULT_TIMEOUT};
use crate::client::{Credential, QueueSettings};
use crate::error::{ConfigError, Result};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Torn API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// API host override (defaults to the public API)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_host: Option<String>,

    /// Where the crawler keeps its state database
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    #[serde(default)]
    pub queue: QueueConfig,

    #[serde(default)]
    pub bazaar: BazaarConfig,
}

/// Request queue tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    pub calls_per_minute: u32,
    pub inter_call_delay_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            calls_per_minute: DEFAULT_CALLS_PER_MINUTE,
            inter_call_delay_ms: DEFAULT_INTER_CALL_DELAY.as_millis() as u64,
            request_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl QueueConfig {
    pub fn settings(&self) -> QueueSettings {
        QueueSettings::per_minute(self.calls_per_minute)
            .inter_call_delay(Duration::from_millis(self.inter_call_delay_ms))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Bazaar listing preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BazaarConfig {
    /// Player ids whose bazaars are listed; empty lists your own
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sellers: Vec<u64>,
}

impl AppConfig {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".tornboard").join("config.yaml"))
    }

    /// `path` if given, otherwise the default path
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load from `path` or the default location
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        Self::load_from(&Self::resolve_path(path)?)
    }

    /// Save to `path` or the default location
    pub fn save_at(&self, path: Option<&str>) -> Result<()> {
        self.save_to(&Self::resolve_path(path)?)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound.into());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        std::fs::write(path, contents)?;

        // The file holds the API key
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.queue.calls_per_minute == 0 {
            return Err(ConfigError::Invalid("queue.calls_per_minute must be at least 1".to_string()).into());
        }
        if self.queue.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid("queue.request_timeout_secs must be at least 1".to_string()).into());
        }
        Ok(())
    }

    /// The configured key, or `MissingApiKey`.
    pub fn credential(&self) -> Result<Credential> {
        self.api_key
            .as_deref()
            .map(Credential::new)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey.into())
    }

    pub fn api_host(&self) -> &str {
        self.api_host.as_deref().unwrap_or(API_BASE_URL)
    }

    /// Data directory for the crawler state, defaulting to the platform
    /// data dir.
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("tornboard")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.api_key.is_none());
        assert_eq!(config.api_host(), "https://api.torn.com");
        assert_eq!(config.queue.calls_per_minute, 60);
        assert_eq!(config.queue.inter_call_delay_ms, 100);
        assert_eq!(config.queue.request_timeout_secs, 30);
        assert!(config.bazaar.sellers.is_empty());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "api_key: abc\nqueue:\n  calls_per_minute: 20\n").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.queue.calls_per_minute, 20);
        assert_eq!(config.queue.request_timeout_secs, 30);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let config = AppConfig {
            api_key: Some("abc".to_string()),
            bazaar: BazaarConfig { sellers: vec![10, 11] },
            ..Default::default()
        };
        config.save_to(&path).unwrap();

        assert_eq!(AppConfig::load_from(&path).unwrap(), config);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = AppConfig::load_from(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, crate::Error::Config(ConfigError::NotFound)));
    }

    #[test]
    fn test_zero_budget_rejected() {
        let config = AppConfig {
            queue: QueueConfig {
                calls_per_minute: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_credential_requires_key() {
        assert!(matches!(
            AppConfig::default().credential(),
            Err(crate::Error::Config(ConfigError::MissingApiKey))
        ));
        let config = AppConfig {
            api_key: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(config.credential().is_err());
        let config = AppConfig {
            api_key: Some("abc".to_string()),
            ..Default::default()
        };
        assert_eq!(config.credential().unwrap().expose(), "abc");
    }
}
