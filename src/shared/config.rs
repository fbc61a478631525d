//! Persisted notification configuration (JSON) and its bootstrap

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::shared::errors::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "crypto_config.json";
pub const DEFAULT_SOUND_FILE: &str = "/System/Library/Sounds/Ping.aiff";

/// SMTP credentials. Empty strings mean "not configured".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailSettings {
    pub sender_email: String,
    pub sender_password: String,
    pub receiver_email: String,
}

impl EmailSettings {
    /// Seeds settings from `SENDER_EMAIL`, `SENDER_PASSWORD` and `RECEIVER_EMAIL`.
    pub fn from_env_seed<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            sender_email: lookup("SENDER_EMAIL").unwrap_or_default(),
            sender_password: lookup("SENDER_PASSWORD").unwrap_or_default(),
            receiver_email: lookup("RECEIVER_EMAIL").unwrap_or_default(),
        }
    }

    /// Names of the fields that are still empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.sender_email.trim().is_empty() {
            missing.push("sender_email");
        }
        if self.sender_password.is_empty() {
            missing.push("sender_password");
        }
        if self.receiver_email.trim().is_empty() {
            missing.push("receiver_email");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPreferences {
    /// Log every observed price at info level (debug otherwise).
    pub price_history: bool,
    /// Include 24h change and volume in alert bodies.
    pub volume_alert: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            price_history: true,
            volume_alert: true,
        }
    }
}

/// On-disk schema of the alert config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub email: EmailSettings,
    pub notification_preferences: NotificationPreferences,
}

/// Channel settings handed to the notifiers. Read-only for the whole run.
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub sound_file: PathBuf,
    pub email: EmailSettings,
    pub preferences: NotificationPreferences,
}

impl NotificationConfig {
    pub fn new(sound_file: impl Into<PathBuf>, config: AlertConfig) -> Self {
        Self {
            sound_file: sound_file.into(),
            email: config.email,
            preferences: config.notification_preferences,
        }
    }
}

/// Config file loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the config file, creating a default one seeded from the environment
    /// when it does not exist yet.
    pub fn load_or_create(path: impl AsRef<Path>) -> Result<AlertConfig, ConfigError> {
        Self::load_or_create_with(path, |key| std::env::var(key).ok())
    }

    pub fn load_or_create_with<F>(path: impl AsRef<Path>, env: F) -> Result<AlertConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => {
                let config: AlertConfig =
                    serde_json::from_str(&content).map_err(|source| ConfigError::Malformed {
                        path: path.display().to_string(),
                        source,
                    })?;
                info!("Loaded alert config from {}", path.display());
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = AlertConfig {
                    email: EmailSettings::from_env_seed(env),
                    notification_preferences: NotificationPreferences::default(),
                };
                Self::save(path, &config)?;
                warn!("Config file {} not found, created a default one", path.display());
                Ok(config)
            }
            Err(source) => Err(ConfigError::Io {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    pub fn save(path: impl AsRef<Path>, config: &AlertConfig) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let io_err = |source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        };
        let content = serde_json::to_string_pretty(config).map_err(|source| ConfigError::Malformed {
            path: path.display().to_string(),
            source,
        })?;
        fs::write(path, content).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_creates_default_without_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crypto_config.json");

        let config = ConfigLoader::load_or_create_with(&path, |_| None).unwrap();
        assert_eq!(config, AlertConfig::default());
        assert!(path.exists());

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["email"]["sender_email"], "");
        assert_eq!(written["email"]["sender_password"], "");
        assert_eq!(written["email"]["receiver_email"], "");
        assert_eq!(written["notification_preferences"]["price_history"], true);
        assert_eq!(written["notification_preferences"]["volume_alert"], true);
    }

    #[test]
    fn test_missing_file_seeds_from_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crypto_config.json");

        let config = ConfigLoader::load_or_create_with(&path, |key| match key {
            "SENDER_EMAIL" => Some("bot@example.com".to_string()),
            "RECEIVER_EMAIL" => Some("me@example.com".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.email.sender_email, "bot@example.com");
        assert_eq!(config.email.receiver_email, "me@example.com");
        assert_eq!(config.email.missing_fields(), vec!["sender_password"]);

        let reloaded = ConfigLoader::load_or_create_with(&path, |_| None).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_partial_config_defaults_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");
        fs::write(&path, r#"{"email": {"sender_email": "a@b.c"}}"#).unwrap();

        let config = ConfigLoader::load_or_create_with(&path, |_| None).unwrap();
        assert_eq!(config.email.sender_email, "a@b.c");
        assert_eq!(config.email.receiver_email, "");
        assert!(config.notification_preferences.volume_alert);
    }

    #[test]
    fn test_malformed_json_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = ConfigLoader::load_or_create_with(&path, |_| None).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }));
    }

    #[test]
    fn test_email_settings_completeness() {
        let settings = EmailSettings {
            sender_email: "a@b.c".into(),
            sender_password: "secret".into(),
            receiver_email: "d@e.f".into(),
        };
        assert!(settings.is_complete());
        assert_eq!(
            EmailSettings::default().missing_fields(),
            vec!["sender_email", "sender_password", "receiver_email"]
        );
    }
}
