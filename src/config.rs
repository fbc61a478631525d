use serde::Deserialize;
use std::{fs, path::Path, path::PathBuf};

use crate::domain::alert::Condition;
use crate::shared::errors::ConfigError;
use crate::shared::types::AlertChannel;

/// Optional monitor settings file (TOML). Every field may be overridden from the CLI.
///
/// ```toml
/// asset_id = "bitcoin"
/// channels = ["sound", "email"]
/// cooldown_secs = 300
/// interval_secs = 60
///
/// [[conditions]]
/// direction = "below"
/// target_price = 64.0
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub asset_id: Option<String>,
    pub conditions: Vec<Condition>,
    pub channels: Vec<AlertChannel>,
    pub cooldown_secs: Option<u64>,
    pub interval_secs: Option<u64>,
    pub sound_file: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
}

impl Settings {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&s).map_err(|source| ConfigError::Settings {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watch.toml");
        fs::write(
            &path,
            r#"
asset_id = "official-trump"
channels = ["sound", "email"]
cooldown_secs = 300
interval_secs = 60

[[conditions]]
direction = "below"
target_price = 64.0

[[conditions]]
direction = "above"
target_price = 80.0
"#,
        )
        .unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.asset_id.as_deref(), Some("official-trump"));
        assert_eq!(settings.conditions, vec![Condition::below(64.0), Condition::above(80.0)]);
        assert_eq!(settings.channels, vec![AlertChannel::Sound, AlertChannel::Email]);
        assert_eq!(settings.cooldown_secs, Some(300));
        assert!(settings.sound_file.is_none());
    }

    #[test]
    fn test_unknown_direction_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watch.toml");
        fs::write(&path, "[[conditions]]\ndirection = \"sideways\"\ntarget_price = 1.0\n").unwrap();

        assert!(matches!(Settings::from_file(&path), Err(ConfigError::Settings { .. })));
    }

    #[test]
    fn test_missing_settings_file() {
        assert!(matches!(
            Settings::from_file("/nonexistent/watch.toml"),
            Err(ConfigError::Io { .. })
        ));
    }
}
