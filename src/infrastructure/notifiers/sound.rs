//! Local sound alerts via `afplay` (macOS only)

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tracing::info;

use crate::domain::notification::{AlertMessage, Notifier};
use crate::shared::errors::NotifyError;
use crate::shared::types::AlertChannel;

pub const PLAYBACK_TIMEOUT: Duration = Duration::from_secs(30);

pub struct SoundNotifier {
    sound_file: PathBuf,
    player: &'static str,
}

impl SoundNotifier {
    pub fn new(sound_file: impl Into<PathBuf>) -> Self {
        Self {
            sound_file: sound_file.into(),
            player: "afplay",
        }
    }

    pub fn sound_file(&self) -> &Path {
        &self.sound_file
    }

    async fn play(&self) -> Result<(), NotifyError> {
        if !cfg!(target_os = "macos") {
            return Err(NotifyError::UnsupportedPlatform(std::env::consts::OS));
        }
        if !tokio::fs::try_exists(&self.sound_file).await.unwrap_or(false) {
            return Err(NotifyError::MissingSoundFile(self.sound_file.display().to_string()));
        }

        let status = tokio::time::timeout(
            PLAYBACK_TIMEOUT,
            Command::new(self.player).arg(&self.sound_file).kill_on_drop(true).status(),
        )
        .await
        .map_err(|_| NotifyError::Playback(format!("{} timed out after {:?}", self.player, PLAYBACK_TIMEOUT)))?
        .map_err(|e| NotifyError::Playback(format!("failed to run {}: {}", self.player, e)))?;

        if !status.success() {
            return Err(NotifyError::Playback(format!("{} exited with {}", self.player, status)));
        }

        info!("Sound alert played successfully");
        Ok(())
    }
}

#[async_trait]
impl Notifier for SoundNotifier {
    fn channel(&self) -> AlertChannel {
        AlertChannel::Sound
    }

    async fn dispatch(&self, _alert: &AlertMessage) -> Result<(), NotifyError> {
        self.play().await
    }
}
