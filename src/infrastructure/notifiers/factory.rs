use super::{EmailNotifier, SoundNotifier};
use crate::domain::notification::Notifier;
use crate::shared::config::NotificationConfig;
use crate::shared::types::AlertChannel;

/// Factory for creating channel notifiers
pub struct NotifierFactory {
    config: NotificationConfig,
}

impl NotifierFactory {
    pub fn new(config: NotificationConfig) -> Self {
        Self { config }
    }

    pub fn create_notifier(&self, channel: AlertChannel) -> Box<dyn Notifier> {
        match channel {
            AlertChannel::Sound => Box::new(SoundNotifier::new(self.config.sound_file.clone())),
            AlertChannel::Email => Box::new(EmailNotifier::new(self.config.email.clone())),
        }
    }

    /// One notifier per channel, in the given order.
    pub fn create_all(&self, channels: &[AlertChannel]) -> Vec<Box<dyn Notifier>> {
        channels.iter().map(|&c| self.create_notifier(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::AlertConfig;

    #[test]
    fn test_create_all_keeps_channel_order() {
        let factory = NotifierFactory::new(NotificationConfig::new("ping.aiff", AlertConfig::default()));
        let notifiers = factory.create_all(&[AlertChannel::Email, AlertChannel::Sound]);
        let channels: Vec<_> = notifiers.iter().map(|n| n.channel()).collect();
        assert_eq!(channels, vec![AlertChannel::Email, AlertChannel::Sound]);
    }
}
