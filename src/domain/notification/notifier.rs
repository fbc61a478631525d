//! Notification channel interface

use async_trait::async_trait;

use super::AlertMessage;
use crate::shared::errors::NotifyError;
use crate::shared::types::AlertChannel;

/// Delivers a rendered alert through one channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn channel(&self) -> AlertChannel;

    async fn dispatch(&self, alert: &AlertMessage) -> Result<(), NotifyError>;
}

#[derive(Debug)]
pub struct ChannelFailure {
    pub channel: AlertChannel,
    pub error: NotifyError,
}

/// Result of one fan-out across every configured channel
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub delivered: Vec<AlertChannel>,
    pub failures: Vec<ChannelFailure>,
}

impl DispatchReport {
    pub fn attempted(&self) -> usize {
        self.delivered.len() + self.failures.len()
    }

    pub fn failed_channels(&self) -> Vec<AlertChannel> {
        self.failures.iter().map(|f| f.channel).collect()
    }
}
