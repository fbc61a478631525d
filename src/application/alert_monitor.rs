//! Price alert monitor: poll, evaluate, gate, fan out, sleep

use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::lifecycle::{MonitorState, ShutdownHandle};
use crate::domain::alert::{Condition, ConditionSet, CooldownGate};
use crate::domain::notification::{AlertMessage, ChannelFailure, DispatchReport, Notifier};
use crate::domain::price::{PriceSnapshot, PriceSource};
use crate::shared::config::NotificationPreferences;
use crate::shared::errors::{ConfigError, FetchError};
use crate::shared::types::AlertChannel;
use crate::shared::utils::format_optional;

pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(300);
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// Monitor configuration, fixed for the whole run
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub asset_id: String,
    pub conditions: ConditionSet,
    pub channels: Vec<AlertChannel>,
    pub cooldown: Duration,
    pub interval: Duration,
    pub preferences: NotificationPreferences,
}

impl MonitorConfig {
    /// Accepts any collection of conditions and channels (a single value included)
    /// and normalizes them into ordered sequences. Duplicate channels are dropped.
    pub fn new(
        asset_id: impl Into<String>,
        conditions: impl IntoIterator<Item = Condition>,
        channels: impl IntoIterator<Item = AlertChannel>,
    ) -> Self {
        let mut unique: Vec<AlertChannel> = Vec::new();
        for channel in channels {
            if !unique.contains(&channel) {
                unique.push(channel);
            }
        }

        Self {
            asset_id: asset_id.into().trim().to_lowercase(),
            conditions: ConditionSet::new(conditions),
            channels: unique,
            cooldown: DEFAULT_COOLDOWN,
            interval: DEFAULT_INTERVAL,
            preferences: NotificationPreferences::default(),
        }
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_preferences(mut self, preferences: NotificationPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.asset_id.is_empty() {
            return Err(ConfigError::Invalid("asset id must not be empty".into()));
        }
        if self.interval.is_zero() {
            return Err(ConfigError::Invalid("poll interval must be greater than zero".into()));
        }
        if let Some(bad) = self.conditions.iter().find(|c| !c.target_price.is_finite()) {
            return Err(ConfigError::Invalid(format!("condition target must be finite: {:?}", bad)));
        }
        chrono::Duration::from_std(self.cooldown)
            .map_err(|_| ConfigError::Invalid(format!("cooldown {:?} is out of range", self.cooldown)))?;
        Ok(())
    }
}

/// What a single poll cycle did
#[derive(Debug)]
pub enum CycleOutcome {
    /// Price source failed; nothing evaluated, cooldown untouched.
    FetchFailed(FetchError),
    NoMatch { price: f64 },
    /// Conditions matched but the cooldown gate was closed.
    Suppressed { matched: Vec<Condition> },
    Alerted {
        matched: Vec<Condition>,
        report: DispatchReport,
    },
}

/// Counters reported when the loop stops
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorSummary {
    pub cycles: u64,
    pub fetch_failures: u64,
    pub alerts_sent: u64,
    pub suppressed: u64,
}

/// Polls one asset on a fixed interval and fans out alerts behind a shared cooldown.
pub struct AlertMonitor {
    config: MonitorConfig,
    source: Arc<dyn PriceSource>,
    notifiers: Vec<Box<dyn Notifier>>,
    cooldown: CooldownGate,
    shutdown: ShutdownHandle,
    state: MonitorState,
    summary: MonitorSummary,
}

impl AlertMonitor {
    pub fn new(
        config: MonitorConfig,
        source: Arc<dyn PriceSource>,
        notifiers: Vec<Box<dyn Notifier>>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let window = chrono::Duration::from_std(config.cooldown)
            .map_err(|_| ConfigError::Invalid(format!("cooldown {:?} is out of range", config.cooldown)))?;

        Ok(Self {
            config,
            source,
            notifiers,
            cooldown: CooldownGate::new(window),
            shutdown: ShutdownHandle::new(),
            state: MonitorState::Running,
            summary: MonitorSummary::default(),
        })
    }

    /// Handle for the signal layer; requesting shutdown stops the loop at the next checkpoint.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn cooldown(&self) -> &CooldownGate {
        &self.cooldown
    }

    pub fn summary(&self) -> &MonitorSummary {
        &self.summary
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Run until shutdown is requested. Each iteration: check flag, fetch,
    /// evaluate and notify, sleep. A request during the sleep cuts it short.
    pub async fn run(&mut self) -> MonitorSummary {
        let symbol = self.config.asset_id.to_uppercase();
        info!("Starting price monitoring for {}...", symbol);
        info!(
            "Alert types enabled: {}",
            self.notifiers
                .iter()
                .map(|n| n.channel().as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        for condition in self.config.conditions.iter() {
            info!("Monitoring condition: {}", condition);
        }
        if self.config.conditions.is_empty() {
            warn!("No conditions configured for {}, prices will only be logged", symbol);
        }

        while !self.shutdown.is_requested() {
            self.poll_once(Utc::now()).await;

            if self.shutdown.is_requested() {
                break;
            }
            tokio::select! {
                _ = tokio::time::sleep(self.config.interval) => {}
                _ = self.shutdown.requested() => {}
            }
        }

        self.state = MonitorState::Stopping;
        info!(
            cycles = self.summary.cycles,
            alerts = self.summary.alerts_sent,
            fetch_failures = self.summary.fetch_failures,
            suppressed = self.summary.suppressed,
            "Monitoring stopped."
        );
        self.state = MonitorState::Stopped;
        self.summary.clone()
    }

    /// One fetch-evaluate-dispatch cycle at time `now`. Never fails: every error
    /// is logged and reflected in the outcome.
    pub async fn poll_once(&mut self, now: DateTime<Utc>) -> CycleOutcome {
        self.summary.cycles += 1;

        let snapshot = match self.source.fetch(&self.config.asset_id).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.summary.fetch_failures += 1;
                error!(
                    asset = %self.config.asset_id,
                    source = self.source.name(),
                    "Failed to fetch price: {}", e
                );
                return CycleOutcome::FetchFailed(e);
            }
        };
        self.log_price(&snapshot);

        let matched = self.config.conditions.evaluate(snapshot.price);
        if matched.is_empty() {
            return CycleOutcome::NoMatch {
                price: snapshot.price,
            };
        }

        if !self.cooldown.allow(now) {
            self.summary.suppressed += 1;
            info!(
                "{} condition(s) met but alerts are cooling down ({}s remaining)",
                matched.len(),
                self.cooldown.remaining(now).num_seconds()
            );
            return CycleOutcome::Suppressed { matched };
        }

        for condition in &matched {
            info!("Alert condition met: {}", condition);
        }
        let alert = AlertMessage::new(snapshot, matched.clone())
            .with_market_data(self.config.preferences.volume_alert);
        let report = self.fan_out(&alert).await;

        self.cooldown.record(now);
        self.summary.alerts_sent += 1;
        CycleOutcome::Alerted { matched, report }
    }

    /// Dispatch to every notifier concurrently; one channel failing never skips another.
    async fn fan_out(&self, alert: &AlertMessage) -> DispatchReport {
        let results = join_all(self.notifiers.iter().map(|notifier| async move {
            (notifier.channel(), notifier.dispatch(alert).await)
        }))
        .await;

        let mut report = DispatchReport::default();
        for (channel, result) in results {
            match result {
                Ok(()) => report.delivered.push(channel),
                Err(error) => {
                    if error.is_warning() {
                        warn!(channel = %channel, "Alert not delivered: {}", error);
                    } else {
                        error!(channel = %channel, asset = %alert.snapshot.asset_id, "Alert delivery failed: {}", error);
                    }
                    report.failures.push(ChannelFailure { channel, error });
                }
            }
        }
        report
    }

    fn log_price(&self, snapshot: &PriceSnapshot) {
        let change = format_optional(snapshot.change_24h_pct, 2);
        if self.config.preferences.price_history {
            info!(
                "Current {} price: ${:.8} | 24h Change: {}%",
                snapshot.symbol(),
                snapshot.price,
                change
            );
        } else {
            debug!(
                "Current {} price: ${:.8} | 24h Change: {}%",
                snapshot.symbol(),
                snapshot.price,
                change
            );
        }
    }
}
