//! CLI commands and handlers
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::alert_monitor::{AlertMonitor, MonitorConfig, DEFAULT_COOLDOWN, DEFAULT_INTERVAL};
use super::lifecycle::shutdown_on_signal;
use crate::config::Settings;
use crate::domain::alert::Condition;
use crate::domain::notification::{TEST_EMAIL_BODY, TEST_EMAIL_SUBJECT};
use crate::domain::price::PriceSource;
use crate::infrastructure::api_clients::CoinGeckoClient;
use crate::infrastructure::notifiers::{EmailNotifier, NotifierFactory};
use crate::shared::config::{ConfigLoader, NotificationConfig, DEFAULT_CONFIG_FILE, DEFAULT_SOUND_FILE};
use crate::shared::logging::DEFAULT_LOG_FILE;
use crate::shared::types::AlertChannel;
use crate::shared::utils::{format_optional, format_thousands};

#[derive(Parser)]
#[command(name = "pricewatch")]
#[command(version, about = "Crypto price alerts with sound and email notifications")]
pub struct Cli {
    /// Append-only log file
    #[arg(long, global = true, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Watch an asset and alert when a price condition is met
    Monitor(MonitorArgs),

    /// Fetch and print the current price once
    Price {
        /// CoinGecko asset id (e.g. bitcoin, pepe)
        #[arg(short, long)]
        asset: String,
    },

    /// Send a test email with the configured credentials
    TestEmail {
        /// JSON config file holding the email credentials
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
    },
}

#[derive(Args, Debug, Default)]
pub struct MonitorArgs {
    /// CoinGecko asset id (e.g. bitcoin, official-trump)
    #[arg(short, long)]
    pub asset: Option<String>,

    /// Price condition, repeatable: above:80, below:64
    #[arg(long = "condition")]
    pub conditions: Vec<Condition>,

    /// Alert channel, repeatable: sound, email
    #[arg(long = "channel")]
    pub channels: Vec<AlertChannel>,

    /// Minimum seconds between two alerts
    #[arg(long)]
    pub cooldown: Option<u64>,

    /// Seconds between price checks
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Sound file played by the sound channel
    #[arg(long)]
    pub sound_file: Option<PathBuf>,

    /// JSON config file for email credentials and preferences
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// TOML settings file; CLI flags take priority over it
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    /// Stop after this many seconds (runs until SIGINT/SIGTERM otherwise)
    #[arg(short, long)]
    pub duration: Option<u64>,
}

/// Monitor parameters after merging CLI args, settings file and defaults
#[derive(Debug, Clone)]
pub struct ResolvedMonitor {
    pub monitor: MonitorConfig,
    pub sound_file: PathBuf,
    pub config_file: PathBuf,
}

impl MonitorArgs {
    /// Priority: CLI args > settings file > defaults.
    pub fn resolve(self, settings: Settings) -> Result<ResolvedMonitor> {
        let asset_id = self
            .asset
            .or(settings.asset_id)
            .ok_or_else(|| anyhow::anyhow!("--asset is required when the settings file does not set asset_id"))?;

        let conditions = if self.conditions.is_empty() {
            settings.conditions
        } else {
            self.conditions
        };

        let channels = match (self.channels.is_empty(), settings.channels.is_empty()) {
            (false, _) => self.channels,
            (true, false) => settings.channels,
            (true, true) => vec![AlertChannel::Sound],
        };

        let cooldown = self
            .cooldown
            .or(settings.cooldown_secs)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_COOLDOWN);
        let interval = self
            .interval
            .or(settings.interval_secs)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_INTERVAL);

        let monitor = MonitorConfig::new(asset_id, conditions, channels)
            .with_cooldown(cooldown)
            .with_interval(interval);
        monitor.validate()?;

        Ok(ResolvedMonitor {
            monitor,
            sound_file: self
                .sound_file
                .or(settings.sound_file)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SOUND_FILE)),
            config_file: self
                .config
                .or(settings.config_file)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
        })
    }
}

pub struct CommandExecutor;

impl CommandExecutor {
    /// Execute the selected command
    pub async fn execute(command: Commands) -> Result<()> {
        match command {
            Commands::Monitor(args) => Self::execute_monitor_command(args).await,
            Commands::Price { asset } => Self::execute_price_command(asset).await,
            Commands::TestEmail { config } => Self::execute_test_email_command(config).await,
        }
    }

    async fn execute_monitor_command(args: MonitorArgs) -> Result<()> {
        let settings = match &args.settings {
            Some(path) => Settings::from_file(path)?,
            None => Settings::default(),
        };
        let duration = args.duration;
        let resolved = args.resolve(settings)?;

        let alert_config = ConfigLoader::load_or_create(&resolved.config_file)?;
        let notification = NotificationConfig::new(resolved.sound_file, alert_config);

        let monitor_config = resolved
            .monitor
            .with_preferences(notification.preferences.clone());
        if monitor_config.channels.contains(&AlertChannel::Email) && !notification.email.is_complete() {
            warn!(
                "Email channel enabled but {} is missing {}; email alerts will fail until it is configured",
                resolved.config_file.display(),
                notification.email.missing_fields().join(", ")
            );
        }

        info!(
            "Check interval: {}s | Cooldown: {}s",
            monitor_config.interval.as_secs(),
            monitor_config.cooldown.as_secs()
        );

        let notifiers = NotifierFactory::new(notification).create_all(&monitor_config.channels);
        let source = Arc::new(CoinGeckoClient::new()?);
        let mut monitor = AlertMonitor::new(monitor_config, source, notifiers)?;

        let shutdown = monitor.shutdown_handle();
        let signals = tokio::spawn(shutdown_on_signal(shutdown.clone()));

        if let Some(duration_secs) = duration {
            info!("Monitoring will stop after {} seconds", duration_secs);
            let timer = shutdown.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(duration_secs)).await;
                info!("Run duration elapsed, shutting down gracefully...");
                timer.request();
            });
        }

        monitor.run().await;

        shutdown.request();
        signals.await.context("signal listener task failed")?;
        Ok(())
    }

    async fn execute_price_command(asset: String) -> Result<()> {
        let client = CoinGeckoClient::new()?;
        let asset_id = asset.trim().to_lowercase();
        let snapshot = client
            .fetch(&asset_id)
            .await
            .with_context(|| format!("failed to fetch price for '{}'", asset_id))?;

        info!("{} price: ${:.8}", snapshot.symbol(), snapshot.price);
        info!("24h Change: {}%", format_optional(snapshot.change_24h_pct, 2));
        match snapshot.volume_24h {
            Some(volume) => info!("24h Volume: ${}", format_thousands(volume)),
            None => info!("24h Volume: N/A"),
        }
        Ok(())
    }

    async fn execute_test_email_command(config: PathBuf) -> Result<()> {
        let alert_config = ConfigLoader::load_or_create(&config)?;
        EmailNotifier::new(alert_config.email)
            .send(TEST_EMAIL_SUBJECT.to_string(), TEST_EMAIL_BODY.to_string())
            .await
            .context("failed to send test email")?;
        info!("Test email sent successfully!");
        Ok(())
    }
}
