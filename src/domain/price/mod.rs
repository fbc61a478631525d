//! Price domain - market snapshots and the feed that produces them

mod price_feed;

pub use price_feed::PriceSource;

use chrono::{DateTime, Utc};

/// One market observation for a single asset. Produced fresh every poll.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSnapshot {
    pub asset_id: String,
    pub price: f64,
    pub volume_24h: Option<f64>,
    pub change_24h_pct: Option<f64>,
    pub observed_at: DateTime<Utc>,
}

impl PriceSnapshot {
    pub fn new(asset_id: impl Into<String>, price: f64, observed_at: DateTime<Utc>) -> Self {
        Self {
            asset_id: asset_id.into(),
            price,
            volume_24h: None,
            change_24h_pct: None,
            observed_at,
        }
    }

    pub fn with_market_data(mut self, volume_24h: Option<f64>, change_24h_pct: Option<f64>) -> Self {
        self.volume_24h = volume_24h;
        self.change_24h_pct = change_24h_pct;
        self
    }

    /// Upper-cased asset id used in alert subjects and log lines.
    pub fn symbol(&self) -> String {
        self.asset_id.to_uppercase()
    }
}
