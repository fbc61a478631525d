//! Alert rendering

use chrono::{DateTime, Local};

use crate::domain::alert::Condition;
use crate::domain::price::PriceSnapshot;
use crate::shared::utils::format_thousands;

pub const TEST_EMAIL_SUBJECT: &str = "Test Email from Price Alert Bot";
pub const TEST_EMAIL_BODY: &str = "This is a test message. Email alerts are configured correctly.";

/// One aggregated alert per fan-out: the snapshot plus every condition met in the cycle.
#[derive(Debug, Clone)]
pub struct AlertMessage {
    pub snapshot: PriceSnapshot,
    pub triggered: Vec<Condition>,
    pub include_market_data: bool,
}

impl AlertMessage {
    pub fn new(snapshot: PriceSnapshot, triggered: Vec<Condition>) -> Self {
        Self {
            snapshot,
            triggered,
            include_market_data: true,
        }
    }

    pub fn with_market_data(mut self, include: bool) -> Self {
        self.include_market_data = include;
        self
    }

    /// `"Price below $64; Price above $80"`
    pub fn conditions_text(&self) -> String {
        self.triggered
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn subject(&self) -> String {
        format!("🚨 Price Alert: {} {}", self.snapshot.symbol(), self.conditions_text())
    }

    pub fn body(&self) -> String {
        let local: DateTime<Local> = self.snapshot.observed_at.with_timezone(&Local);
        self.render_body(&local.format("%Y-%m-%d %H:%M:%S").to_string())
    }

    fn render_body(&self, timestamp: &str) -> String {
        let mut body = format!(
            "Price Alert for {}!\n\nCurrent Price: ${:.8}\n",
            self.snapshot.symbol(),
            self.snapshot.price
        );
        for condition in &self.triggered {
            body.push_str(&format!("Condition Met: {}\n", condition));
        }
        if self.include_market_data {
            let change = match self.snapshot.change_24h_pct {
                Some(c) => format!("{:.2}%", c),
                None => "N/A".to_string(),
            };
            body.push_str(&format!("24h Change: {}\n", change));
            let volume = match self.snapshot.volume_24h {
                Some(v) => format!("${}", format_thousands(v)),
                None => "N/A".to_string(),
            };
            body.push_str(&format!("24h Volume: {}\n", volume));
        }
        body.push_str(&format!("Time: {}\n", timestamp));
        body
    }
}
