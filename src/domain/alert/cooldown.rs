//! Shared cooldown between notification fan-outs

use chrono::{DateTime, Duration, Utc};

/// Open until the first alert, then closed for `window` after each recorded alert.
/// One gate is shared by every condition.
#[derive(Debug, Clone)]
pub struct CooldownGate {
    window: Duration,
    last_alert_at: Option<DateTime<Utc>>,
}

impl CooldownGate {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_alert_at: None,
        }
    }

    pub fn allow(&self, now: DateTime<Utc>) -> bool {
        match self.last_alert_at {
            None => true,
            Some(last) => now - last >= self.window,
        }
    }

    pub fn record(&mut self, now: DateTime<Utc>) {
        self.last_alert_at = Some(now);
    }

    /// Time left before the gate opens again, zero when already open.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        match self.last_alert_at {
            Some(last) if now - last < self.window => self.window - (now - last),
            _ => Duration::zero(),
        }
    }

    pub fn last_alert_at(&self) -> Option<DateTime<Utc>> {
        self.last_alert_at
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}
