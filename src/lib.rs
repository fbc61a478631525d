//! Pricewatch - crypto price alert bot
//! Polls a price feed, evaluates threshold conditions and notifies by sound or email

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

// Re-export main types for convenience
pub use application::{AlertMonitor, MonitorConfig, ShutdownHandle};
pub use domain::alert::{Condition, ConditionSet, CooldownGate};
pub use domain::price::{PriceSnapshot, PriceSource};
pub use domain::notification::Notifier;
