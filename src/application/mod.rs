//! Application layer - the alert monitor and CLI use cases

pub mod alert_monitor;
pub mod commands;
pub mod lifecycle;

pub use alert_monitor::{AlertMonitor, CycleOutcome, MonitorConfig, MonitorSummary};
pub use commands::{Cli, CommandExecutor, Commands};
pub use lifecycle::{MonitorState, ShutdownHandle};
