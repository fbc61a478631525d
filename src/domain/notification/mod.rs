//! Notification domain - rendered alerts and the channel interface

mod message;
mod notifier;

pub use message::{AlertMessage, TEST_EMAIL_BODY, TEST_EMAIL_SUBJECT};
pub use notifier::{ChannelFailure, DispatchReport, Notifier};
