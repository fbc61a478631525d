//! Infrastructure layer - price provider client and notification channels

pub mod api_clients;
pub mod notifiers;
