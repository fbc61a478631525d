//! Price feed interface

use async_trait::async_trait;

use super::PriceSnapshot;
use crate::shared::errors::FetchError;

/// Source of market snapshots. Implementations bound every call with a timeout;
/// the monitor treats a call as a black box that either yields a snapshot or fails.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Provider name for log lines.
    fn name(&self) -> &str;

    async fn fetch(&self, asset_id: &str) -> Result<PriceSnapshot, FetchError>;
}
