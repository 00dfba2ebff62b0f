use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::asset::AssetQuote;
use crate::models::chart::ChartPoint;

/// Trait abstraction over the remote market-data API.
///
/// The stores only consume this trait, never a concrete HTTP client. If the
/// gateway changes (or a test needs canned data), only the implementation is
/// swapped — the rest of the codebase is untouched.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait MarketDataGateway: Send + Sync {
    /// Human-readable name of this gateway (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch one page of asset listings.
    /// `offset` is the absolute record offset, `limit` the page size.
    async fn fetch_assets(&self, offset: u32, limit: u32) -> Result<Vec<AssetQuote>, CoreError>;

    /// Fetch historical price points for one asset.
    /// `interval` is a gateway interval code (see `Timeframe::interval_code`),
    /// `start_ms`/`end_ms` bound the window in epoch milliseconds.
    async fn fetch_history(
        &self,
        asset_id: &str,
        interval: &str,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<ChartPoint>, CoreError>;
}
