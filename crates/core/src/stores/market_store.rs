use chrono::Utc;
use tracing::debug;

use crate::errors::CoreError;
use crate::gateway::traits::MarketDataGateway;
use crate::models::asset::AssetQuote;
use crate::models::chart::{ChartPoint, Timeframe};

/// Page size used by the dashboard's listing table.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Upper bound on listed assets the gateway serves; fixes the page count.
pub const MAX_LISTED_ASSETS: u32 = 2000;

/// Lifecycle of the current page fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// No fetch has been started yet.
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The current page was fetched successfully.
    Ready,
    /// The last fetch failed; see `error()`.
    Failed,
}

/// Holds the currently fetched page of market quotes.
///
/// The quote list is replaced wholesale on every successful fetch and kept
/// stale-but-visible on failure. This store owns the gateway; the portfolio
/// store never fetches anything itself.
pub struct MarketListStore {
    gateway: Box<dyn MarketDataGateway>,
    quotes: Vec<AssetQuote>,
    status: FetchStatus,
    error: Option<String>,
    page: u32,
    page_size: u32,
}

impl MarketListStore {
    pub fn new(gateway: Box<dyn MarketDataGateway>) -> Self {
        Self::with_page_size(gateway, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(gateway: Box<dyn MarketDataGateway>, page_size: u32) -> Self {
        Self {
            gateway,
            quotes: Vec::new(),
            status: FetchStatus::Idle,
            error: None,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Fetch the given 1-based page from the gateway, replacing the current
    /// quote list on success.
    ///
    /// On failure the status flips to `Failed` with a message and the
    /// previously fetched quotes stay visible. The error is also returned
    /// so callers can react without re-reading store state.
    pub async fn fetch_page(&mut self, page: u32) -> Result<(), CoreError> {
        let page = page.max(1);
        let offset = (page - 1) * self.page_size;
        self.status = FetchStatus::Loading;
        self.error = None;

        match self.gateway.fetch_assets(offset, self.page_size).await {
            Ok(quotes) => {
                debug!(page, count = quotes.len(), "market page fetched");
                self.quotes = quotes;
                self.status = FetchStatus::Ready;
                self.page = page;
                Ok(())
            }
            Err(e) => {
                self.status = FetchStatus::Failed;
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Fetch price history for one asset over the given timeframe.
    /// Pass-through to the gateway; nothing is cached.
    pub async fn asset_history(
        &self,
        asset_id: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<ChartPoint>, CoreError> {
        let (start_ms, end_ms) = timeframe.window_ms(Utc::now());
        self.gateway
            .fetch_history(asset_id, timeframe.interval_code(), start_ms, end_ms)
            .await
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// The current page of quotes (possibly stale after a failed fetch).
    #[must_use]
    pub fn quotes(&self) -> &[AssetQuote] {
        &self.quotes
    }

    #[must_use]
    pub fn status(&self) -> FetchStatus {
        self.status
    }

    /// Message from the last failed fetch, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The 1-based page currently loaded (unchanged by a failed fetch).
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of pages the pagination control should offer.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        MAX_LISTED_ASSETS.div_ceil(self.page_size)
    }

    /// Look up a quote on the current page by asset id.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&AssetQuote> {
        self.quotes.iter().find(|q| q.id == id)
    }

    /// Look up a quote on the current page by ticker symbol
    /// (case-insensitive). Used for the BTC/ETH/USDT header tickers.
    #[must_use]
    pub fn find_by_symbol(&self, symbol: &str) -> Option<&AssetQuote> {
        self.quotes
            .iter()
            .find(|q| q.symbol.eq_ignore_ascii_case(symbol))
    }

    /// Filter the current page by a case-insensitive name substring.
    /// When `include_missing_prices` is false, quotes without a price are
    /// hidden (the table's "show null values" toggle, off).
    #[must_use]
    pub fn search(&self, term: &str, include_missing_prices: bool) -> Vec<&AssetQuote> {
        let needle = term.to_lowercase();
        self.quotes
            .iter()
            .filter(|q| q.name.to_lowercase().contains(&needle))
            .filter(|q| include_missing_prices || q.has_price())
            .collect()
    }
}

impl std::fmt::Debug for MarketListStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketListStore")
            .field("gateway", &self.gateway.name())
            .field("quotes", &self.quotes.len())
            .field("status", &self.status)
            .field("page", &self.page)
            .finish()
    }
}
