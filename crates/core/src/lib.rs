pub mod errors;
pub mod gateway;
pub mod models;
pub mod storage;
pub mod stores;

use errors::CoreError;
use gateway::traits::MarketDataGateway;
use models::{
    asset::AssetQuote,
    chart::{ChartPoint, Timeframe},
    portfolio::{PortfolioAggregate, PortfolioEntry},
};
use storage::slot::PortfolioSlot;
use stores::{
    market_store::{FetchStatus, MarketListStore},
    portfolio_store::PortfolioStore,
};

/// Main entry point for the crypto dashboard core.
///
/// Owns the two stores and wires the injected collaborators: the market-data
/// gateway and the persistence slot. Construct once at application startup;
/// the persisted portfolio is rehydrated synchronously inside `new`, before
/// any view code can dispatch a mutation.
#[must_use]
pub struct CryptoDashboard {
    market: MarketListStore,
    portfolio: PortfolioStore,
}

impl CryptoDashboard {
    /// Build the dashboard and rehydrate the portfolio from the slot.
    /// Startup never fails on bad persisted data — a malformed slot payload
    /// degrades to an empty portfolio.
    pub fn new(gateway: Box<dyn MarketDataGateway>, slot: Box<dyn PortfolioSlot>) -> Self {
        let market = MarketListStore::new(gateway);
        let mut portfolio = PortfolioStore::new(slot);
        portfolio.rehydrate();
        Self { market, portfolio }
    }

    // ── Market List ─────────────────────────────────────────────────

    /// Fetch the given 1-based listing page.
    pub async fn fetch_page(&mut self, page: u32) -> Result<(), CoreError> {
        self.market.fetch_page(page).await
    }

    /// The currently loaded page of quotes.
    #[must_use]
    pub fn quotes(&self) -> &[AssetQuote] {
        self.market.quotes()
    }

    #[must_use]
    pub fn fetch_status(&self) -> FetchStatus {
        self.market.status()
    }

    /// Message from the last failed fetch, if any.
    #[must_use]
    pub fn fetch_error(&self) -> Option<&str> {
        self.market.error()
    }

    /// Number of pages the pagination control should offer.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        self.market.total_pages()
    }

    /// Look up a quote on the current page by asset id.
    #[must_use]
    pub fn quote(&self, id: &str) -> Option<&AssetQuote> {
        self.market.find_by_id(id)
    }

    /// Look up a quote on the current page by ticker symbol.
    #[must_use]
    pub fn quote_by_symbol(&self, symbol: &str) -> Option<&AssetQuote> {
        self.market.find_by_symbol(symbol)
    }

    /// Filter the current page by name substring, optionally hiding quotes
    /// without price data.
    #[must_use]
    pub fn search_quotes(&self, term: &str, include_missing_prices: bool) -> Vec<&AssetQuote> {
        self.market.search(term, include_missing_prices)
    }

    // ── Price History ───────────────────────────────────────────────

    /// Fetch chart data for one asset over a timeframe.
    pub async fn asset_history(
        &self,
        asset_id: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<ChartPoint>, CoreError> {
        self.market.asset_history(asset_id, timeframe).await
    }

    // ── Portfolio ───────────────────────────────────────────────────

    /// Add a market quote to the portfolio at the given quantity, snapshotting
    /// its current price and 24h change. Replaces any existing entry for the
    /// same asset.
    pub fn add_to_portfolio(&mut self, quote: &AssetQuote, amount: f64) -> Result<(), CoreError> {
        let entry = PortfolioEntry::from_quote(quote, amount)?;
        self.portfolio.add_or_update(entry)
    }

    /// Insert or wholesale-replace a portfolio entry.
    pub fn add_or_update_entry(&mut self, entry: PortfolioEntry) -> Result<(), CoreError> {
        self.portfolio.add_or_update(entry)
    }

    /// Remove a portfolio entry by asset id.
    pub fn remove_from_portfolio(&mut self, id: &str) -> Option<PortfolioEntry> {
        self.portfolio.remove(id)
    }

    /// All tracked portfolio entries.
    #[must_use]
    pub fn portfolio_entries(&self) -> &[PortfolioEntry] {
        self.portfolio.entries()
    }

    /// Look up one portfolio entry by asset id.
    #[must_use]
    pub fn portfolio_entry(&self, id: &str) -> Option<&PortfolioEntry> {
        self.portfolio.get(id)
    }

    /// Derived portfolio totals (cost and 24h change, in USD).
    #[must_use]
    pub fn portfolio_aggregate(&self) -> PortfolioAggregate {
        self.portfolio.aggregate()
    }

    // ── Direct store access ─────────────────────────────────────────

    #[must_use]
    pub fn market(&self) -> &MarketListStore {
        &self.market
    }

    #[must_use]
    pub fn portfolio(&self) -> &PortfolioStore {
        &self.portfolio
    }
}

impl std::fmt::Debug for CryptoDashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoDashboard")
            .field("market", &self.market)
            .field("portfolio", &self.portfolio)
            .finish()
    }
}
