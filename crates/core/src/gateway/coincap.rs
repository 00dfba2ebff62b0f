use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::asset::AssetQuote;
use crate::models::chart::ChartPoint;

use super::traits::MarketDataGateway;

const DEFAULT_BASE_URL: &str = "https://api.coincap.io/v2";

/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "COINCAP_API_BASE";

/// CoinCap API gateway for cryptocurrency market data.
///
/// - **Free**: No API key required, no strict rate limits.
/// - **Data**: 2000+ cryptocurrencies, real-time and historical.
/// - **Endpoints**: `/assets?offset={n}&limit={n}`, `/assets/{id}/history`
///
/// CoinCap uses lowercase ids like "bitcoin", "ethereum"; prices come back
/// as decimal strings and may be null for thinly traded assets.
pub struct CoinCapGateway {
    client: Client,
    base_url: String,
}

impl CoinCapGateway {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the gateway at a non-default base URL (e.g. a proxy or a test
    /// server). Trailing slashes are trimmed.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build a gateway honoring the `COINCAP_API_BASE` environment variable,
    /// falling back to the public API.
    pub fn from_env() -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::with_base_url(url),
            _ => Self::new(),
        }
    }
}

impl Default for CoinCapGateway {
    fn default() -> Self {
        Self::new()
    }
}

// ── CoinCap API response types ──────────────────────────────────────

#[derive(Deserialize)]
struct AssetsResponse {
    data: Vec<AssetRecord>,
}

#[derive(Deserialize)]
struct AssetRecord {
    id: String,
    name: String,
    symbol: String,
    #[serde(rename = "priceUsd")]
    price_usd: Option<String>,
    #[serde(rename = "marketCapUsd")]
    market_cap_usd: Option<String>,
    #[serde(rename = "changePercent24Hr")]
    change_percent_24hr: Option<String>,
}

impl AssetRecord {
    /// Convert the wire record into the domain model, parsing decimal
    /// strings. Unparseable or missing numbers become `None` rather than
    /// failing the whole page.
    fn into_quote(self) -> AssetQuote {
        fn parse(field: Option<String>) -> Option<f64> {
            field.and_then(|s| s.parse::<f64>().ok()).filter(|v| v.is_finite())
        }
        AssetQuote {
            id: self.id,
            name: self.name,
            symbol: self.symbol,
            price_usd: parse(self.price_usd),
            market_cap_usd: parse(self.market_cap_usd),
            change_percent_24hr: parse(self.change_percent_24hr),
        }
    }
}

#[derive(Deserialize)]
struct HistoryResponse {
    data: Vec<HistoryPoint>,
}

#[derive(Deserialize)]
struct HistoryPoint {
    #[serde(rename = "priceUsd")]
    price_usd: String,
    time: i64, // unix timestamp in milliseconds
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl MarketDataGateway for CoinCapGateway {
    fn name(&self) -> &str {
        "CoinCap"
    }

    async fn fetch_assets(&self, offset: u32, limit: u32) -> Result<Vec<AssetQuote>, CoreError> {
        let url = format!("{}/assets?offset={offset}&limit={limit}", self.base_url);
        debug!(offset, limit, "fetching asset listings");

        let resp: AssetsResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .json()
            .await
            .map_err(|e| {
                CoreError::Gateway(format!("Failed to parse asset listing response: {e}"))
            })?;

        Ok(resp.data.into_iter().map(AssetRecord::into_quote).collect())
    }

    async fn fetch_history(
        &self,
        asset_id: &str,
        interval: &str,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<ChartPoint>, CoreError> {
        let url = format!(
            "{}/assets/{asset_id}/history?interval={interval}&start={start_ms}&end={end_ms}",
            self.base_url
        );
        debug!(asset_id, interval, "fetching price history");

        let resp: HistoryResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .json()
            .await
            .map_err(|e| {
                CoreError::Gateway(format!("Failed to parse history for {asset_id}: {e}"))
            })?;

        // Drop points with unparseable prices or timestamps instead of
        // failing the whole chart.
        let points: Vec<ChartPoint> = resp
            .data
            .iter()
            .filter_map(|p| {
                let price_usd: f64 = p.price_usd.parse().ok()?;
                let time = chrono::DateTime::from_timestamp_millis(p.time)?;
                Some(ChartPoint { time, price_usd })
            })
            .collect();

        Ok(points)
    }
}
