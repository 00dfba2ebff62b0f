use serde::{Deserialize, Serialize};

/// Base URL for asset icons served by the CoinCap CDN.
const ICON_BASE_URL: &str = "https://assets.coincap.io/assets/icons";

/// A single market quote for a tradable asset, as listed by the gateway.
///
/// Quotes are replaced wholesale on every successful page fetch and never
/// mutated in place. The gateway reports prices as decimal strings which may
/// be absent for thinly traded assets; those fields are `Option<f64>` here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetQuote {
    /// Stable gateway identifier, e.g. "bitcoin". Unique key.
    pub id: String,

    /// Human-readable name, e.g. "Bitcoin".
    pub name: String,

    /// Ticker symbol, e.g. "BTC".
    pub symbol: String,

    /// Latest price in USD. `None` when the gateway has no price data.
    pub price_usd: Option<f64>,

    /// Market capitalization in USD.
    pub market_cap_usd: Option<f64>,

    /// Signed 24-hour change, in percent (e.g. -3.52).
    pub change_percent_24hr: Option<f64>,
}

impl AssetQuote {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        symbol: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            symbol: symbol.into(),
            price_usd: None,
            market_cap_usd: None,
            change_percent_24hr: None,
        }
    }

    /// Whether the gateway reported a price for this asset.
    /// Quotes without a price cannot be added to the portfolio.
    #[must_use]
    pub fn has_price(&self) -> bool {
        self.price_usd.is_some()
    }

    /// URL of the asset's icon on the CoinCap CDN.
    #[must_use]
    pub fn icon_url(&self) -> String {
        format!("{ICON_BASE_URL}/{}@2x.png", self.symbol.to_lowercase())
    }
}
