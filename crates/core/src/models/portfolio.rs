use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

use super::asset::AssetQuote;

/// One tracked holding in the user's simulated portfolio.
///
/// `price` and `change_percent_24hr` are snapshots taken at add time — they
/// are NOT live-updated when the market list refreshes. The portfolio holds
/// at most one entry per `id`; adding the same asset again replaces the
/// entry wholesale (amounts are never summed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    /// Gateway asset id this entry refers to. Not re-validated against the
    /// currently listed page — the asset may have dropped off the listing.
    pub id: String,

    pub name: String,

    pub symbol: String,

    /// Price in USD at the moment the entry was added.
    pub price: f64,

    /// Held quantity. Must be >= 1.
    pub amount: f64,

    /// 24-hour change snapshot, in percent. Older persisted portfolios may
    /// lack this field; a missing value counts as zero in aggregates.
    #[serde(default)]
    pub change_percent_24hr: Option<f64>,
}

impl PortfolioEntry {
    /// Build an entry by snapshotting a market quote at the given quantity.
    /// Fails if the quote carries no price (nothing meaningful to track).
    pub fn from_quote(quote: &AssetQuote, amount: f64) -> Result<Self, CoreError> {
        let price = quote.price_usd.ok_or_else(|| {
            CoreError::Validation(format!("Asset '{}' has no price data", quote.id))
        })?;
        let entry = Self {
            id: quote.id.clone(),
            name: quote.name.clone(),
            symbol: quote.symbol.clone(),
            price,
            amount,
            change_percent_24hr: quote.change_percent_24hr,
        };
        entry.validate()?;
        Ok(entry)
    }

    /// Check the store's input contract: non-empty id and amount >= 1.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.id.trim().is_empty() {
            return Err(CoreError::Validation(
                "Portfolio entry id must not be empty".into(),
            ));
        }
        if self.amount.is_nan() || self.amount < 1.0 {
            return Err(CoreError::Validation(format!(
                "Portfolio entry amount must be >= 1, got {}",
                self.amount
            )));
        }
        Ok(())
    }

    /// Cost of this holding: `amount * price`.
    #[must_use]
    pub fn cost(&self) -> f64 {
        self.amount * self.price
    }

    /// Absolute 24-hour change of this holding in USD.
    /// A missing change snapshot counts as zero.
    #[must_use]
    pub fn change(&self) -> f64 {
        self.cost() * self.change_percent_24hr.unwrap_or(0.0) / 100.0
    }
}

/// Derived portfolio totals. Recomputed from the current entry set after
/// every mutation; never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PortfolioAggregate {
    /// Sum of `amount * price` over all entries, in USD.
    pub total_cost: f64,

    /// Sum of each holding's absolute 24-hour change, in USD.
    pub total_change: f64,
}
