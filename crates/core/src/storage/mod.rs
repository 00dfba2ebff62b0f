pub mod slot;

#[cfg(not(target_arch = "wasm32"))]
pub mod file;

use crate::errors::CoreError;
use crate::models::portfolio::PortfolioEntry;

/// Serialize the portfolio entries to the slot payload (a JSON array).
pub fn encode_entries(entries: &[PortfolioEntry]) -> Result<String, CoreError> {
    serde_json::to_string(entries)
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize portfolio: {e}")))
}

/// Parse a slot payload back into portfolio entries.
///
/// Callers on the rehydration path must treat an `Err` as an empty
/// portfolio, not a fatal failure.
pub fn decode_entries(payload: &str) -> Result<Vec<PortfolioEntry>, CoreError> {
    serde_json::from_str(payload)
        .map_err(|e| CoreError::Deserialization(format!("Failed to parse stored portfolio: {e}")))
}
