pub mod market_store;
pub mod portfolio_store;
