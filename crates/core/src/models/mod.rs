pub mod asset;
pub mod chart;
pub mod portfolio;
