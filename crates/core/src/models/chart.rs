use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A single price-history data point for chart rendering.
///
/// The core produces these — the frontend just renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Timestamp of the observation (UTC).
    pub time: DateTime<Utc>,

    /// Price in USD at that time.
    pub price_usd: f64,
}

/// User-facing chart timeframe selector.
///
/// Each timeframe fixes BOTH the lookback window and the gateway interval
/// code, so every selection yields a usable point density:
///
/// | Timeframe | Window   | Interval | ~Points |
/// |-----------|----------|----------|---------|
/// | Day       | 24 hours | `m1`     | 1440    |
/// | Week      | 7 days   | `h12`    | 14      |
/// | Month     | 30 days  | `d1`     | 30      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeframe {
    Day,
    Week,
    Month,
}

impl Timeframe {
    /// The gateway's interval code for this timeframe.
    #[must_use]
    pub fn interval_code(&self) -> &'static str {
        match self {
            Timeframe::Day => "m1",
            Timeframe::Week => "h12",
            Timeframe::Month => "d1",
        }
    }

    /// How far back from "now" the history window reaches.
    #[must_use]
    pub fn lookback(&self) -> Duration {
        match self {
            Timeframe::Day => Duration::days(1),
            Timeframe::Week => Duration::days(7),
            Timeframe::Month => Duration::days(30),
        }
    }

    /// The `(start, end)` request window in epoch milliseconds, ending at `now`.
    #[must_use]
    pub fn window_ms(&self, now: DateTime<Utc>) -> (i64, i64) {
        let end = now.timestamp_millis();
        let start = (now - self.lookback()).timestamp_millis();
        (start, end)
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Timeframe::Day => write!(f, "Day"),
            Timeframe::Week => write!(f, "Week"),
            Timeframe::Month => write!(f, "Month"),
        }
    }
}
