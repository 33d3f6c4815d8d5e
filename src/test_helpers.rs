use chrono::{DateTime, Utc};

use crate::models::{TradeParameters, TradeType};

/// 2024-01-15 12:00 UTC.
pub fn base_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-01-15T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// $10,000 capital, 2% risk, $500 committed, long.
pub fn long_params(entry: f64, stop: f64) -> TradeParameters {
    TradeParameters::new(10000.0, 2.0, entry, stop, 500.0, TradeType::Long)
}

/// Same sizing inputs as [`long_params`], short.
pub fn short_params(entry: f64, stop: f64) -> TradeParameters {
    TradeParameters::new(10000.0, 2.0, entry, stop, 500.0, TradeType::Short)
}
