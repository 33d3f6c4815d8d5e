use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{CalculationResult, TradeParameters};

/// One saved calculation: inputs, outputs and when it was saved.
///
/// Serializes flat, in the same shape the history key has always held:
/// the six input fields, the four result fields, then `timestamp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(flatten)]
    pub params: TradeParameters,
    #[serde(flatten)]
    pub result: CalculationResult,
    #[serde(default)]
    pub timestamp: String,
}

impl HistoryRecord {
    pub fn new(params: TradeParameters, result: CalculationResult, at: DateTime<Utc>) -> Self {
        Self {
            params,
            result,
            timestamp: format_timestamp(at),
        }
    }

    /// Parsed timestamp, if it is valid RFC 3339.
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

/// ISO-8601 UTC with milliseconds, e.g. `2024-01-15T12:00:00.000Z`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
