use serde::{Deserialize, Serialize};

use crate::models::params::lenient_f64;

/// Derived figures for one set of [`TradeParameters`](crate::models::TradeParameters).
///
/// Only produced by [`compute`](crate::core::position_sizer::compute); nothing
/// mutates a result after the fact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalculationResult {
    #[serde(deserialize_with = "lenient_f64")]
    pub risk_amount: f64,
    /// Percent move from entry to stop, always >= 0.
    #[serde(deserialize_with = "lenient_f64")]
    pub distance_to_stop_loss: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub position_size: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub leverage: f64,
}
