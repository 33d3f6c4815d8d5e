use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::TradeType;

/// The five numeric trade inputs plus direction.
///
/// Every numeric field is finite. Values arriving from text or from
/// persisted JSON go through [`parse_number`] / [`coerce_number`] first,
/// so anything absent, unparsable or non-finite ends up as `0.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TradeParameters {
    #[serde(deserialize_with = "lenient_f64")]
    pub total_capital: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub risk_percentage: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub entry_price: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub stop_loss_price: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub trade_amount: f64,
    pub trade_type: TradeType,
}

impl TradeParameters {
    pub fn new(
        total_capital: f64,
        risk_percentage: f64,
        entry_price: f64,
        stop_loss_price: f64,
        trade_amount: f64,
        trade_type: TradeType,
    ) -> Self {
        Self {
            total_capital,
            risk_percentage,
            entry_price,
            stop_loss_price,
            trade_amount,
            trade_type,
        }
        .sanitized()
    }

    /// Copy with every non-finite numeric field replaced by zero.
    pub fn sanitized(self) -> Self {
        Self {
            total_capital: coerce_number(self.total_capital),
            risk_percentage: coerce_number(self.risk_percentage),
            entry_price: coerce_number(self.entry_price),
            stop_loss_price: coerce_number(self.stop_loss_price),
            trade_amount: coerce_number(self.trade_amount),
            trade_type: self.trade_type,
        }
    }

    pub fn get(&self, field: ParamField) -> Option<f64> {
        match field {
            ParamField::TotalCapital => Some(self.total_capital),
            ParamField::RiskPercentage => Some(self.risk_percentage),
            ParamField::EntryPrice => Some(self.entry_price),
            ParamField::StopLossPrice => Some(self.stop_loss_price),
            ParamField::TradeAmount => Some(self.trade_amount),
            ParamField::TradeType => None,
        }
    }

    fn slot_mut(&mut self, field: ParamField) -> Option<&mut f64> {
        match field {
            ParamField::TotalCapital => Some(&mut self.total_capital),
            ParamField::RiskPercentage => Some(&mut self.risk_percentage),
            ParamField::EntryPrice => Some(&mut self.entry_price),
            ParamField::StopLossPrice => Some(&mut self.stop_loss_price),
            ParamField::TradeAmount => Some(&mut self.trade_amount),
            ParamField::TradeType => None,
        }
    }

    /// Set a numeric field. `TradeType` is rejected.
    pub fn set_value(&mut self, field: ParamField, value: f64) -> Result<(), ParamError> {
        let slot = self.slot_mut(field).ok_or(ParamError::NotNumeric(field))?;
        *slot = coerce_number(value);
        Ok(())
    }

    /// Set any field from raw user text.
    pub fn set_raw(&mut self, field: ParamField, raw: &str) {
        match field {
            ParamField::TradeType => self.trade_type = TradeType::parse_lenient(raw),
            _ => {
                if let Some(slot) = self.slot_mut(field) {
                    *slot = parse_number(raw);
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    #[error("{0} is not a numeric field")]
    NotNumeric(ParamField),
}

/// Names of the editable inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamField {
    TotalCapital,
    RiskPercentage,
    EntryPrice,
    StopLossPrice,
    TradeAmount,
    TradeType,
}

impl ParamField {
    pub const ALL: [ParamField; 6] = [
        ParamField::TotalCapital,
        ParamField::RiskPercentage,
        ParamField::EntryPrice,
        ParamField::StopLossPrice,
        ParamField::TradeAmount,
        ParamField::TradeType,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParamField::TotalCapital => "totalCapital",
            ParamField::RiskPercentage => "riskPercentage",
            ParamField::EntryPrice => "entryPrice",
            ParamField::StopLossPrice => "stopLossPrice",
            ParamField::TradeAmount => "tradeAmount",
            ParamField::TradeType => "tradeType",
        }
    }
}

impl fmt::Display for ParamField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ParamField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "totalcapital" | "capital" => Ok(ParamField::TotalCapital),
            "riskpercentage" | "riskpercent" | "risk" => Ok(ParamField::RiskPercentage),
            "entryprice" | "entry" => Ok(ParamField::EntryPrice),
            "stoplossprice" | "stoploss" | "stop" => Ok(ParamField::StopLossPrice),
            "tradeamount" | "amount" => Ok(ParamField::TradeAmount),
            "tradetype" | "type" | "direction" => Ok(ParamField::TradeType),
            _ => Err(format!("unknown field '{s}'")),
        }
    }
}

/// Replace NaN and infinities with zero.
pub fn coerce_number(x: f64) -> f64 {
    if x.is_finite() {
        x
    } else {
        0.0
    }
}

/// Parse the longest leading decimal number in `s`, like a form field does.
/// `"12.5abc"` is 12.5, `"abc"` and `""` are 0.
pub fn parse_number(s: &str) -> f64 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return 0.0;
    }

    // Exponent only counts when it has at least one digit.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    coerce_number(s[..end].parse::<f64>().unwrap_or(0.0))
}

/// Accepts numbers, numeric strings and null; everything else is zero.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => coerce_number(n.as_f64().unwrap_or(0.0)),
        serde_json::Value::String(s) => parse_number(&s),
        _ => 0.0,
    })
}
