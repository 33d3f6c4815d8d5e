use std::fmt::Write;

use crate::models::{CalculationResult, HistoryRecord, TradeParameters};

pub const FORMULAS: &[&str] = &[
    "Risk Amount = Total Capital × Risk %",
    "Distance to SL = |(Entry - Stop Loss) / Entry| × 100",
    "Position Size = Risk Amount ÷ (Distance to SL / 100)",
    "Leverage = Position Size ÷ Trade Amount",
];

pub fn money(x: f64) -> String {
    format!("${:.2}", x)
}

pub fn percent(x: f64) -> String {
    format!("{:.2}%", x)
}

pub fn multiple(x: f64) -> String {
    format!("{:.2}x", x)
}

/// Short display date for a saved entry, e.g. `Jan 15, 12:00 PM` (UTC).
/// Unparsable timestamps are shown as-is.
pub fn short_date(timestamp: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(timestamp) {
        Ok(t) => t
            .with_timezone(&chrono::Utc)
            .format("%b %-d, %I:%M %p")
            .to_string(),
        Err(_) => timestamp.to_string(),
    }
}

pub fn render_params(params: &TradeParameters) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Trading Parameters");
    let _ = writeln!(out, "  Total Capital:    {}", money(params.total_capital));
    let _ = writeln!(out, "  Risk Percentage:  {}", percent(params.risk_percentage));
    let _ = writeln!(out, "  Trade Type:       {}", params.trade_type);
    let _ = writeln!(out, "  Entry Price:      {}", money(params.entry_price));
    let _ = writeln!(out, "  Stop Loss Price:  {}", money(params.stop_loss_price));
    let _ = writeln!(out, "  Trade Amount:     {}", money(params.trade_amount));
    out
}

pub fn render_result(result: &CalculationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Calculation Results");
    let _ = writeln!(out, "  Risk Amount:           {}", money(result.risk_amount));
    let _ = writeln!(out, "  Distance to Stop Loss: {}", percent(result.distance_to_stop_loss));
    let _ = writeln!(out, "  Position Size:         {}", money(result.position_size));
    let _ = writeln!(out, "  Leverage:              {}", multiple(result.leverage));
    out
}

pub fn render_formulas() -> String {
    let mut out = String::from("Formula Reference:\n");
    for f in FORMULAS {
        let _ = writeln!(out, "  • {}", f);
    }
    out
}

pub fn render_entry(record: &HistoryRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "[{}] {}  {}",
        record.params.trade_type.as_str().to_uppercase(),
        short_date(&record.timestamp),
        money(record.params.entry_price)
    );
    let _ = writeln!(
        out,
        "  Risk {} | Size {} | Stop {} | Leverage {}",
        money(record.result.risk_amount),
        money(record.result.position_size),
        percent(record.result.distance_to_stop_loss),
        multiple(record.result.leverage)
    );
    out
}

pub fn render_history(records: &[HistoryRecord]) -> String {
    if records.is_empty() {
        return format!(
            "No calculations saved yet\nYour last {} calculations will appear here\n",
            crate::trading::history::MAX_HISTORY
        );
    }
    let mut out = format!("Calculation History ({})\n", records.len());
    for r in records {
        out.push_str(&render_entry(r));
    }
    out
}
