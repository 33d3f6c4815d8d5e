//! Command-line definition and dispatch.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::core::compute;
use crate::models::{parse_number, ParamField, TradeParameters, TradeType};
use crate::storage::FileStore;
use crate::trading::report;
use crate::trading::{HistoryStore, PositionCalculator, MAX_HISTORY};

#[derive(Parser, Debug)]
#[command(name = "monsteralpha", about = "Crypto position size and leverage calculator")]
pub struct Cli {
    /// Directory holding saved state (overrides MONSTERALPHA_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute once from the given inputs without touching saved state
    Calc {
        #[arg(long, default_value = "0", value_parser = number, allow_negative_numbers = true)]
        capital: f64,
        /// Risk per trade, in percent
        #[arg(long, default_value = "0", value_parser = number, allow_negative_numbers = true)]
        risk: f64,
        #[arg(long, default_value = "0", value_parser = number, allow_negative_numbers = true)]
        entry: f64,
        #[arg(long, default_value = "0", value_parser = number, allow_negative_numbers = true)]
        stop: f64,
        #[arg(long, default_value = "0", value_parser = number, allow_negative_numbers = true)]
        amount: f64,
        #[arg(long)]
        short: bool,
    },
    /// Show the current inputs and results
    Show,
    /// Edit one input (totalCapital, riskPercentage, entryPrice, stopLossPrice, tradeAmount, tradeType)
    Set {
        field: ParamField,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Save the current calculation to history
    Save,
    /// List saved calculations
    History,
    /// Clear saved calculations
    Clear {
        /// Also reset the current inputs
        #[arg(long)]
        all: bool,
    },
    /// Write history to monsteralpha-calculations.json
    Export {
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Print the formulas used
    Formulas,
}

fn number(s: &str) -> Result<f64, String> {
    Ok(parse_number(s))
}

/// Run a command and return what it prints.
pub fn run(cli: Cli, cfg: &Config) -> Result<String> {
    let store = FileStore::new(cli.data_dir.unwrap_or_else(|| cfg.data_dir.clone()));
    let history = HistoryStore::new(&store);

    let out = match cli.command {
        Command::Calc {
            capital,
            risk,
            entry,
            stop,
            amount,
            short,
        } => {
            let trade_type = if short { TradeType::Short } else { TradeType::Long };
            let params = TradeParameters::new(capital, risk, entry, stop, amount, trade_type);
            format!(
                "{}\n{}",
                report::render_params(&params),
                report::render_result(&compute(&params))
            )
        }
        Command::Show => {
            let calc = PositionCalculator::load(&store);
            format!(
                "{}\n{}",
                report::render_params(calc.params()),
                report::render_result(calc.result())
            )
        }
        Command::Set { field, value } => {
            let mut calc = PositionCalculator::load(&store);
            calc.set(field, &value)
                .with_context(|| format!("saving {}", field))?;
            format!(
                "{}\n{}",
                report::render_params(calc.params()),
                report::render_result(calc.result())
            )
        }
        Command::Save => {
            let calc = PositionCalculator::load(&store);
            let record = calc.save(&history).context("saving calculation")?;
            format!(
                "Saved ({} of {} kept)\n{}",
                history.len(),
                MAX_HISTORY,
                report::render_entry(&record)
            )
        }
        Command::History => report::render_history(&history.list()),
        Command::Clear { all } => {
            history.clear().context("clearing history")?;
            if all {
                let mut calc = PositionCalculator::load(&store);
                calc.reset().context("resetting inputs")?;
                "History and inputs cleared\n".to_string()
            } else {
                "History cleared\n".to_string()
            }
        }
        Command::Export { dir } => {
            let dir = dir.unwrap_or_else(|| cfg.export_dir.clone());
            let count = history.len();
            let path = history.export_to(&dir).context("exporting history")?;
            format!("Exported {} calculation(s) to {}\n", count, path.display())
        }
        Command::Formulas => report::render_formulas(),
    };

    Ok(out)
}
