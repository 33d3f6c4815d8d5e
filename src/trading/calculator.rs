use tracing::{debug, warn};

use crate::clock::Clock;
use crate::core::compute;
use crate::models::{
    CalculationResult, HistoryRecord, ParamError, ParamField, TradeParameters, TradeType,
};
use crate::storage::{KeyValueStore, StoreError, CALCULATOR_KEY};
use crate::trading::history::HistoryStore;

#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error(transparent)]
    Param(#[from] ParamError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The live inputs being edited, and their result.
///
/// Every mutation recomputes the result and persists the inputs, so `result()`
/// always matches `params()` and a restart picks up where editing left off.
pub struct PositionCalculator<S> {
    store: S,
    params: TradeParameters,
    result: CalculationResult,
}

impl<S: KeyValueStore> PositionCalculator<S> {
    /// Restore the last edited inputs, or start from defaults.
    pub fn load(store: S) -> Self {
        let params = read_params(&store).unwrap_or_default();
        Self {
            store,
            params,
            result: compute(&params),
        }
    }

    pub fn params(&self) -> &TradeParameters {
        &self.params
    }

    pub fn result(&self) -> &CalculationResult {
        &self.result
    }

    /// Set one field from raw text. Unparsable numbers become zero.
    pub fn set(&mut self, field: ParamField, raw: &str) -> Result<&CalculationResult, StoreError> {
        let mut next = self.params;
        next.set_raw(field, raw);
        self.apply(next)
    }

    /// Set a numeric field. Nothing changes or is persisted for `TradeType`.
    pub fn set_value(&mut self, field: ParamField, value: f64) -> Result<&CalculationResult, EditError> {
        let mut next = self.params;
        next.set_value(field, value)?;
        Ok(self.apply(next)?)
    }

    pub fn set_trade_type(&mut self, trade_type: TradeType) -> Result<&CalculationResult, StoreError> {
        let mut next = self.params;
        next.trade_type = trade_type;
        self.apply(next)
    }

    /// Replace all inputs at once.
    pub fn replace(&mut self, params: TradeParameters) -> Result<&CalculationResult, StoreError> {
        self.apply(params.sanitized())
    }

    /// Hand a copy of the current pair to the history.
    pub fn save<H, C>(&self, history: &HistoryStore<H, C>) -> Result<HistoryRecord, StoreError>
    where
        H: KeyValueStore,
        C: Clock,
    {
        history.record(&self.params, &self.result)
    }

    /// Forget the persisted inputs and go back to defaults.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.store.remove(CALCULATOR_KEY)?;
        self.params = TradeParameters::default();
        self.result = compute(&self.params);
        debug!("Calculator inputs reset");
        Ok(())
    }

    fn apply(&mut self, params: TradeParameters) -> Result<&CalculationResult, StoreError> {
        self.params = params;
        self.result = compute(&self.params);
        let json = serde_json::to_string(&self.params)?;
        self.store.set(CALCULATOR_KEY, &json)?;
        Ok(&self.result)
    }
}

fn read_params<S: KeyValueStore>(store: &S) -> Option<TradeParameters> {
    let raw = match store.get(CALCULATOR_KEY) {
        Ok(raw) => raw?,
        Err(e) => {
            warn!("Could not read calculator inputs, using defaults: {}", e);
            return None;
        }
    };
    match serde_json::from_str::<TradeParameters>(&raw) {
        Ok(p) => Some(p.sanitized()),
        Err(e) => {
            warn!("Persisted calculator inputs are corrupt, using defaults: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::storage::MemoryStore;
    use crate::test_helpers::{base_time, long_params};

    #[test]
    fn starts_from_defaults() {
        let calc = PositionCalculator::load(MemoryStore::new());
        assert_eq!(*calc.params(), TradeParameters::default());
        assert_eq!(*calc.result(), CalculationResult::default());
        assert_eq!(calc.params().trade_type, TradeType::Long);
    }

    #[test]
    fn every_edit_recomputes() {
        let mut calc = PositionCalculator::load(MemoryStore::new());
        calc.set(ParamField::TotalCapital, "10000").unwrap();
        calc.set(ParamField::RiskPercentage, "2").unwrap();
        assert!((calc.result().risk_amount - 200.0).abs() < 1e-9);
        assert_eq!(calc.result().position_size, 0.0);

        calc.set(ParamField::EntryPrice, "100").unwrap();
        calc.set(ParamField::StopLossPrice, "95").unwrap();
        let r = calc.set(ParamField::TradeAmount, "500").unwrap();
        assert!((r.leverage - 8.0).abs() < 1e-9);

        calc.set(ParamField::TradeType, "short").unwrap();
        assert_eq!(calc.params().trade_type, TradeType::Short);
        assert!((calc.result().distance_to_stop_loss - 5.0).abs() < 1e-9);

        let r = calc.set(ParamField::TradeAmount, "not a number").unwrap();
        assert_eq!(r.leverage, 0.0);
        assert_eq!(*calc.result(), compute(calc.params()));
    }

    #[test]
    fn inputs_survive_reload() {
        let kv = MemoryStore::new();
        let mut calc = PositionCalculator::load(kv.clone());
        calc.replace(long_params(100.0, 95.0)).unwrap();
        calc.set_value(ParamField::EntryPrice, f64::NAN).unwrap();
        assert_eq!(calc.params().entry_price, 0.0);
        calc.set_value(ParamField::EntryPrice, 100.0).unwrap();

        let reloaded = PositionCalculator::load(kv.clone());
        assert_eq!(reloaded.params(), calc.params());
        assert_eq!(reloaded.result(), calc.result());

        let stored: serde_json::Value =
            serde_json::from_str(&kv.get(CALCULATOR_KEY).unwrap().unwrap()).unwrap();
        assert!(stored.get("timestamp").is_none());
        assert!(stored.get("riskAmount").is_none());
        assert_eq!(stored["entryPrice"], 100.0);
    }

    #[test]
    fn set_value_on_trade_type_is_an_error() {
        let kv = MemoryStore::new();
        let mut calc = PositionCalculator::load(kv.clone());
        let err = calc.set_value(ParamField::TradeType, 1.0).unwrap_err();
        assert!(matches!(err, EditError::Param(ParamError::NotNumeric(ParamField::TradeType))));
        assert!(kv.get(CALCULATOR_KEY).unwrap().is_none());
        assert_eq!(*calc.params(), TradeParameters::default());
    }

    #[test]
    fn corrupt_inputs_fall_back_to_defaults() {
        let kv = MemoryStore::new();
        kv.set(CALCULATOR_KEY, "[1, 2").unwrap();
        let calc = PositionCalculator::load(kv);
        assert_eq!(*calc.params(), TradeParameters::default());
    }

    #[test]
    fn save_copies_pair_into_history() {
        let kv = MemoryStore::new();
        let history = HistoryStore::with_clock(kv.clone(), FixedClock::new(base_time()));
        let mut calc = PositionCalculator::load(kv);
        calc.replace(long_params(100.0, 95.0)).unwrap();

        let saved = calc.save(&history).unwrap();
        calc.set(ParamField::EntryPrice, "250").unwrap();

        let list = history.list();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0], saved);
        assert_eq!(list[0].params.entry_price, 100.0);
        assert_eq!(list[0].result, compute(&long_params(100.0, 95.0)));
    }

    #[test]
    fn reset_wipes_persisted_inputs() {
        let kv = MemoryStore::new();
        let mut calc = PositionCalculator::load(kv.clone());
        calc.replace(long_params(100.0, 95.0)).unwrap();
        calc.reset().unwrap();
        assert_eq!(*calc.params(), TradeParameters::default());
        assert!(kv.get(CALCULATOR_KEY).unwrap().is_none());
    }
}
