use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::core::compute;
use crate::models::{CalculationResult, HistoryRecord, TradeParameters};
use crate::storage::{KeyValueStore, StoreError, HISTORY_KEY};

/// Number of saved calculations kept; older ones are dropped.
pub const MAX_HISTORY: usize = 10;

/// File name used when exporting the history.
pub const EXPORT_FILE_NAME: &str = "monsteralpha-calculations.json";

/// Bounded, persisted list of saved calculations, newest first.
///
/// The whole list is rewritten on every change. Persisted content that
/// doesn't parse is treated as an empty history.
pub struct HistoryStore<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: KeyValueStore> HistoryStore<S, SystemClock> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> HistoryStore<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    /// Timestamp the pair, put it at the front and drop anything past
    /// [`MAX_HISTORY`].
    ///
    /// The stored figures are always `compute(params)`; a result that
    /// disagrees with its inputs is replaced. A history that exists but can't
    /// be read is an error here rather than being overwritten.
    pub fn record(
        &self,
        params: &TradeParameters,
        result: &CalculationResult,
    ) -> Result<HistoryRecord, StoreError> {
        let params = params.sanitized();
        let derived = compute(&params);
        if *result != derived {
            warn!("Result does not match its inputs, storing recomputed figures");
        }
        let record = HistoryRecord::new(params, derived, self.clock.now());

        let mut records = self.load()?.records;
        records.insert(0, record.clone());
        let dropped = records.len().saturating_sub(MAX_HISTORY);
        records.truncate(MAX_HISTORY);

        self.write(&records)?;

        info!(
            "Saved calculation: {} entry ${:.2} size ${:.2} ({} in history)",
            record.params.trade_type,
            record.params.entry_price,
            record.result.position_size,
            records.len()
        );
        if dropped > 0 {
            debug!("Dropped {} oldest calculation(s)", dropped);
        }

        Ok(record)
    }

    /// Saved calculations, most recent first.
    pub fn list(&self) -> Vec<HistoryRecord> {
        match self.load() {
            Ok(loaded) => loaded.records,
            Err(e) => {
                warn!("Could not read history, treating as empty: {}", e);
                Vec::new()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.list().len()
    }

    pub fn is_empty(&self) -> bool {
        self.list().is_empty()
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(HISTORY_KEY)?;
        info!("History cleared");
        Ok(())
    }

    /// The persisted history bytes, for download.
    ///
    /// When every stored entry reads back cleanly the stored text is returned
    /// untouched, so it matches the persisted array even if another writer
    /// produced it. Otherwise the readable entries are re-serialized
    /// pretty-printed, the same form [`record`](Self::record) writes.
    pub fn export(&self) -> Result<Vec<u8>, StoreError> {
        match self.load()? {
            Loaded {
                raw: Some(raw),
                clean: true,
                ..
            } => Ok(raw.into_bytes()),
            loaded => Ok(serde_json::to_vec_pretty(&loaded.records)?),
        }
    }

    /// Write [`export`](Self::export) to `dir/`[`EXPORT_FILE_NAME`].
    pub fn export_to(&self, dir: &Path) -> Result<PathBuf, StoreError> {
        let bytes = self.export()?;
        let path = dir.join(EXPORT_FILE_NAME);
        let io_err = |source| StoreError::Io {
            key: EXPORT_FILE_NAME.to_string(),
            source,
        };
        fs::create_dir_all(dir).map_err(io_err)?;
        fs::write(&path, bytes).map_err(io_err)?;
        info!("Exported history to {}", path.display());
        Ok(path)
    }

    /// Read errors from the store propagate; unparsable content does not.
    fn load(&self) -> Result<Loaded, StoreError> {
        match self.store.get(HISTORY_KEY)? {
            Some(raw) => {
                let (records, clean) = parse_history(&raw);
                Ok(Loaded {
                    raw: Some(raw),
                    records,
                    clean,
                })
            }
            None => Ok(Loaded::default()),
        }
    }

    fn write(&self, records: &[HistoryRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(records)?;
        self.store.set(HISTORY_KEY, &json)
    }
}

#[derive(Default)]
struct Loaded {
    raw: Option<String>,
    records: Vec<HistoryRecord>,
    /// Every entry parsed and the list is within the cap.
    clean: bool,
}

fn parse_history(raw: &str) -> (Vec<HistoryRecord>, bool) {
    let entries = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(entries)) => entries,
        Ok(_) => {
            warn!("Persisted history is not a list, treating as empty");
            return (Vec::new(), false);
        }
        Err(e) => {
            warn!("Persisted history is corrupt, treating as empty: {}", e);
            return (Vec::new(), false);
        }
    };

    let total = entries.len();
    let mut records: Vec<HistoryRecord> = entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<HistoryRecord>(entry) {
            Ok(r) => Some(r),
            Err(e) => {
                warn!("Skipping unreadable history entry: {}", e);
                None
            }
        })
        .collect();
    let clean = records.len() == total && total <= MAX_HISTORY;
    records.truncate(MAX_HISTORY);
    (records, clean)
}
