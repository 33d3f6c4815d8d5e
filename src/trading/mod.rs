pub mod calculator;
pub mod history;
pub mod report;

pub use calculator::{EditError, PositionCalculator};
pub use history::{HistoryStore, EXPORT_FILE_NAME, MAX_HISTORY};
