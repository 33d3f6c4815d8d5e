pub mod direction;
pub mod params;
pub mod record;
pub mod result;

pub use direction::TradeType;
pub use params::{coerce_number, parse_number, ParamError, ParamField, TradeParameters};
pub use record::HistoryRecord;
pub use result::CalculationResult;
