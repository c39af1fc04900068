// Technical indicators: pure functions over the trailing candle window

pub mod atr;
pub mod levels;
pub mod moving_average;
pub mod rsi;
pub mod snapshot;

pub use atr::calculate_atr;
pub use levels::{classify_zone, rolling_levels, ZONE_PROXIMITY};
pub use moving_average::{calculate_ema, calculate_sma};
pub use rsi::calculate_rsi;
pub use snapshot::{compute_snapshot, IndicatorSnapshot};
