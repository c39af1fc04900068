// Rule-based trading strategies, selected by timeframe class
pub mod scalping;
pub mod trend;

use crate::indicators::IndicatorSnapshot;
use crate::models::{Candle, StrategyClass, StrategySignal, Timeframe};

pub use scalping::ScalpingStrategy;
pub use trend::TrendStrategy;

/// Base trait for all rule-based strategies.
///
/// Implementations are pure functions of the candle window and its
/// indicator snapshot: no I/O, no hidden state.
pub trait Strategy: Send + Sync {
    /// Produce a directional signal with a corroboration flag
    fn evaluate(&self, window: &[Candle], snapshot: &IndicatorSnapshot) -> StrategySignal;

    /// Strategy name for logs
    fn name(&self) -> &str;

    /// Class of the strategy; drives stop/target placement downstream
    fn class(&self) -> StrategyClass;
}

/// Select the strategy for a timeframe: scalping rules below M15,
/// trend-following rules at M15 and above.
pub fn for_timeframe(timeframe: Timeframe) -> Box<dyn Strategy> {
    if timeframe.is_scalping() {
        Box::new(ScalpingStrategy::default())
    } else {
        Box::new(TrendStrategy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_maps_timeframe_class() {
        assert_eq!(for_timeframe(Timeframe::M5).class(), StrategyClass::Scalping);
        assert_eq!(for_timeframe(Timeframe::M15).class(), StrategyClass::Trend);
        assert_eq!(for_timeframe(Timeframe::H1).class(), StrategyClass::Trend);
    }
}
