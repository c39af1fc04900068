use super::Strategy;
use crate::indicators::IndicatorSnapshot;
use crate::models::{Candle, Direction, StrategyClass, StrategySignal};

/// Trend-following rules for M15 and above.
///
/// Direction comes from close vs. SMA plus RSI bands; confirmation is
/// an impulse bar: body above 1.5x the trailing average body on above-
/// average volume.
#[derive(Debug, Clone)]
pub struct TrendStrategy {
    pub rsi_buy_above: f64,
    pub rsi_sell_below: f64,
    pub impulse_body_factor: f64,
}

impl Default for TrendStrategy {
    fn default() -> Self {
        Self {
            rsi_buy_above: 55.0,
            rsi_sell_below: 45.0,
            impulse_body_factor: 1.5,
        }
    }
}

impl Strategy for TrendStrategy {
    fn evaluate(&self, window: &[Candle], snapshot: &IndicatorSnapshot) -> StrategySignal {
        let Some(latest) = window.last() else {
            return StrategySignal::none();
        };

        let direction = if latest.close > snapshot.sma && snapshot.rsi > self.rsi_buy_above {
            Direction::Buy
        } else if latest.close < snapshot.sma && snapshot.rsi < self.rsi_sell_below {
            Direction::Sell
        } else {
            return StrategySignal::none();
        };

        let is_impulse = latest.body() > self.impulse_body_factor * snapshot.avg_body
            && latest.volume > snapshot.avg_volume;

        StrategySignal {
            direction: Some(direction),
            confirmed: is_impulse,
        }
    }

    fn name(&self) -> &str {
        "trend"
    }

    fn class(&self) -> StrategyClass {
        StrategyClass::Trend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn window_with_latest(open: f64, close: f64, volume: f64) -> Vec<Candle> {
        vec![Candle {
            timestamp: Utc.timestamp_opt(0, 0).unwrap(),
            open,
            high: open.max(close) + 0.5,
            low: open.min(close) - 0.5,
            close,
            volume,
        }]
    }

    fn snapshot(sma: f64, rsi: f64) -> IndicatorSnapshot {
        IndicatorSnapshot {
            sma,
            rsi,
            ema_fast: 100.0,
            ema_slow: 100.0,
            atr: 1.0,
            support: 95.0,
            resistance: 105.0,
            avg_body: 1.0,
            avg_volume: 1000.0,
        }
    }

    #[test]
    fn test_impulse_buy() {
        let strategy = TrendStrategy::default();
        // Body 2.0 vs avg 1.0, volume above average, close above SMA
        let window = window_with_latest(100.0, 102.0, 1500.0);
        let signal = strategy.evaluate(&window, &snapshot(101.0, 60.0));

        assert_eq!(signal.direction, Some(Direction::Buy));
        assert!(signal.confirmed);
    }

    #[test]
    fn test_sell_without_impulse() {
        let strategy = TrendStrategy::default();
        // Small body: directional but unconfirmed
        let window = window_with_latest(100.0, 99.5, 900.0);
        let signal = strategy.evaluate(&window, &snapshot(101.0, 40.0));

        assert_eq!(signal.direction, Some(Direction::Sell));
        assert!(!signal.confirmed);
    }

    #[test]
    fn test_impulse_needs_volume_too() {
        let strategy = TrendStrategy::default();
        // Big body but volume below average
        let window = window_with_latest(100.0, 103.0, 800.0);
        let signal = strategy.evaluate(&window, &snapshot(101.0, 60.0));

        assert!(!signal.confirmed);
    }

    #[test]
    fn test_no_default_side_in_the_middle() {
        let strategy = TrendStrategy::default();
        // Close above SMA but RSI inside the bands
        let window = window_with_latest(100.0, 102.0, 1500.0);
        let signal = strategy.evaluate(&window, &snapshot(101.0, 50.0));

        assert_eq!(signal, StrategySignal::none());
    }
}
