use super::Strategy;
use crate::indicators::IndicatorSnapshot;
use crate::models::{Candle, Direction, StrategyClass, StrategySignal};

/// Short-timeframe mean-reversion scalper.
///
/// Direction comes from RSI extremes; confirmation requires all three
/// of: EMA ordering agreeing with the direction, a direction-consistent
/// engulfing pair on the latest two candles, and volume at or above
/// 90% of the trailing average.
#[derive(Debug, Clone)]
pub struct ScalpingStrategy {
    pub rsi_buy_below: f64,
    pub rsi_sell_above: f64,
    pub volume_factor: f64,
}

impl Default for ScalpingStrategy {
    fn default() -> Self {
        Self {
            rsi_buy_below: 35.0,
            rsi_sell_above: 65.0,
            volume_factor: 0.9,
        }
    }
}

impl ScalpingStrategy {
    fn engulfing(direction: Direction, prev: &Candle, latest: &Candle) -> bool {
        match direction {
            Direction::Buy => prev.is_bearish() && latest.is_bullish(),
            Direction::Sell => prev.is_bullish() && latest.is_bearish(),
        }
    }

    fn ema_agrees(direction: Direction, snapshot: &IndicatorSnapshot) -> bool {
        match direction {
            Direction::Buy => snapshot.ema_fast > snapshot.ema_slow,
            Direction::Sell => snapshot.ema_fast < snapshot.ema_slow,
        }
    }
}

impl Strategy for ScalpingStrategy {
    fn evaluate(&self, window: &[Candle], snapshot: &IndicatorSnapshot) -> StrategySignal {
        let [.., prev, latest] = window else {
            return StrategySignal::none();
        };

        let direction = if snapshot.rsi < self.rsi_buy_below {
            Direction::Buy
        } else if snapshot.rsi > self.rsi_sell_above {
            Direction::Sell
        } else {
            return StrategySignal::none();
        };

        let confirmed = Self::ema_agrees(direction, snapshot)
            && Self::engulfing(direction, prev, latest)
            && latest.volume >= self.volume_factor * snapshot.avg_volume;

        StrategySignal {
            direction: Some(direction),
            confirmed,
        }
    }

    fn name(&self) -> &str {
        "scalping"
    }

    fn class(&self) -> StrategyClass {
        StrategyClass::Scalping
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn candle(i: i64, open: f64, close: f64, volume: f64) -> Candle {
        Candle {
            timestamp: Utc.timestamp_opt(i * 60, 0).unwrap(),
            open,
            high: open.max(close) + 0.5,
            low: open.min(close) - 0.5,
            close,
            volume,
        }
    }

    fn snapshot(rsi: f64, ema_fast: f64, ema_slow: f64, avg_volume: f64) -> IndicatorSnapshot {
        IndicatorSnapshot {
            sma: 100.0,
            rsi,
            ema_fast,
            ema_slow,
            atr: 1.0,
            support: 95.0,
            resistance: 105.0,
            avg_body: 1.0,
            avg_volume,
        }
    }

    /// Bearish candle followed by a bullish candle: bullish engulfing
    fn bullish_engulfing_window() -> Vec<Candle> {
        vec![
            candle(0, 100.0, 100.5, 1000.0),
            candle(1, 100.5, 100.0, 1000.0), // bearish
            candle(2, 100.0, 101.0, 950.0),  // bullish
        ]
    }

    #[test]
    fn test_confirmed_buy_all_conditions_met() {
        // RSI 30, fast EMA above slow, bullish engulfing, volume at 95%
        // of the trailing average
        let strategy = ScalpingStrategy::default();
        let snap = snapshot(30.0, 101.0, 100.0, 1000.0);

        let signal = strategy.evaluate(&bullish_engulfing_window(), &snap);
        assert_eq!(signal.direction, Some(Direction::Buy));
        assert!(signal.confirmed);
    }

    #[test]
    fn test_unconfirmed_when_ema_disagrees() {
        let strategy = ScalpingStrategy::default();
        let snap = snapshot(30.0, 99.0, 100.0, 1000.0);

        let signal = strategy.evaluate(&bullish_engulfing_window(), &snap);
        assert_eq!(signal.direction, Some(Direction::Buy));
        assert!(!signal.confirmed);
    }

    #[test]
    fn test_unconfirmed_without_engulfing() {
        let strategy = ScalpingStrategy::default();
        let snap = snapshot(30.0, 101.0, 100.0, 1000.0);
        // Two bullish candles: no engulfing pair
        let window = vec![
            candle(0, 100.0, 100.5, 1000.0),
            candle(1, 100.0, 100.5, 1000.0),
            candle(2, 100.0, 101.0, 950.0),
        ];

        let signal = strategy.evaluate(&window, &snap);
        assert!(!signal.confirmed);
    }

    #[test]
    fn test_unconfirmed_on_thin_volume() {
        let strategy = ScalpingStrategy::default();
        let snap = snapshot(30.0, 101.0, 100.0, 1000.0);
        let mut window = bullish_engulfing_window();
        window.last_mut().unwrap().volume = 800.0; // below 90% of 1000

        let signal = strategy.evaluate(&window, &snap);
        assert!(!signal.confirmed);
    }

    #[test]
    fn test_confirmed_sell() {
        let strategy = ScalpingStrategy::default();
        let snap = snapshot(70.0, 99.0, 100.0, 1000.0);
        let window = vec![
            candle(0, 100.0, 100.5, 1000.0),
            candle(1, 100.0, 100.8, 1000.0), // bullish
            candle(2, 100.8, 99.9, 1200.0),  // bearish
        ];

        let signal = strategy.evaluate(&window, &snap);
        assert_eq!(signal.direction, Some(Direction::Sell));
        assert!(signal.confirmed);
    }

    #[test]
    fn test_neutral_rsi_yields_no_direction() {
        let strategy = ScalpingStrategy::default();
        let snap = snapshot(50.0, 101.0, 100.0, 1000.0);

        let signal = strategy.evaluate(&bullish_engulfing_window(), &snap);
        assert_eq!(signal, StrategySignal::none());
    }
}
