use super::{calculate_atr, calculate_ema, calculate_rsi, calculate_sma, rolling_levels};
use crate::config::IndicatorConfig;
use crate::error::{EngineError, Result};
use crate::models::Candle;

/// Derived indicator values for the latest candle of a window.
///
/// Recomputed every cycle from the trailing window; never persisted.
/// A pure function of the window: identical input always yields an
/// identical snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSnapshot {
    pub sma: f64,
    pub rsi: f64,
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub atr: f64,
    pub support: f64,
    pub resistance: f64,
    /// Average candle body over the trailing corroboration window,
    /// excluding the latest candle
    pub avg_body: f64,
    /// Average volume over the trailing corroboration window,
    /// excluding the latest candle
    pub avg_volume: f64,
}

/// Minimum window length the configured indicators can work with.
///
/// The +1 terms cover indicators that difference consecutive candles;
/// the final +1 keeps one extra candle of lookback for engulfing checks.
pub fn min_window(cfg: &IndicatorConfig) -> usize {
    let base = cfg
        .sma_period
        .max(cfg.rsi_period + 1)
        .max(cfg.ema_slow_period)
        .max(cfg.atr_period + 1)
        .max(cfg.corroboration_window + 1);
    base + 1
}

/// Compute the snapshot for the latest candle of `window`.
///
/// Fails with `InsufficientData` if the window is shorter than the
/// minimum required by any configured indicator.
pub fn compute_snapshot(window: &[Candle], cfg: &IndicatorConfig) -> Result<IndicatorSnapshot> {
    let need = min_window(cfg);
    if window.len() < need {
        return Err(EngineError::InsufficientData {
            have: window.len(),
            need,
        });
    }

    let closes: Vec<f64> = window.iter().map(|c| c.close).collect();

    let sma = calculate_sma(&closes, cfg.sma_period).ok_or(short_window(window, cfg))?;
    let rsi = calculate_rsi(&closes, cfg.rsi_period).ok_or(short_window(window, cfg))?;
    let ema_fast = calculate_ema(&closes, cfg.ema_fast_period).ok_or(short_window(window, cfg))?;
    let ema_slow = calculate_ema(&closes, cfg.ema_slow_period).ok_or(short_window(window, cfg))?;
    let atr = calculate_atr(window, cfg.atr_period).ok_or(short_window(window, cfg))?;
    let (support, resistance) =
        rolling_levels(window, cfg.level_lookback).ok_or(short_window(window, cfg))?;

    // Trailing averages exclude the latest candle so the latest bar is
    // compared against its own recent past
    let history = &window[..window.len() - 1];
    let tail = &history[history.len().saturating_sub(cfg.corroboration_window)..];
    let avg_body = tail.iter().map(|c| c.body()).sum::<f64>() / tail.len() as f64;
    let avg_volume = tail.iter().map(|c| c.volume).sum::<f64>() / tail.len() as f64;

    Ok(IndicatorSnapshot {
        sma,
        rsi,
        ema_fast,
        ema_slow,
        atr,
        support,
        resistance,
        avg_body,
        avg_volume,
    })
}

fn short_window(window: &[Candle], cfg: &IndicatorConfig) -> EngineError {
    EngineError::InsufficientData {
        have: window.len(),
        need: min_window(cfg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn window(n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| {
                let base = 100.0 + (i as f64 * 0.3).sin();
                Candle {
                    timestamp: Utc.timestamp_opt(i as i64 * 300, 0).unwrap(),
                    open: base,
                    high: base + 1.0,
                    low: base - 1.0,
                    close: base + 0.5,
                    volume: 1000.0 + i as f64,
                }
            })
            .collect()
    }

    #[test]
    fn test_snapshot_rejects_short_window() {
        let cfg = IndicatorConfig::default();
        let result = compute_snapshot(&window(5), &cfg);
        assert!(matches!(
            result,
            Err(EngineError::InsufficientData { have: 5, .. })
        ));
    }

    #[test]
    fn test_snapshot_is_deterministic() {
        let cfg = IndicatorConfig::default();
        let candles = window(50);

        let first = compute_snapshot(&candles, &cfg).unwrap();
        let second = compute_snapshot(&candles, &cfg).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_trailing_averages_exclude_latest() {
        let cfg = IndicatorConfig::default();
        let mut candles = window(50);

        // Blow up the latest candle; trailing averages must not move
        let baseline = compute_snapshot(&candles, &cfg).unwrap();
        let last = candles.last_mut().unwrap();
        last.volume = 1_000_000.0;
        last.close = last.open + 50.0;
        last.high = last.close + 1.0;
        let spiked = compute_snapshot(&candles, &cfg).unwrap();

        assert_eq!(baseline.avg_volume, spiked.avg_volume);
        assert_eq!(baseline.avg_body, spiked.avg_body);
    }

    #[test]
    fn test_levels_bound_the_window() {
        let cfg = IndicatorConfig::default();
        let candles = window(50);
        let snap = compute_snapshot(&candles, &cfg).unwrap();

        assert!(snap.support < snap.resistance);
        for c in &candles[candles.len() - cfg.level_lookback..] {
            assert!(c.low >= snap.support);
            assert!(c.high <= snap.resistance);
        }
    }
}
