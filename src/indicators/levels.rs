use crate::models::{Candle, Zone};

/// Proximity band around support/resistance used for zone
/// classification (0.5% of the level, the observed trading behavior)
pub const ZONE_PROXIMITY: f64 = 0.005;

/// Rolling support and resistance: min low / max high over the trailing
/// `lookback` candles (or the whole window if shorter).
pub fn rolling_levels(candles: &[Candle], lookback: usize) -> Option<(f64, f64)> {
    if candles.is_empty() || lookback == 0 {
        return None;
    }

    let start = candles.len().saturating_sub(lookback);
    let tail = &candles[start..];

    let support = tail.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
    let resistance = tail.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);

    Some((support, resistance))
}

/// Classify the latest close against the rolling levels
pub fn classify_zone(price: f64, support: f64, resistance: f64) -> Zone {
    if price <= support * (1.0 + ZONE_PROXIMITY) {
        Zone::NearSupport
    } else if price >= resistance * (1.0 - ZONE_PROXIMITY) {
        Zone::NearResistance
    } else {
        Zone::Mid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn candle(i: i64, low: f64, high: f64) -> Candle {
        Candle {
            timestamp: Utc.timestamp_opt(i * 60, 0).unwrap(),
            open: low,
            high,
            low,
            close: high,
            volume: 100.0,
        }
    }

    #[test]
    fn test_rolling_levels_use_tail_only() {
        let mut candles: Vec<Candle> = (0..10).map(|i| candle(i, 50.0, 200.0)).collect();
        candles.extend((10..40).map(|i| candle(i, 100.0, 110.0)));

        let (support, resistance) = rolling_levels(&candles, 30).unwrap();
        assert_eq!(support, 100.0);
        assert_eq!(resistance, 110.0);
    }

    #[test]
    fn test_zone_classification() {
        assert_eq!(classify_zone(100.2, 100.0, 110.0), Zone::NearSupport);
        assert_eq!(classify_zone(109.8, 100.0, 110.0), Zone::NearResistance);
        assert_eq!(classify_zone(105.0, 100.0, 110.0), Zone::Mid);
    }
}
