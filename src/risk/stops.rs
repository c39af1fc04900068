use crate::config::TradingConfig;
use crate::error::{EngineError, Result};
use crate::indicators::IndicatorSnapshot;
use crate::models::{Direction, StrategyClass, SymbolInfo};

const DISTANCE_EPS: f64 = 1e-9;

/// Propose stop-loss and take-profit for an entry.
///
/// Trend-class entries lean on the rolling levels: stop behind the
/// opposite level, target at the level in the trade direction.
/// Scalping-class entries use fixed point offsets scaled by the venue
/// price increment. Returns (stop_loss, take_profit) before clamping.
pub fn place_stops(
    class: StrategyClass,
    direction: Direction,
    entry: f64,
    snapshot: &IndicatorSnapshot,
    info: &SymbolInfo,
    cfg: &TradingConfig,
) -> (f64, f64) {
    match class {
        StrategyClass::Trend => match direction {
            Direction::Buy => (snapshot.support, snapshot.resistance),
            Direction::Sell => (snapshot.resistance, snapshot.support),
        },
        StrategyClass::Scalping => {
            let stop_offset = (cfg.scalp_stop_points * info.point).max(info.min_stop_distance);
            let target_offset = (cfg.scalp_target_points * info.point).max(info.min_stop_distance);
            match direction {
                Direction::Buy => (entry - stop_offset, entry + target_offset),
                Direction::Sell => (entry + stop_offset, entry - target_offset),
            }
        }
    }
}

/// Push stop and target out to the venue minimum distance when the
/// proposed level sits too close to entry. Each leg moves only away
/// from entry on its own side, so the clamp can never flip which of
/// stop/target is closer.
pub fn clamp_to_min_distance(
    direction: Direction,
    entry: f64,
    stop_loss: f64,
    take_profit: f64,
    min_distance: f64,
) -> (f64, f64) {
    let stop_loss = if (entry - stop_loss).abs() < min_distance {
        match direction {
            Direction::Buy => entry - min_distance,
            Direction::Sell => entry + min_distance,
        }
    } else {
        stop_loss
    };

    let take_profit = if (take_profit - entry).abs() < min_distance {
        match direction {
            Direction::Buy => entry + min_distance,
            Direction::Sell => entry - min_distance,
        }
    } else {
        take_profit
    };

    (stop_loss, take_profit)
}

/// Post-clamp assertion: both legs at least the minimum distance out,
/// stop on the losing side and target on the winning side. A failure
/// here aborts the cycle.
pub fn validate_distances(
    direction: Direction,
    entry: f64,
    stop_loss: f64,
    take_profit: f64,
    min_distance: f64,
) -> Result<()> {
    let sides_ok = match direction {
        Direction::Buy => stop_loss < entry && take_profit > entry,
        Direction::Sell => stop_loss > entry && take_profit < entry,
    };
    let distances_ok = (entry - stop_loss).abs() + DISTANCE_EPS >= min_distance
        && (take_profit - entry).abs() + DISTANCE_EPS >= min_distance;

    if sides_ok && distances_ok {
        Ok(())
    } else {
        Err(EngineError::DistanceViolation(format!(
            "{} entry {:.5} sl {:.5} tp {:.5} min distance {:.5}",
            direction, entry, stop_loss, take_profit, min_distance
        )))
    }
}
