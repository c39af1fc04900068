use crate::models::{Direction, Prediction, StrategySignal, Zone};

/// Gates for fusing the rule-based signal with the oracle prediction
#[derive(Debug, Clone, Copy)]
pub struct FusionGate {
    /// Oracle confidence must strictly exceed this
    pub min_confidence: f64,
    /// When true, veto entries into an adverse zone (Buy near
    /// resistance, Sell near support). Advisory only when false.
    pub zone_filter: bool,
}

/// Combine strategy signal, oracle prediction and zone into an entry
/// intent.
///
/// Returns the direction to trade, or None for Hold. The traded
/// direction is always the strategy direction; the oracle only gates on
/// confidence and never overrides the rule engine.
pub fn fuse(
    signal: &StrategySignal,
    prediction: &Prediction,
    zone: Zone,
    gate: &FusionGate,
) -> Option<Direction> {
    let direction = signal.direction?;

    if !signal.confirmed {
        return None;
    }

    if prediction.confidence <= gate.min_confidence {
        return None;
    }

    if gate.zone_filter && adverse_zone(direction, zone) {
        return None;
    }

    Some(direction)
}

fn adverse_zone(direction: Direction, zone: Zone) -> bool {
    matches!(
        (direction, zone),
        (Direction::Buy, Zone::NearResistance) | (Direction::Sell, Zone::NearSupport)
    )
}
