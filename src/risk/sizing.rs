use crate::error::{EngineError, Result};

// Guards the floor division against float dust (e.g. 50.0/0.01
// landing a hair under 5000)
const STEP_EPS: f64 = 1e-9;

/// Position size from fractional risk: the volume that loses
/// `balance * risk_fraction` if the stop is hit, rounded down to the
/// venue volume step.
///
/// Degenerate sizes are a risk-limit breach, not a silent minimum
/// order.
pub fn position_size(
    balance: f64,
    risk_fraction: f64,
    entry: f64,
    stop_loss: f64,
    volume_step: f64,
) -> Result<f64> {
    let stop_distance = (entry - stop_loss).abs();
    if stop_distance <= 0.0 {
        return Err(EngineError::RiskLimitBreached(
            "zero stop distance, cannot size position".to_string(),
        ));
    }

    let risk_amount = balance * risk_fraction;
    let raw = risk_amount / stop_distance;

    let size = if volume_step > 0.0 {
        (raw / volume_step + STEP_EPS).floor() * volume_step
    } else {
        raw
    };

    if size <= 0.0 {
        return Err(EngineError::RiskLimitBreached(format!(
            "computed size rounds to zero (risk {:.2}, stop distance {:.5})",
            risk_amount, stop_distance
        )));
    }

    Ok(size)
}
