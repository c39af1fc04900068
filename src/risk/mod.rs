// Account-level gating, stop placement and position sizing
pub mod circuit_breaker;
pub mod sizing;
pub mod stops;

pub use circuit_breaker::CircuitBreaker;
pub use sizing::position_size;
pub use stops::{clamp_to_min_distance, place_stops, validate_distances};

use crate::config::{RiskConfig, TradingConfig};
use crate::error::{EngineError, Result};
use crate::indicators::IndicatorSnapshot;
use crate::models::{Direction, OrderPlan, StrategyClass, SymbolInfo, Tick};

/// Per-cycle risk gate and order preparation.
///
/// The circuit breaker inside is shared process state; everything else
/// is a pure function of the cycle's inputs.
pub struct RiskManager {
    risk: RiskConfig,
    trading: TradingConfig,
    breaker: CircuitBreaker,
}

impl RiskManager {
    pub fn new(risk: RiskConfig, trading: TradingConfig) -> Self {
        let breaker = CircuitBreaker::new(risk.stop_fraction, risk.latch_breaker);
        Self {
            risk,
            trading,
            breaker,
        }
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    /// Circuit breaker check; runs before any per-symbol decision
    pub fn check_drawdown(&self, equity: f64, initial_balance: f64) -> Result<()> {
        self.breaker.check(equity, initial_balance)
    }

    /// Cap on concurrently open positions across all symbols
    pub fn check_position_cap(&self, open_positions: usize) -> Result<()> {
        if open_positions >= self.risk.max_open_positions {
            return Err(EngineError::RiskLimitBreached(format!(
                "{} open positions at configured cap {}",
                open_positions, self.risk.max_open_positions
            )));
        }
        Ok(())
    }

    /// Turn an entry intent into a fully priced and sized order plan:
    /// stop/target placement for the strategy class, minimum-distance
    /// clamp, post-clamp validation, fractional-risk sizing.
    pub fn prepare_entry(
        &self,
        class: StrategyClass,
        direction: Direction,
        tick: Tick,
        snapshot: &IndicatorSnapshot,
        info: &SymbolInfo,
        balance: f64,
    ) -> Result<OrderPlan> {
        let entry = tick.entry_price(direction);

        let (stop_loss, take_profit) =
            place_stops(class, direction, entry, snapshot, info, &self.trading);
        let (stop_loss, take_profit) = clamp_to_min_distance(
            direction,
            entry,
            stop_loss,
            take_profit,
            info.min_stop_distance,
        );
        validate_distances(direction, entry, stop_loss, take_profit, info.min_stop_distance)?;

        let size = position_size(
            balance,
            self.risk.risk_fraction,
            entry,
            stop_loss,
            info.volume_step,
        )?;

        Ok(OrderPlan {
            direction,
            entry,
            stop_loss,
            take_profit,
            size,
        })
    }

    /// Size an externally supplied entry (webhook path) with the same
    /// fractional-risk rule as scheduled cycles.
    pub fn size_entry(&self, balance: f64, entry: f64, stop_loss: f64, info: &SymbolInfo) -> Result<f64> {
        position_size(balance, self.risk.risk_fraction, entry, stop_loss, info.volume_step)
    }
}
