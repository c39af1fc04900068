use crate::error::{EngineError, Result};
use std::sync::atomic::{AtomicBool, Ordering};

/// Drawdown circuit breaker shared by all symbol cycles.
///
/// Trips when equity falls below `stop_fraction` of the captured
/// initial balance. While tripped, every Open decision degrades to Hold
/// process-wide. With `latch` set the breaker stays tripped until
/// restart; without it the breaker re-arms once equity recovers above
/// the floor.
#[derive(Debug)]
pub struct CircuitBreaker {
    stop_fraction: f64,
    latch: bool,
    tripped: AtomicBool,
}

impl CircuitBreaker {
    pub fn new(stop_fraction: f64, latch: bool) -> Self {
        Self {
            stop_fraction,
            latch,
            tripped: AtomicBool::new(false),
        }
    }

    pub fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::SeqCst)
    }

    /// Evaluate the breaker against the current equity. Runs before any
    /// per-symbol decision.
    pub fn check(&self, equity: f64, initial_balance: f64) -> Result<()> {
        let floor = initial_balance * self.stop_fraction;

        if equity < floor {
            self.tripped.store(true, Ordering::SeqCst);
        } else if !self.latch {
            self.tripped.store(false, Ordering::SeqCst);
        }

        if self.is_tripped() {
            return Err(EngineError::RiskLimitBreached(format!(
                "circuit breaker tripped: equity {:.2} below {:.0}% of initial balance {:.2}",
                equity,
                self.stop_fraction * 100.0,
                initial_balance
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trips_below_floor() {
        // equity 240 vs 25% of 1000 = 250
        let breaker = CircuitBreaker::new(0.25, true);
        assert!(breaker.check(240.0, 1000.0).is_err());
        assert!(breaker.is_tripped());
    }

    #[test]
    fn test_holds_above_floor() {
        let breaker = CircuitBreaker::new(0.25, true);
        assert!(breaker.check(900.0, 1000.0).is_ok());
        assert!(!breaker.is_tripped());
    }

    #[test]
    fn test_latched_breaker_stays_tripped_after_recovery() {
        let breaker = CircuitBreaker::new(0.25, true);
        breaker.check(100.0, 1000.0).unwrap_err();

        // Equity recovered, but the latch holds until restart
        assert!(breaker.check(900.0, 1000.0).is_err());
    }

    #[test]
    fn test_unlatched_breaker_rearms_on_recovery() {
        let breaker = CircuitBreaker::new(0.25, false);
        breaker.check(100.0, 1000.0).unwrap_err();

        assert!(breaker.check(900.0, 1000.0).is_ok());
        assert!(!breaker.is_tripped());
    }

    #[test]
    fn test_boundary_is_not_a_trip() {
        // Exactly at the floor is still tradeable
        let breaker = CircuitBreaker::new(0.25, true);
        assert!(breaker.check(250.0, 1000.0).is_ok());
    }
}
