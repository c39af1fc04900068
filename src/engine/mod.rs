// Cycle orchestration and scheduling
pub mod cycle;
pub mod scheduler;

pub use cycle::Engine;
pub use scheduler::Scheduler;

use std::sync::OnceLock;

/// Process-wide context shared by every symbol cycle.
///
/// The initial balance is the circuit-breaker baseline: captured on the
/// first successful account read and held for the lifetime of the run.
/// Concurrent cycles agree on the captured value because the first
/// write wins and later cycles only read.
#[derive(Debug, Default)]
pub struct EngineContext {
    initial_balance: OnceLock<f64>,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the baseline if not yet set; returns the process-wide
    /// value either way.
    pub fn capture_initial_balance(&self, balance: f64) -> f64 {
        *self.initial_balance.get_or_init(|| balance)
    }

    pub fn initial_balance(&self) -> Option<f64> {
        self.initial_balance.get().copied()
    }
}
