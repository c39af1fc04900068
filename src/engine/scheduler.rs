use super::Engine;
use crate::config::SymbolSpec;
use crate::models::TradeDecision;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};

/// Runs one independent cycle loop per configured (symbol, timeframe)
/// pair. A pair that errors logs the abandoned cycle and waits for its
/// next tick; it never takes down the other pairs.
pub struct Scheduler {
    engine: Arc<Engine>,
    symbols: Vec<SymbolSpec>,
}

impl Scheduler {
    pub fn new(engine: Arc<Engine>, symbols: Vec<SymbolSpec>) -> Self {
        Self { engine, symbols }
    }

    /// Spawn one loop per pair and return the join handles. Each loop
    /// fires immediately, then on a monotonic interval; a cycle that
    /// overruns its interval skips the missed ticks instead of bursting.
    pub fn spawn(self) -> Vec<JoinHandle<()>> {
        let Self { engine, symbols } = self;
        symbols
            .into_iter()
            .map(|spec| {
                let engine = engine.clone();
                tokio::spawn(async move {
                    symbol_loop(engine, spec).await;
                })
            })
            .collect()
    }

    /// Run a single cycle for every pair, sequentially. Used by the
    /// `--once` flag for smoke-testing a configuration.
    pub async fn run_once(&self) {
        for spec in &self.symbols {
            run_logged_cycle(&self.engine, spec).await;
        }
    }
}

async fn symbol_loop(engine: Arc<Engine>, spec: SymbolSpec) {
    tracing::info!(
        "🔄 Cycle loop starting: {} ({}) every {}s",
        spec.name,
        spec.timeframe,
        spec.interval_secs
    );

    let mut ticker = interval_at(Instant::now(), Duration::from_secs(spec.interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        run_logged_cycle(&engine, &spec).await;
    }
}

async fn run_logged_cycle(engine: &Engine, spec: &SymbolSpec) {
    match engine.run_cycle(&spec.name, spec.timeframe).await {
        Ok(TradeDecision::Open(plan)) => {
            tracing::info!(
                "✅ {} ({}): opened {} {:.2} @ {:.5}",
                spec.name,
                spec.timeframe,
                plan.direction,
                plan.size,
                plan.entry
            );
        }
        Ok(TradeDecision::Close { position_id }) => {
            tracing::info!(
                "✅ {} ({}): closed position {}",
                spec.name,
                spec.timeframe,
                position_id
            );
        }
        Ok(TradeDecision::Hold) => {
            tracing::debug!("{} ({}): hold", spec.name, spec.timeframe);
        }
        Err(err) => {
            // Abandoned wholesale; next tick re-reads everything
            tracing::warn!("⚠️  {} ({}) cycle abandoned: {}", spec.name, spec.timeframe, err);
        }
    }
}
