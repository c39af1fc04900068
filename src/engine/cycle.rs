use super::EngineContext;
use crate::config::{IndicatorConfig, TradingConfig};
use crate::error::{EngineError, Result};
use crate::execution::{reconcile, OrderExecutor, Reconciliation};
use crate::fusion::{fuse, FusionGate};
use crate::indicators::{classify_zone, compute_snapshot};
use crate::models::{Timeframe, TradeDecision};
use crate::oracle::{FeatureVector, PredictionOracle};
use crate::persistence::{AnalysisRecord, AuditLogger};
use crate::risk::RiskManager;
use crate::strategy;
use crate::venue::SharedVenue;
use chrono::Utc;
use std::sync::Arc;

/// Drives one full decision cycle per invocation.
///
/// A cycle is a short-lived synchronous sequence against the venue
/// session; it either completes with a TradeDecision or is abandoned
/// wholesale with a typed error. Nothing is kept between cycles except
/// the captured initial balance and the circuit-breaker latch, so every
/// cycle starts from fresh venue reads.
pub struct Engine {
    venue: SharedVenue,
    oracle: Arc<dyn PredictionOracle>,
    risk: Arc<RiskManager>,
    ctx: Arc<EngineContext>,
    audit: Arc<AuditLogger>,
    indicators: IndicatorConfig,
    trading: TradingConfig,
}

impl Engine {
    pub fn new(
        venue: SharedVenue,
        oracle: Arc<dyn PredictionOracle>,
        risk: Arc<RiskManager>,
        ctx: Arc<EngineContext>,
        audit: Arc<AuditLogger>,
        indicators: IndicatorConfig,
        trading: TradingConfig,
    ) -> Self {
        Self {
            venue,
            oracle,
            risk,
            ctx,
            audit,
            indicators,
            trading,
        }
    }

    /// Run one cycle for a (symbol, timeframe) pair
    pub async fn run_cycle(&self, symbol: &str, timeframe: Timeframe) -> Result<TradeDecision> {
        // Session held for the whole cycle
        let venue = self.venue.lock().await;

        let account = venue.account().await?;
        let initial_balance = self.ctx.capture_initial_balance(account.balance);

        tracing::info!(
            "Analyzing {} ({}) | balance {:.2} | equity {:.2}",
            symbol,
            timeframe,
            account.balance,
            account.equity
        );

        if let Err(e) =
            self.audit
                .record_capital(Utc::now(), account.balance, account.equity, initial_balance)
        {
            tracing::warn!("capital log write failed: {}", e);
        }

        // Circuit breaker runs before any per-symbol decision
        if let Err(err) = self.risk.check_drawdown(account.equity, initial_balance) {
            tracing::error!("{} ({}) forced to Hold: {}", symbol, timeframe, err);
            return Ok(TradeDecision::Hold);
        }

        let info = venue.symbol_info(symbol).await?;
        let window = venue
            .candles(symbol, timeframe, self.trading.candle_window)
            .await?;
        let snapshot = compute_snapshot(&window, &self.indicators)?;
        let Some(latest) = window.last() else {
            return Err(EngineError::InsufficientData { have: 0, need: 2 });
        };

        let zone = classify_zone(latest.close, snapshot.support, snapshot.resistance);
        let strategy = strategy::for_timeframe(timeframe);
        let signal = strategy.evaluate(&window, &snapshot);

        let features = FeatureVector::from_latest(latest, &snapshot);
        let prediction = self.oracle.predict(symbol, timeframe, &features).await?;

        tracing::info!(
            "{} ({}): oracle {} @ {:.2}% | {} direction {:?} confirmed {} | zone {} | close {:.5} [{:.5}, {:.5}]",
            symbol,
            timeframe,
            prediction.direction,
            prediction.confidence * 100.0,
            strategy.name(),
            signal.direction,
            signal.confirmed,
            zone,
            latest.close,
            snapshot.support,
            snapshot.resistance
        );

        let gate = FusionGate {
            min_confidence: self.trading.min_confidence,
            zone_filter: self.trading.zone_filter,
        };
        let intent = fuse(&signal, &prediction, zone, &gate);

        if let Err(e) = self.audit.record_analysis(
            symbol,
            &AnalysisRecord {
                timestamp: Utc::now(),
                price: latest.close,
                support: snapshot.support,
                resistance: snapshot.resistance,
                rsi: snapshot.rsi,
                sma: snapshot.sma,
                confirmed: signal.confirmed,
                zone,
                prediction: prediction.direction,
                confidence: prediction.confidence,
            },
        ) {
            tracing::warn!("audit log write failed: {}", e);
        }

        let positions = venue.open_positions().await?;
        let existing = positions.iter().find(|p| p.symbol == symbol);

        match reconcile(existing, intent) {
            Reconciliation::CloseExisting { position_id } => {
                // Close-then-wait: no reopen within the same cycle
                if let Some(position) = positions.iter().find(|p| p.id == position_id) {
                    OrderExecutor::close(venue.as_ref(), position).await?;
                }
                return Ok(TradeDecision::Close { position_id });
            }
            Reconciliation::KeepExisting => {
                tracing::debug!("{}: existing position kept, no new entry", symbol);
                return Ok(TradeDecision::Hold);
            }
            Reconciliation::NoPosition => {}
        }

        let Some(direction) = intent else {
            return Ok(TradeDecision::Hold);
        };

        if let Err(err) = self.risk.check_position_cap(positions.len()) {
            tracing::warn!("{} ({}) forced to Hold: {}", symbol, timeframe, err);
            return Ok(TradeDecision::Hold);
        }

        let tick = venue.tick(symbol).await?;
        let plan = match self.risk.prepare_entry(
            strategy.class(),
            direction,
            tick,
            &snapshot,
            &info,
            account.balance,
        ) {
            Ok(plan) => plan,
            Err(EngineError::RiskLimitBreached(reason)) => {
                tracing::warn!("{} ({}) forced to Hold: {}", symbol, timeframe, reason);
                return Ok(TradeDecision::Hold);
            }
            Err(other) => return Err(other),
        };

        OrderExecutor::open(venue.as_ref(), symbol, &plan).await?;
        Ok(TradeDecision::Open(plan))
    }
}
