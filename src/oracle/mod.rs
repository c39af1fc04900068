// Prediction oracle boundary
pub mod http;

pub use http::HttpOracle;

use crate::error::Result;
use crate::indicators::IndicatorSnapshot;
use crate::models::{Candle, Prediction, Timeframe};
use async_trait::async_trait;
use serde::Serialize;

/// Feature vector for the latest candle, as consumed by the trained
/// classifier behind the oracle
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeatureVector {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub sma: f64,
    pub rsi: f64,
}

impl FeatureVector {
    pub fn from_latest(latest: &Candle, snapshot: &IndicatorSnapshot) -> Self {
        Self {
            open: latest.open,
            high: latest.high,
            low: latest.low,
            close: latest.close,
            volume: latest.volume,
            sma: snapshot.sma,
            rsi: snapshot.rsi,
        }
    }
}

/// External predictor consulted once per cycle.
///
/// The oracle is opaque: the engine treats its confidence as a
/// calibrated probability and never substitutes a default when the
/// oracle is unavailable.
#[async_trait]
pub trait PredictionOracle: Send + Sync {
    async fn predict(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        features: &FeatureVector,
    ) -> Result<Prediction>;
}
