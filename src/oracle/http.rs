use super::{FeatureVector, PredictionOracle};
use crate::error::{EngineError, Result};
use crate::models::{Prediction, Timeframe};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Client for the model-serving endpoint holding one versioned
/// classifier per (symbol, timeframe) pair.
#[derive(Clone)]
pub struct HttpOracle {
    client: Client,
    base_url: String,
}

impl HttpOracle {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EngineError::OracleUnavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PredictionOracle for HttpOracle {
    async fn predict(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        features: &FeatureVector,
    ) -> Result<Prediction> {
        let url = format!("{}/predict/{}/{}", self.base_url, symbol, timeframe);

        let response = self
            .client
            .post(&url)
            .json(features)
            .send()
            .await
            .map_err(|e| EngineError::OracleUnavailable(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(EngineError::OracleUnavailable(format!(
                "no model artifact for {} {}",
                symbol, timeframe
            ))),
            status if status.is_success() => {
                let prediction: Prediction = response
                    .json()
                    .await
                    .map_err(|e| EngineError::OracleUnavailable(e.to_string()))?;

                // A probability outside [0,1] means the artifact is not
                // what this engine was built against
                if !(0.0..=1.0).contains(&prediction.confidence) {
                    return Err(EngineError::OracleUnavailable(format!(
                        "confidence {} outside [0,1]",
                        prediction.confidence
                    )));
                }
                Ok(prediction)
            }
            status => Err(EngineError::OracleUnavailable(format!(
                "prediction for {} {} failed: {}",
                symbol, timeframe, status
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Direction;

    fn features() -> FeatureVector {
        FeatureVector {
            open: 100.0,
            high: 101.0,
            low: 99.0,
            close: 100.5,
            volume: 1200.0,
            sma: 100.2,
            rsi: 58.0,
        }
    }

    #[tokio::test]
    async fn test_prediction_parsed() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/predict/BTCUSDm/M5")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"direction": "BUY", "confidence": 0.83}"#)
            .create_async()
            .await;

        let oracle = HttpOracle::new(&server.url(), Duration::from_secs(2)).unwrap();
        let prediction = oracle
            .predict("BTCUSDm", Timeframe::M5, &features())
            .await
            .unwrap();

        assert_eq!(prediction.direction, Direction::Buy);
        assert_eq!(prediction.confidence, 0.83);
    }

    #[tokio::test]
    async fn test_missing_model_is_oracle_unavailable() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/predict/BTCUSDm/M5")
            .with_status(404)
            .create_async()
            .await;

        let oracle = HttpOracle::new(&server.url(), Duration::from_secs(2)).unwrap();
        let err = oracle
            .predict("BTCUSDm", Timeframe::M5, &features())
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::OracleUnavailable(_)));
    }

    #[tokio::test]
    async fn test_out_of_range_confidence_rejected() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/predict/XAUUSDm/H1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"direction": "SELL", "confidence": 1.7}"#)
            .create_async()
            .await;

        let oracle = HttpOracle::new(&server.url(), Duration::from_secs(2)).unwrap();
        let err = oracle
            .predict("XAUUSDm", Timeframe::H1, &features())
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::OracleUnavailable(_)));
    }
}
