use super::{OrderAck, Venue};
use crate::error::{EngineError, Result};
use crate::models::{
    normalize_candles, AccountSnapshot, Candle, OrderRequest, Position, SymbolInfo, Tick,
    Timeframe,
};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

/// HTTP client for the brokerage bridge sitting in front of the
/// terminal session.
///
/// One bridge process owns one terminal session, which is why the
/// engine serializes cycles over this handle.
#[derive(Clone)]
pub struct BridgeVenue {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct CandleDto {
    time: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

#[derive(Debug, Deserialize)]
struct OrderResultDto {
    code: u32,
    #[serde(default)]
    message: String,
    order_id: Option<u64>,
    price: Option<f64>,
}

impl BridgeVenue {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EngineError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn classify_order_result(result: OrderResultDto) -> Result<OrderAck> {
        if result.code == 0 {
            Ok(OrderAck {
                order_id: result.order_id.unwrap_or_default(),
                executed_price: result.price.unwrap_or_default(),
            })
        } else {
            Err(EngineError::OrderRejected {
                code: result.code,
                message: result.message,
            })
        }
    }
}

#[async_trait]
impl Venue for BridgeVenue {
    async fn account(&self) -> Result<AccountSnapshot> {
        let response = self.client.get(self.url("/account")).send().await?;
        if !response.status().is_success() {
            return Err(EngineError::Connection(format!(
                "account snapshot failed: {}",
                response.status()
            )));
        }
        Ok(response.json().await?)
    }

    async fn symbol_info(&self, symbol: &str) -> Result<SymbolInfo> {
        let response = self
            .client
            .get(self.url(&format!("/symbols/{}", symbol)))
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(EngineError::SymbolUnavailable(symbol.to_string())),
            status if status.is_success() => Ok(response.json().await?),
            status => Err(EngineError::Connection(format!(
                "symbol info for {} failed: {}",
                symbol, status
            ))),
        }
    }

    async fn candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        count: usize,
    ) -> Result<Vec<Candle>> {
        let response = self
            .client
            .get(self.url("/candles"))
            .query(&[
                ("symbol", symbol),
                ("timeframe", timeframe.as_str()),
                ("count", &count.to_string()),
            ])
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(EngineError::SymbolUnavailable(symbol.to_string())),
            status if status.is_success() => {
                let dtos: Vec<CandleDto> = response.json().await?;
                let candles = dtos
                    .into_iter()
                    .filter_map(|dto| {
                        Utc.timestamp_opt(dto.time, 0).single().map(|timestamp| Candle {
                            timestamp,
                            open: dto.open,
                            high: dto.high,
                            low: dto.low,
                            close: dto.close,
                            volume: dto.volume,
                        })
                    })
                    .collect();
                Ok(normalize_candles(candles))
            }
            status => Err(EngineError::Connection(format!(
                "candle fetch for {} failed: {}",
                symbol, status
            ))),
        }
    }

    async fn tick(&self, symbol: &str) -> Result<Tick> {
        let response = self
            .client
            .get(self.url(&format!("/tick/{}", symbol)))
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(EngineError::SymbolUnavailable(symbol.to_string())),
            status if status.is_success() => Ok(response.json().await?),
            status => Err(EngineError::Connection(format!(
                "tick for {} failed: {}",
                symbol, status
            ))),
        }
    }

    async fn open_positions(&self) -> Result<Vec<Position>> {
        let response = self.client.get(self.url("/positions")).send().await?;
        if !response.status().is_success() {
            return Err(EngineError::Connection(format!(
                "position listing failed: {}",
                response.status()
            )));
        }
        Ok(response.json().await?)
    }

    async fn submit_order(&self, request: &OrderRequest) -> Result<OrderAck> {
        let response = self
            .client
            .post(self.url("/orders"))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EngineError::Connection(format!(
                "order submission failed: {}",
                response.status()
            )));
        }
        Self::classify_order_result(response.json().await?)
    }

    async fn close_position(&self, position: &Position) -> Result<OrderAck> {
        let response = self
            .client
            .post(self.url(&format!("/positions/{}/close", position.id)))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EngineError::Connection(format!(
                "close of position {} failed: {}",
                position.id, response.status()
            )));
        }
        Self::classify_order_result(response.json().await?)
    }
}
