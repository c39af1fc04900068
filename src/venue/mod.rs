// Brokerage venue boundary
pub mod bridge;

pub use bridge::BridgeVenue;

use crate::error::Result;
use crate::models::{
    AccountSnapshot, Candle, OrderRequest, Position, SymbolInfo, Tick, Timeframe,
};
use async_trait::async_trait;

/// Shared venue session handle. One cycle locks it for its whole
/// duration; cycles on other symbols wait rather than interleave calls
/// on the same session.
pub type SharedVenue = std::sync::Arc<tokio::sync::Mutex<Box<dyn Venue>>>;

/// Acknowledgement for a filled order or position close
#[derive(Debug, Clone, PartialEq)]
pub struct OrderAck {
    pub order_id: u64,
    pub executed_price: f64,
}

/// Venue collaborator. The handle is a shared mutually-exclusive
/// session: callers acquire it once per cycle (via an async mutex),
/// run the whole cycle against it, and release it. Positions are
/// authoritative at the venue and re-read every cycle.
#[async_trait]
pub trait Venue: Send + Sync {
    /// Balance and equity snapshot
    async fn account(&self) -> Result<AccountSnapshot>;

    /// Activate a symbol and return its trading metadata
    async fn symbol_info(&self, symbol: &str) -> Result<SymbolInfo>;

    /// Trailing candle window, normalized (sorted, deduplicated)
    async fn candles(&self, symbol: &str, timeframe: Timeframe, count: usize)
        -> Result<Vec<Candle>>;

    /// Live bid/ask
    async fn tick(&self, symbol: &str) -> Result<Tick>;

    /// All open positions on the account
    async fn open_positions(&self) -> Result<Vec<Position>>;

    /// Submit a fully-specified order. Rejections surface as
    /// `OrderRejected`; the caller never retries within the cycle.
    async fn submit_order(&self, request: &OrderRequest) -> Result<OrderAck>;

    /// Close an open position at market
    async fn close_position(&self, position: &Position) -> Result<OrderAck>;
}
