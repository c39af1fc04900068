use crate::error::Result;
use crate::models::{OrderPlan, OrderRequest, Position};
use crate::venue::{OrderAck, Venue};

/// Submits fully-specified orders to the venue.
///
/// One submission per decision: a rejection is classified and surfaced,
/// never retried within the same cycle — the next scheduled cycle
/// re-evaluates from fresh state.
pub struct OrderExecutor;

impl OrderExecutor {
    /// Open a new position from a risk-approved plan
    pub async fn open(venue: &dyn Venue, symbol: &str, plan: &OrderPlan) -> Result<OrderAck> {
        let request = OrderRequest {
            symbol: symbol.to_string(),
            direction: plan.direction,
            volume: plan.size,
            price: plan.entry,
            stop_loss: plan.stop_loss,
            take_profit: plan.take_profit,
        };

        let ack = venue.submit_order(&request).await?;
        tracing::info!(
            "Order executed: {} {} {:.2} @ {:.5} | SL: {:.5} | TP: {:.5}",
            symbol,
            plan.direction,
            plan.size,
            ack.executed_price,
            plan.stop_loss,
            plan.take_profit
        );
        Ok(ack)
    }

    /// Close an existing position at market
    pub async fn close(venue: &dyn Venue, position: &Position) -> Result<OrderAck> {
        let ack = venue.close_position(position).await?;
        tracing::info!(
            "Position {} closed: {} {} {:.2} @ {:.5}",
            position.id,
            position.symbol,
            position.direction,
            position.volume,
            ack.executed_price
        );
        Ok(ack)
    }
}
