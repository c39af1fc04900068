//! Inbound alert webhook
//!
//! Accepts externally generated alerts (e.g. charting-platform
//! notifications) and turns them into venue orders under the same risk
//! gates as scheduled cycles. Alert prices are advisory: stop and
//! target DISTANCES are kept, but recentered around the live quote at
//! execution time.

use crate::config::WebhookConfig;
use crate::engine::EngineContext;
use crate::error::EngineError;
use crate::execution::OrderExecutor;
use crate::models::Direction;
use crate::risk::{clamp_to_min_distance, validate_distances, RiskManager};
use crate::venue::SharedVenue;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Alert body as posted by the charting platform
#[derive(Debug, Clone, Deserialize)]
pub struct AlertPayload {
    pub symbol: String,
    pub signal: Direction,
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    /// Chart timeframe the alert fired on; informational only
    #[serde(default)]
    pub timeframe: Option<crate::models::Timeframe>,
}

#[derive(Debug, Serialize)]
pub struct AlertResponse {
    /// Server-assigned id, for correlating logs with alert deliveries
    pub alert_id: Uuid,
    pub status: String,
    pub symbol: String,
    pub order_id: Option<u64>,
    pub executed_price: Option<f64>,
    pub volume: Option<f64>,
}

pub struct WebhookState {
    pub venue: SharedVenue,
    pub risk: Arc<RiskManager>,
    pub ctx: Arc<EngineContext>,
    pub config: WebhookConfig,
}

/// Create the webhook router
pub fn create_router(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route("/webhook", post(handle_alert))
        .with_state(state)
}

/// Bind and serve the webhook endpoint until the process exits
pub async fn start_server(state: Arc<WebhookState>) -> anyhow::Result<()> {
    let addr = state.config.bind_addr.clone();
    let app = create_router(state);

    tracing::info!("📡 Webhook listening on http://{}/webhook", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// POST /webhook - authenticate the origin, resolve the symbol and
/// hand the alert to the risk-gated order path
async fn handle_alert(
    State(state): State<Arc<WebhookState>>,
    headers: HeaderMap,
    Json(payload): Json<AlertPayload>,
) -> impl IntoResponse {
    let alert_id = Uuid::new_v4();

    let user_agent = headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok());
    if !origin_allowed(user_agent, &state.config.origin_token) {
        tracing::warn!(
            "alert {} rejected: unexpected origin {:?}",
            alert_id,
            user_agent
        );
        return (
            StatusCode::FORBIDDEN,
            Json(reject(alert_id, "forbidden", &payload.symbol)),
        );
    }

    let Some(symbol) = resolve_symbol(&state.config, &payload.symbol) else {
        tracing::warn!("alert {} rejected: unknown symbol {}", alert_id, payload.symbol);
        return (
            StatusCode::BAD_REQUEST,
            Json(reject(alert_id, "unknown symbol", &payload.symbol)),
        );
    };

    tracing::info!(
        "alert {}: {} {} entry {:.5} sl {:.5} tp {:.5} (timeframe {:?})",
        alert_id,
        payload.signal,
        symbol,
        payload.entry,
        payload.stop_loss,
        payload.take_profit,
        payload.timeframe
    );

    match place_alert_order(&state, alert_id, &symbol, &payload).await {
        Ok(response) => (StatusCode::OK, Json(response)),
        Err(err) => {
            tracing::warn!("alert {} for {} failed: {}", alert_id, symbol, err);
            let status = match err {
                EngineError::RiskLimitBreached(_) | EngineError::DistanceViolation(_) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                EngineError::SymbolUnavailable(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::BAD_GATEWAY,
            };
            (status, Json(reject(alert_id, &err.to_string(), &symbol)))
        }
    }
}

/// Alerts must carry the configured token in their User-Agent
fn origin_allowed(user_agent: Option<&str>, token: &str) -> bool {
    user_agent
        .map(|ua| ua.to_ascii_lowercase().contains(&token.to_ascii_lowercase()))
        .unwrap_or(false)
}

/// Map an alert symbol to its venue symbol. Unmapped names are accepted
/// only if they already are a known venue symbol.
fn resolve_symbol(config: &WebhookConfig, raw: &str) -> Option<String> {
    if let Some(mapped) = config.symbol_aliases.get(raw) {
        return Some(mapped.clone());
    }
    if config.symbol_aliases.values().any(|v| v == raw) {
        return Some(raw.to_string());
    }
    None
}

/// Keep the alert's stop/target distances, recentered on the live quote
fn recenter_levels(direction: Direction, live_entry: f64, alert: &AlertPayload) -> (f64, f64) {
    let stop_dist = (alert.entry - alert.stop_loss).abs();
    let target_dist = (alert.take_profit - alert.entry).abs();
    match direction {
        Direction::Buy => (live_entry - stop_dist, live_entry + target_dist),
        Direction::Sell => (live_entry + stop_dist, live_entry - target_dist),
    }
}

async fn place_alert_order(
    state: &WebhookState,
    alert_id: Uuid,
    symbol: &str,
    payload: &AlertPayload,
) -> crate::error::Result<AlertResponse> {
    // Same session discipline as a scheduled cycle
    let venue = state.venue.lock().await;

    let account = venue.account().await?;
    let initial_balance = state.ctx.capture_initial_balance(account.balance);
    state.risk.check_drawdown(account.equity, initial_balance)?;

    let positions = venue.open_positions().await?;
    state.risk.check_position_cap(positions.len())?;
    if positions.iter().any(|p| p.symbol == symbol) {
        return Err(EngineError::RiskLimitBreached(format!(
            "position already open on {}",
            symbol
        )));
    }

    let info = venue.symbol_info(symbol).await?;
    let tick = venue.tick(symbol).await?;
    let direction = payload.signal;
    let entry = tick.entry_price(direction);

    let (stop_loss, take_profit) = recenter_levels(direction, entry, payload);
    let (stop_loss, take_profit) =
        clamp_to_min_distance(direction, entry, stop_loss, take_profit, info.min_stop_distance);
    validate_distances(direction, entry, stop_loss, take_profit, info.min_stop_distance)?;

    let size = state.risk.size_entry(account.balance, entry, stop_loss, &info)?;

    let plan = crate::models::OrderPlan {
        direction,
        entry,
        stop_loss,
        take_profit,
        size,
    };
    let ack = OrderExecutor::open(venue.as_ref(), symbol, &plan).await?;

    Ok(AlertResponse {
        alert_id,
        status: "executed".to_string(),
        symbol: symbol.to_string(),
        order_id: Some(ack.order_id),
        executed_price: Some(ack.executed_price),
        volume: Some(size),
    })
}

fn reject(alert_id: Uuid, reason: &str, symbol: &str) -> AlertResponse {
    AlertResponse {
        alert_id,
        status: reason.to_string(),
        symbol: symbol.to_string(),
        order_id: None,
        executed_price: None,
        volume: None,
    }
}
