use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tradebot::config::AppConfig;
use tradebot::engine::{Engine, EngineContext, Scheduler};
use tradebot::oracle::HttpOracle;
use tradebot::persistence::AuditLogger;
use tradebot::risk::RiskManager;
use tradebot::venue::{BridgeVenue, SharedVenue, Venue};
use tradebot::webhook::{self, WebhookState};

#[derive(Parser, Debug)]
#[command(name = "tradebot", about = "Automated trading decision engine")]
struct Cli {
    /// Configuration file (TOML), overridable via TRADEBOT_* env vars
    #[arg(long, default_value = "Settings")]
    config: String,

    /// Run one cycle per configured symbol and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?;

    tracing::info!("🚀 Tradebot starting");
    tracing::info!("📊 Configuration:");
    tracing::info!("  Risk per trade: {}%", config.risk.risk_fraction * 100.0);
    tracing::info!(
        "  Circuit breaker floor: {}% of initial balance",
        config.risk.stop_fraction * 100.0
    );
    tracing::info!("  Max open positions: {}", config.risk.max_open_positions);
    tracing::info!("  Min oracle confidence: {}", config.trading.min_confidence);
    for spec in &config.symbols {
        tracing::info!(
            "  - {} ({}) every {}s",
            spec.name,
            spec.timeframe,
            spec.interval_secs
        );
    }
    if config.symbols.is_empty() {
        tracing::warn!("no symbols configured, only the webhook (if enabled) will trade");
    }

    let bridge = BridgeVenue::new(
        &config.venue.bridge_url,
        Duration::from_secs(config.venue.request_timeout_secs),
    )?;
    let venue: SharedVenue =
        Arc::new(tokio::sync::Mutex::new(Box::new(bridge) as Box<dyn Venue>));
    let oracle = Arc::new(HttpOracle::new(
        &config.oracle.url,
        Duration::from_secs(config.oracle.request_timeout_secs),
    )?);
    let risk = Arc::new(RiskManager::new(
        config.risk.clone(),
        config.trading.clone(),
    ));
    let ctx = Arc::new(EngineContext::new());
    let audit = Arc::new(AuditLogger::new(&config.audit_dir));

    let engine = Arc::new(Engine::new(
        venue.clone(),
        oracle,
        risk.clone(),
        ctx.clone(),
        audit,
        config.indicators.clone(),
        config.trading.clone(),
    ));

    let scheduler = Scheduler::new(engine, config.symbols.clone());

    if cli.once {
        scheduler.run_once().await;
        return Ok(());
    }

    let cycle_tasks = scheduler.spawn();
    tracing::info!("✅ {} cycle loop(s) spawned", cycle_tasks.len());

    let webhook_task = if config.webhook.enabled {
        let state = Arc::new(WebhookState {
            venue,
            risk,
            ctx,
            config: config.webhook.clone(),
        });
        Some(tokio::spawn(async move {
            if let Err(e) = webhook::start_server(state).await {
                tracing::error!("Webhook server exited: {}", e);
            }
        }))
    } else {
        None
    };

    tracing::info!("Press Ctrl+C to stop...");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("⚠️  Received Ctrl+C, shutting down...");
        }
        _ = async {
            if let Some(task) = webhook_task {
                let _ = task.await;
            } else {
                std::future::pending::<()>().await;
            }
        } => {
            tracing::error!("Webhook server stopped unexpectedly");
        }
    }

    Ok(())
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tradebot=info".into()),
        )
        .init();
}
