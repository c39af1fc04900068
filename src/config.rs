use crate::models::Timeframe;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;

/// Indicator periods for the snapshot computed each cycle
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct IndicatorConfig {
    pub sma_period: usize,
    pub rsi_period: usize,
    pub ema_fast_period: usize,
    pub ema_slow_period: usize,
    pub atr_period: usize,
    /// Trailing window for rolling support/resistance
    pub level_lookback: usize,
    /// Trailing window for average body/volume corroboration
    pub corroboration_window: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            sma_period: 14,
            rsi_period: 14,
            ema_fast_period: 5,
            ema_slow_period: 13,
            atr_period: 14,
            level_lookback: 30,
            corroboration_window: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TradingConfig {
    /// Candles fetched per cycle
    pub candle_window: usize,
    /// Oracle confidence must strictly exceed this to open
    pub min_confidence: f64,
    /// When true, zone classification vetoes adverse entries instead of
    /// being advisory only
    pub zone_filter: bool,
    /// Scalping stop offset, in venue points
    pub scalp_stop_points: f64,
    /// Scalping target offset, in venue points
    pub scalp_target_points: f64,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            candle_window: 100,
            min_confidence: 0.75,
            zone_filter: false,
            scalp_stop_points: 150.0,
            scalp_target_points: 300.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RiskConfig {
    /// Fraction of balance risked per trade
    pub risk_fraction: f64,
    /// Circuit breaker floor as a fraction of the captured initial balance
    pub stop_fraction: f64,
    /// When true the breaker stays tripped until restart; when false it
    /// re-arms once equity recovers above the floor
    pub latch_breaker: bool,
    /// Cap on concurrently open positions across all symbols
    pub max_open_positions: usize,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            risk_fraction: 0.01,
            stop_fraction: 0.25,
            latch_breaker: true,
            max_open_positions: 4,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct VenueConfig {
    pub bridge_url: String,
    pub request_timeout_secs: u64,
}

impl Default for VenueConfig {
    fn default() -> Self {
        Self {
            bridge_url: "http://127.0.0.1:5001".to_string(),
            request_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OracleConfig {
    pub url: String,
    pub request_timeout_secs: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:5002".to_string(),
            request_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WebhookConfig {
    pub enabled: bool,
    pub bind_addr: String,
    /// Substring required in the User-Agent header of inbound alerts
    pub origin_token: String,
    /// Alert symbol -> venue symbol (e.g. "BTCUSD" -> "BTCUSDm")
    pub symbol_aliases: HashMap<String, String>,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        let mut symbol_aliases = HashMap::new();
        symbol_aliases.insert("BTCUSD".to_string(), "BTCUSDm".to_string());
        symbol_aliases.insert("XAUUSD".to_string(), "XAUUSDm".to_string());
        Self {
            enabled: false,
            bind_addr: "127.0.0.1:5000".to_string(),
            origin_token: "tradingview".to_string(),
            symbol_aliases,
        }
    }
}

/// One scheduled (symbol, timeframe) pair
#[derive(Debug, Deserialize, Clone)]
pub struct SymbolSpec {
    pub name: String,
    pub timeframe: Timeframe,
    /// Cycle interval in seconds
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_interval_secs() -> u64 {
    300
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub symbols: Vec<SymbolSpec>,
    pub indicators: IndicatorConfig,
    pub trading: TradingConfig,
    pub risk: RiskConfig,
    pub venue: VenueConfig,
    pub oracle: OracleConfig,
    pub webhook: WebhookConfig,
    /// Directory for daily CSV audit logs
    pub audit_dir: String,
}

impl AppConfig {
    /// Load configuration from a file (TOML) with TRADEBOT_* env overrides
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("TRADEBOT").separator("__"));

        let config = builder.build()?;
        let mut app: AppConfig = config.try_deserialize()?;
        if app.audit_dir.is_empty() {
            app.audit_dir = "logs".to_string();
        }
        Ok(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.risk.risk_fraction, 0.01);
        assert_eq!(cfg.risk.stop_fraction, 0.25);
        assert_eq!(cfg.trading.min_confidence, 0.75);
        assert!(cfg.risk.latch_breaker);
        assert!(!cfg.trading.zone_filter);
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let cfg = AppConfig::load("does-not-exist").unwrap();
        assert_eq!(cfg.risk.max_open_positions, 4);
        assert_eq!(cfg.audit_dir, "logs");
        assert!(cfg.symbols.is_empty());
    }
}
