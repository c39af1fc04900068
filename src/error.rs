use thiserror::Error;

/// Everything that can abort a trading cycle.
///
/// No variant escalates to process termination: the scheduler logs the
/// failure with symbol/timeframe context and re-evaluates from fresh
/// state on the next tick.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Venue session unreachable. Abort the cycle, retry next tick.
    #[error("venue connection error: {0}")]
    Connection(String),

    /// Symbol not found or could not be activated. Skip this cycle.
    #[error("symbol '{0}' unavailable")]
    SymbolUnavailable(String),

    /// Candle window too short for the configured indicators.
    #[error("insufficient data: have {have} candles, need {need}")]
    InsufficientData { have: usize, need: usize },

    /// Prediction oracle missing or incompatible. Never substitute a
    /// default prediction.
    #[error("prediction oracle unavailable: {0}")]
    OracleUnavailable(String),

    /// Circuit breaker tripped or sizing degenerated to zero.
    #[error("risk limit breached: {0}")]
    RiskLimitBreached(String),

    /// Stop/target still violates the venue minimum distance after
    /// clamping. Should be unreachable; treated as a fatal assertion
    /// for the cycle.
    #[error("stop distance violation after adjustment: {0}")]
    DistanceViolation(String),

    /// Venue rejected the order. Logged, no retry within the cycle.
    #[error("order rejected by venue: code {code} ({message})")]
    OrderRejected { code: u32, message: String },
}

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        EngineError::Connection(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
