use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trade direction as sent to the venue
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Buy => Direction::Sell,
            Direction::Sell => Direction::Buy,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Buy => write!(f, "BUY"),
            Direction::Sell => write!(f, "SELL"),
        }
    }
}

/// Chart timeframe for a scheduled (symbol, timeframe) pair
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Timeframe {
    M1,
    M5,
    M15,
    M30,
    H1,
    H4,
    D1,
}

impl Timeframe {
    pub fn minutes(&self) -> u64 {
        match self {
            Timeframe::M1 => 1,
            Timeframe::M5 => 5,
            Timeframe::M15 => 15,
            Timeframe::M30 => 30,
            Timeframe::H1 => 60,
            Timeframe::H4 => 240,
            Timeframe::D1 => 1440,
        }
    }

    /// Timeframes below M15 trade the scalping rule set, M15 and above
    /// the trend-following rule set.
    pub fn is_scalping(&self) -> bool {
        self.minutes() < 15
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::M1 => "M1",
            Timeframe::M5 => "M5",
            Timeframe::M15 => "M15",
            Timeframe::M30 => "M30",
            Timeframe::H1 => "H1",
            Timeframe::H4 => "H4",
            Timeframe::D1 => "D1",
        }
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "M1" | "1" => Ok(Timeframe::M1),
            "M5" | "5" => Ok(Timeframe::M5),
            "M15" | "15" => Ok(Timeframe::M15),
            "M30" | "30" => Ok(Timeframe::M30),
            "H1" | "60" => Ok(Timeframe::H1),
            "H4" | "240" => Ok(Timeframe::H4),
            "D1" => Ok(Timeframe::D1),
            other => Err(format!("unknown timeframe '{}'", other)),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// OHLCV candlestick data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Absolute size of the candle body
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}

/// Normalize a candle window on ingestion: sort by timestamp and drop
/// duplicates so the window is strictly increasing.
pub fn normalize_candles(mut candles: Vec<Candle>) -> Vec<Candle> {
    candles.sort_by_key(|c| c.timestamp);
    candles.dedup_by_key(|c| c.timestamp);
    candles
}

/// Opaque output of the external prediction oracle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    pub direction: Direction,
    /// Calibrated probability in [0,1], used as-is (never renormalized)
    pub confidence: f64,
}

/// Which rule set produced a signal; drives stop/target placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyClass {
    Scalping,
    Trend,
}

/// Directional signal from a rule-based strategy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategySignal {
    pub direction: Option<Direction>,
    /// Strategy-specific corroboration (volume/engulfing for scalping,
    /// impulse bar for trend)
    pub confirmed: bool,
}

impl StrategySignal {
    pub fn none() -> Self {
        Self {
            direction: None,
            confirmed: false,
        }
    }
}

/// Price zone relative to rolling support/resistance
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Zone {
    NearSupport,
    NearResistance,
    Mid,
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::NearSupport => write!(f, "near_support"),
            Zone::NearResistance => write!(f, "near_resistance"),
            Zone::Mid => write!(f, "mid"),
        }
    }
}

/// Fully priced and sized entry, ready for submission
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPlan {
    pub direction: Direction,
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub size: f64,
}

/// Outcome of one cycle for one symbol; never partially applied
#[derive(Debug, Clone, PartialEq)]
pub enum TradeDecision {
    Open(OrderPlan),
    Hold,
    Close { position_id: u64 },
}

/// Order request as submitted to the venue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderRequest {
    pub symbol: String,
    pub direction: Direction,
    pub volume: f64,
    pub price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
}

/// Open position as reported by the venue. The venue copy is
/// authoritative; this is a per-cycle read, never stored durably.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub id: u64,
    pub symbol: String,
    pub direction: Direction,
    pub volume: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
}

/// Account balance and equity at the start of a cycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AccountSnapshot {
    pub balance: f64,
    pub equity: f64,
}

/// Venue metadata for a tradeable symbol
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SymbolInfo {
    pub name: String,
    /// Smallest price increment
    pub point: f64,
    /// Venue-enforced minimum gap between entry and stop/target
    pub min_stop_distance: f64,
    /// Volume rounding step for order sizes
    pub volume_step: f64,
}

/// Live bid/ask quote
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Tick {
    pub bid: f64,
    pub ask: f64,
}

impl Tick {
    /// Execution price for a market order in the given direction
    pub fn entry_price(&self, direction: Direction) -> f64 {
        match direction {
            Direction::Buy => self.ask,
            Direction::Sell => self.bid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn candle_at(secs: i64, close: f64) -> Candle {
        Candle {
            timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            close,
            volume: 100.0,
        }
    }

    #[test]
    fn test_timeframe_classification() {
        assert!(Timeframe::M1.is_scalping());
        assert!(Timeframe::M5.is_scalping());
        assert!(!Timeframe::M15.is_scalping());
        assert!(!Timeframe::H1.is_scalping());
    }

    #[test]
    fn test_timeframe_parse_aliases() {
        assert_eq!("m5".parse::<Timeframe>().unwrap(), Timeframe::M5);
        assert_eq!("15".parse::<Timeframe>().unwrap(), Timeframe::M15);
        assert!("M7".parse::<Timeframe>().is_err());
    }

    #[test]
    fn test_normalize_sorts_and_dedupes() {
        let candles = vec![candle_at(300, 3.0), candle_at(100, 1.0), candle_at(300, 9.0)];
        let normalized = normalize_candles(candles);

        assert_eq!(normalized.len(), 2);
        assert!(normalized[0].timestamp < normalized[1].timestamp);
        // First occurrence wins on duplicate timestamps
        assert_eq!(normalized[1].close, 3.0);
    }

    #[test]
    fn test_entry_price_side() {
        let tick = Tick { bid: 99.0, ask: 101.0 };
        assert_eq!(tick.entry_price(Direction::Buy), 101.0);
        assert_eq!(tick.entry_price(Direction::Sell), 99.0);
    }
}
