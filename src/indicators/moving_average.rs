/// Simple Moving Average over the trailing `period` prices
pub fn calculate_sma(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period {
        return None;
    }

    let sum: f64 = prices[prices.len() - period..].iter().sum();
    Some(sum / period as f64)
}

/// Exponential Moving Average over the full price series.
///
/// Seeded with the SMA of the first `period` prices, then folded
/// forward with the standard 2/(period+1) multiplier.
pub fn calculate_ema(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period {
        return None;
    }

    let seed: f64 = prices[..period].iter().sum::<f64>() / period as f64;
    let k = 2.0 / (period as f64 + 1.0);

    let ema = prices[period..]
        .iter()
        .fold(seed, |ema, price| (price - ema) * k + ema);

    Some(ema)
}
