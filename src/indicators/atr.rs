use crate::models::Candle;

/// Average True Range, Wilder-smoothed.
///
/// True range per candle is the greatest of high−low,
/// |high−previous close| and |low−previous close|. Needs at least
/// `period + 1` candles.
pub fn calculate_atr(candles: &[Candle], period: usize) -> Option<f64> {
    if period == 0 || candles.len() < period + 1 {
        return None;
    }

    let true_ranges: Vec<f64> = candles
        .windows(2)
        .map(|pair| {
            let prev_close = pair[0].close;
            let c = &pair[1];
            (c.high - c.low)
                .max((c.high - prev_close).abs())
                .max((c.low - prev_close).abs())
        })
        .collect();

    let seed: f64 = true_ranges[..period].iter().sum::<f64>() / period as f64;
    let atr = true_ranges[period..]
        .iter()
        .fold(seed, |atr, tr| (atr * (period as f64 - 1.0) + tr) / period as f64);

    Some(atr)
}
