/// Relative Strength Index over closing prices, Wilder-smoothed.
///
/// Returns a value in [0,100], or None if fewer than `period + 1`
/// prices are available.
pub fn calculate_rsi(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period + 1 {
        return None;
    }

    let mut changes = prices.windows(2).map(|w| w[1] - w[0]);

    // Seed averages with a simple mean over the first `period` changes
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for _ in 0..period {
        let change = changes.next()?;
        if change > 0.0 {
            avg_gain += change;
        } else {
            avg_loss += -change;
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;

    // Wilder's smoothing over the remainder of the window
    for change in changes {
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);
        avg_gain = (avg_gain * (period as f64 - 1.0) + gain) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + loss) / period as f64;
    }

    if avg_loss == 0.0 {
        return Some(100.0);
    }

    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_in_range() {
        let prices = vec![
            44.0, 44.25, 44.5, 43.75, 44.0, 44.5, 45.0, 45.5, 45.25, 45.5, 46.0, 46.5, 46.25,
            46.0, 46.5,
        ];
        let rsi = calculate_rsi(&prices, 14).unwrap();
        assert!(rsi > 0.0 && rsi < 100.0);
    }

    #[test]
    fn test_rsi_insufficient_data() {
        assert!(calculate_rsi(&[100.0, 101.0, 102.0], 14).is_none());
    }

    #[test]
    fn test_rsi_monotonic_gains() {
        let prices: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        assert_eq!(calculate_rsi(&prices, 5), Some(100.0));
    }

    #[test]
    fn test_rsi_monotonic_losses_near_zero() {
        let prices: Vec<f64> = (0..10).map(|i| 100.0 - i as f64).collect();
        let rsi = calculate_rsi(&prices, 5).unwrap();
        assert!(rsi < 1.0);
    }
}
