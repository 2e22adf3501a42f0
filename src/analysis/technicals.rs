//! Scalar indicators over a numeric series (oldest first, latest last).
//!
//! Every function answers `None` when the history is too short instead of inventing a value.

pub fn calculate_sma(data: &[f64], period: usize) -> Option<f64> {
    if period == 0 || data.len() < period {
        return None;
    }
    let sum: f64 = data.iter().rev().take(period).sum();
    Some(sum / period as f64)
}

/// Percent change between the latest value and the one `lookback` periods earlier.
pub fn rate_of_change_pct(data: &[f64], lookback: usize) -> Option<f64> {
    let (latest, base) = latest_and_base(data, lookback)?;
    let roc = (latest - base) / base * 100.0;
    roc.is_finite().then_some(roc)
}

/// Absolute change between the latest value and the one `lookback` periods earlier.
pub fn change_over(data: &[f64], lookback: usize) -> Option<f64> {
    let (latest, base) = latest_and_base(data, lookback)?;
    Some(latest - base)
}

fn latest_and_base(data: &[f64], lookback: usize) -> Option<(f64, f64)> {
    if data.len() <= lookback {
        return None;
    }
    let latest = *data.last()?;
    let base = data[data.len() - 1 - lookback];
    Some((latest, base))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma() {
        assert_eq!(calculate_sma(&[1.0, 2.0, 3.0, 4.0, 5.0], 5), Some(3.0));
        assert_eq!(calculate_sma(&[1.0, 2.0, 3.0, 4.0, 5.0], 2), Some(4.5));
    }

    #[test]
    fn test_sma_insufficient_history() {
        assert_eq!(calculate_sma(&[1.0, 2.0, 3.0], 5), None);
        assert_eq!(calculate_sma(&[], 1), None);
        assert_eq!(calculate_sma(&[1.0], 0), None);
    }

    #[test]
    fn test_rate_of_change() {
        assert_eq!(rate_of_change_pct(&[100.0, 110.0], 1), Some(10.0));
        assert_eq!(rate_of_change_pct(&[200.0, 50.0, 150.0], 2), Some(-25.0));
    }

    #[test]
    fn test_rate_of_change_insufficient_or_zero_base() {
        assert_eq!(rate_of_change_pct(&[100.0], 1), None);
        assert_eq!(rate_of_change_pct(&[0.0, 5.0], 1), None);
    }

    #[test]
    fn test_change_over() {
        assert_eq!(change_over(&[4.0, 4.5, 3.5], 2), Some(-0.5));
        assert_eq!(change_over(&[4.0, 4.5], 2), None);
        assert_eq!(change_over(&[4.0], 0), Some(0.0));
    }
}
