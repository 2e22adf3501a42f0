use std::collections::HashMap;

use chrono::NaiveDate;

use crate::models::DataPoint;

/// Bare numeric sequence for indicator math, most recent last. Non-finite values are dropped.
pub fn clean_values(series: &[DataPoint]) -> Vec<f64> {
    series
        .iter()
        .map(|dp| dp.value)
        .filter(|v| v.is_finite())
        .collect()
}

/// Spread `A - B` on dates present in both series, rounded to 3 decimals.
///
/// Iterates A in its own order. Dates of A missing from B are dropped. When B repeats a date,
/// the later entry wins.
pub fn spread_by_date(series_a: &[DataPoint], series_b: &[DataPoint]) -> Vec<DataPoint> {
    let map_b: HashMap<NaiveDate, f64> = series_b.iter().map(|dp| (dp.time, dp.value)).collect();

    series_a
        .iter()
        .filter_map(|dp| {
            map_b.get(&dp.time).map(|&val_b| DataPoint {
                time: dp.time,
                value: round_to(dp.value - val_b, 3),
            })
        })
        .collect()
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dp(day: u32, value: f64) -> DataPoint {
        DataPoint::new(NaiveDate::from_ymd_opt(2024, 1, day).unwrap(), value)
    }

    #[test]
    fn test_clean_values_drops_non_finite() {
        let series = vec![dp(1, 1.0), dp(2, f64::NAN), dp(3, f64::INFINITY), dp(4, 4.0)];
        assert_eq!(clean_values(&series), vec![1.0, 4.0]);
    }

    #[test]
    fn test_spread_inner_join_on_date() {
        let ten = vec![dp(2, 4.25), dp(3, 4.30), dp(4, 4.10)];
        let two = vec![dp(2, 4.50), dp(4, 4.00), dp(5, 3.9)];

        let spread = spread_by_date(&ten, &two);
        assert_eq!(spread, vec![dp(2, -0.25), dp(4, 0.1)]);
    }

    #[test]
    fn test_spread_rounds_to_three_decimals() {
        let a = vec![dp(1, 4.1234)];
        let b = vec![dp(1, 2.0001)];
        assert_eq!(spread_by_date(&a, &b)[0].value, 2.123);
    }

    #[test]
    fn test_spread_duplicate_date_in_b_uses_last() {
        let a = vec![dp(1, 5.0)];
        let b = vec![dp(1, 1.0), dp(1, 2.0)];
        assert_eq!(spread_by_date(&a, &b), vec![dp(1, 3.0)]);
    }

    #[test]
    fn test_spread_keeps_order_of_a() {
        let a = vec![dp(3, 3.0), dp(1, 1.0)];
        let b = vec![dp(1, 0.5), dp(3, 0.5)];
        let times: Vec<_> = spread_by_date(&a, &b).iter().map(|p| p.time).collect();
        assert_eq!(times, vec![dp(3, 0.0).time, dp(1, 0.0).time]);
    }

    #[test]
    fn test_spread_empty_when_no_overlap() {
        assert!(spread_by_date(&[dp(1, 1.0)], &[dp(2, 1.0)]).is_empty());
        assert!(spread_by_date(&[], &[dp(2, 1.0)]).is_empty());
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.12345, 3), 0.123);
        assert_eq!(round_to(49.96, 1), 50.0);
    }
}
