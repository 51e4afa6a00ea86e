// Simple Moving Average (SMA) indicator implementation
use super::{closes, IndicatorCalculator};
use chrono::{DateTime, Utc};
use serde_json::Value;
use shared::models::{PricePoint, Series, SeriesPoint};

pub const DEFAULT_SMA_WINDOW: usize = 50;

/// Trailing means of `closes`, one per full window, stamped with the window's last timestamp.
///
/// Output length is `max(0, n - window + 1)` with `n` the shorter of the two inputs.
pub fn sma(closes: &[f64], timestamps: &[DateTime<Utc>], window: usize) -> Series<f64> {
    let n = closes.len().min(timestamps.len());
    sliding_means(&closes[..n], window)
        .into_iter()
        .zip(timestamps[..n].iter().skip(window.saturating_sub(1)))
        .map(|(value, &timestamp)| SeriesPoint { timestamp, value })
        .collect()
}

/// SMA overlay straight from price points.
pub fn sma_points(points: &[PricePoint], window: usize) -> Series<f64> {
    let timestamps: Vec<DateTime<Utc>> = points.iter().map(|p| p.timestamp).collect();
    sma(&closes(points), &timestamps, window)
}

fn sliding_means(data: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || data.len() < window {
        return Vec::new();
    }

    let divisor = window as f64;
    let mut results = Vec::with_capacity(data.len() - window + 1);
    let mut sum: f64 = data[..window].iter().sum();
    results.push(sum / divisor);

    for i in window..data.len() {
        sum = sum - data[i - window] + data[i];
        if !sum.is_finite() {
            // A NaN or infinity that left the window would otherwise stick forever.
            sum = data[i + 1 - window..=i].iter().sum();
        }
        results.push(sum / divisor);
    }
    results
}

pub struct Sma {
    name: String,
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("SMA({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[PricePoint]) -> Vec<Option<f64>> {
        let means = sliding_means(&closes(data), self.period);
        if means.is_empty() {
            return vec![None; data.len()];
        }
        let mut results = vec![None; self.period - 1];
        results.extend(means.into_iter().map(Some));
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::{assert_close, points_from_closes};

    fn assert_f64_vec_eq(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len(), "Vectors differ in length");
        for (i, (val_a, val_b)) in a.iter().zip(b.iter()).enumerate() {
            if val_a.is_nan() && val_b.is_nan() {
                // Both are NaN, consider them equal for this test
            } else {
                assert!((val_a - val_b).abs() < 1e-9, "Mismatch at index {}: {} != {}", i, val_a, val_b);
            }
        }
    }

    fn values(series: &Series<f64>) -> Vec<f64> {
        series.iter().map(|p| p.value).collect()
    }

    #[test]
    fn test_sma_calculation() {
        let points = points_from_closes(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let results = sma_points(&points, 3);
        assert_f64_vec_eq(&values(&results), &[2.0, 3.0, 4.0]);
        // Each mean is stamped with the last point of its window.
        assert_eq!(results[0].timestamp, points[2].timestamp);
        assert_eq!(results[2].timestamp, points[4].timestamp);
    }

    #[test]
    fn test_sma_default_window_length_and_first_value() {
        let data: Vec<f64> = (0..120).map(|i| 50.0 + (i as f64 * 0.21).cos() * 4.0).collect();
        let points = points_from_closes(&data);
        let results = sma_points(&points, DEFAULT_SMA_WINDOW);
        assert_eq!(results.len(), 120 - 49);
        let expected_first = data[..50].iter().sum::<f64>() / 50.0;
        assert_close(results[0].value, expected_first);
        let expected_last = data[70..].iter().sum::<f64>() / 50.0;
        assert_close(results[70].value, expected_last);
    }

    #[test]
    fn test_sma_insufficient_data() {
        let points = points_from_closes(&[1.0, 2.0]);
        assert!(sma_points(&points, 3).is_empty());
        assert!(sma_points(&points_from_closes(&[1.0; 49]), 50).is_empty());
        assert_eq!(sma_points(&points_from_closes(&[1.0; 50]), 50).len(), 1);
    }

    #[test]
    fn test_sma_period_one() {
        let points = points_from_closes(&[1.0, 2.0, 3.0]);
        assert_f64_vec_eq(&values(&sma_points(&points, 1)), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_sma_empty_data_and_zero_window() {
        assert!(sma_points(&[], 3).is_empty());
        let points = points_from_closes(&[1.0, 2.0, 3.0]);
        assert!(sma_points(&points, 0).is_empty());
    }

    #[test]
    fn test_sma_mismatched_inputs_use_shorter_length() {
        let points = points_from_closes(&[1.0, 2.0, 3.0, 4.0]);
        let timestamps: Vec<_> = points.iter().map(|p| p.timestamp).take(3).collect();
        let results = sma(&[1.0, 2.0, 3.0, 4.0], &timestamps, 2);
        assert_f64_vec_eq(&values(&results), &[1.5, 2.5]);
    }

    #[test]
    fn test_sma_nan_only_affects_its_windows() {
        let data = [1.0, f64::NAN, 3.0, 4.0, 5.0, 6.0];
        let points = points_from_closes(&data);
        let results = values(&sma_points(&points, 2));
        assert_f64_vec_eq(&results, &[f64::NAN, f64::NAN, 3.5, 4.5, 5.5]);
    }

    #[test]
    fn test_sma_calculator_is_candle_aligned() {
        let points = points_from_closes(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let results = Sma::new(3).calculate(&points);
        assert_eq!(results, vec![None, None, Some(2.0), Some(3.0), Some(4.0)]);
        assert_eq!(Sma::new(3).calculate(&points[..2]), vec![None, None]);
    }
}
