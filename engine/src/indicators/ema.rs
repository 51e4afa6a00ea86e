// Exponential Moving Average (EMA) indicator implementation
use super::{closes, IndicatorCalculator};
use serde_json::Value;
use shared::models::PricePoint;

/// EMA over `data` with smoothing `k = 2 / (period + 1)`.
///
/// The first output is `data[0]` itself rather than an SMA of the first
/// `period` values, so early values differ from the textbook EMA. Every
/// MACD/signal value downstream inherits this seeding.
pub fn ema(data: &[f64], period: usize) -> Vec<f64> {
    let Some((&first, rest)) = data.split_first() else {
        return Vec::new();
    };

    let k = 2.0 / (period as f64 + 1.0);
    let mut results = Vec::with_capacity(data.len());
    let mut previous = first;
    results.push(previous);

    for &value in rest {
        previous = value * k + previous * (1.0 - k);
        results.push(previous);
    }
    results
}

pub struct Ema {
    name: String,
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("EMA({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[PricePoint]) -> Vec<Option<f64>> {
        ema(&closes(data), self.period).into_iter().map(Some).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::{assert_close, points_from_closes};

    #[test]
    fn test_ema_seeds_with_first_value() {
        // k = 2 / (9 + 1) = 0.2
        let results = ema(&[10.0, 20.0, 30.0], 9);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0], 10.0);
        assert_close(results[1], 12.0);
        assert_close(results[2], 15.6);
    }

    #[test]
    fn test_ema_empty_data() {
        assert!(ema(&[], 12).is_empty());
    }

    #[test]
    fn test_ema_length_does_not_depend_on_period() {
        let data: Vec<f64> = (0..5).map(|i| i as f64).collect();
        assert_eq!(ema(&data, 1).len(), 5);
        assert_eq!(ema(&data, 50).len(), 5);
    }

    #[test]
    fn test_ema_period_one_tracks_input() {
        // k = 1, so every output is the raw value.
        let data = [3.0, 7.0, 1.0];
        assert_eq!(ema(&data, 1), data.to_vec());
    }

    #[test]
    fn test_ema_constant_series_stays_constant() {
        let results = ema(&[5.0; 20], 12);
        assert!(results.iter().all(|v| *v == 5.0));
    }

    #[test]
    fn test_ema_is_repeatable() {
        let data: Vec<f64> = (0..100).map(|i| (i as f64 * 0.37).sin() * 10.0 + 50.0).collect();
        let first = ema(&data, 12);
        let second = ema(&data, 12);
        assert_eq!(
            first.iter().map(|v| v.to_bits()).collect::<Vec<_>>(),
            second.iter().map(|v| v.to_bits()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_ema_propagates_nan() {
        let results = ema(&[1.0, f64::NAN, 3.0], 3);
        assert_eq!(results[0], 1.0);
        assert!(results[1].is_nan());
        assert!(results[2].is_nan());
    }

    #[test]
    fn test_ema_calculator_is_candle_aligned() {
        let points = points_from_closes(&[10.0, 20.0, 30.0]);
        let calc = Ema::new(9);
        let results = calc.calculate(&points);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0], Some(10.0));
        assert_close(results[2].unwrap(), 15.6);
        assert_eq!(calc.name(), "EMA(9)");
        assert_eq!(calc.parameters()["period"], 9);
    }
}
