use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One OHLCV bar as delivered by the history endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PricePoint {
    /// A bar whose OHLC values all equal `price`, used for close-only feeds.
    pub fn from_close(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self {
            timestamp,
            open: price,
            high: price,
            low: price,
            close: price,
            volume: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint<T> {
    pub timestamp: DateTime<Utc>,
    pub value: T,
}

pub type Series<T> = Vec<SeriesPoint<T>>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdPoint {
    pub macd: f64,
    pub signal: f64,
}

impl MacdPoint {
    pub fn histogram(&self) -> f64 {
        self.macd - self.signal
    }
}

/// Candlestick sample in the shape the chart surface consumes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcPoint {
    pub x: DateTime<Utc>,
    pub o: f64,
    pub h: f64,
    pub l: f64,
    pub c: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumePoint {
    pub x: DateTime<Utc>,
    pub y: f64,
}

/// Range selector of the big chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChartPeriod {
    #[serde(rename = "1d")]
    Day1,
    #[serde(rename = "1wk")]
    Week1,
    #[serde(rename = "1mo")]
    Month1,
    #[serde(rename = "3mo")]
    Month3,
    #[default]
    #[serde(rename = "6mo")]
    Month6,
    #[serde(rename = "1y")]
    Year1,
    #[serde(rename = "5y")]
    Year5,
    #[serde(rename = "max")]
    Max,
}

impl ChartPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartPeriod::Day1 => "1d",
            ChartPeriod::Week1 => "1wk",
            ChartPeriod::Month1 => "1mo",
            ChartPeriod::Month3 => "3mo",
            ChartPeriod::Month6 => "6mo",
            ChartPeriod::Year1 => "1y",
            ChartPeriod::Year5 => "5y",
            ChartPeriod::Max => "max",
        }
    }

    /// Sub-daily bars are served for these periods, so they need the time-stretch.
    pub fn is_intraday(&self) -> bool {
        matches!(self, ChartPeriod::Day1 | ChartPeriod::Week1 | ChartPeriod::Month1)
    }

    pub fn all() -> &'static [ChartPeriod] {
        &[
            ChartPeriod::Day1,
            ChartPeriod::Week1,
            ChartPeriod::Month1,
            ChartPeriod::Month3,
            ChartPeriod::Month6,
            ChartPeriod::Year1,
            ChartPeriod::Year5,
            ChartPeriod::Max,
        ]
    }
}

impl fmt::Display for ChartPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown chart period '{0}'")]
pub struct ParsePeriodError(pub String);

impl FromStr for ChartPeriod {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        ChartPeriod::all()
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ParsePeriodError(s.to_string()))
    }
}

/// A labeled, candle-aligned series handed to the rendering surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    pub name: String,
    pub parameters: serde_json::Value,
    pub values: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_period_round_trips_through_str() {
        for period in ChartPeriod::all() {
            assert_eq!(period.as_str().parse::<ChartPeriod>().unwrap(), *period);
        }
        assert_eq!("1WK".parse::<ChartPeriod>().unwrap(), ChartPeriod::Week1);
        assert!("2d".parse::<ChartPeriod>().is_err());
    }

    #[test]
    fn test_intraday_periods() {
        let intraday: Vec<_> = ChartPeriod::all().iter().filter(|p| p.is_intraday()).collect();
        assert_eq!(intraday, vec![&ChartPeriod::Day1, &ChartPeriod::Week1, &ChartPeriod::Month1]);
        assert_eq!(ChartPeriod::default(), ChartPeriod::Month6);
    }

    #[test]
    fn test_period_serde_uses_query_strings() {
        assert_eq!(serde_json::to_string(&ChartPeriod::Week1).unwrap(), "\"1wk\"");
        let parsed: ChartPeriod = serde_json::from_str("\"max\"").unwrap();
        assert_eq!(parsed, ChartPeriod::Max);
    }

    #[test]
    fn test_chart_point_field_names() {
        let x = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let ohlc = serde_json::to_value(OhlcPoint { x, o: 1.0, h: 2.0, l: 0.5, c: 1.5 }).unwrap();
        for key in ["x", "o", "h", "l", "c"] {
            assert!(ohlc.get(key).is_some(), "missing key {}", key);
        }
        let vol = serde_json::to_value(VolumePoint { x, y: 10.0 }).unwrap();
        assert_eq!(vol["y"], 10.0);
    }

    #[test]
    fn test_histogram() {
        let p = MacdPoint { macd: 1.5, signal: 0.5 };
        assert_eq!(p.histogram(), 1.0);
    }
}
