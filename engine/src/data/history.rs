// Decoding of the backend's history payloads into price points.
use crate::error::EngineError;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use shared::models::PricePoint;

// Timestamp formats seen in the stock and crypto history payloads.
pub mod date_format {
    use anyhow::{anyhow, Result};
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

    // Epoch values below this are seconds, above are milliseconds.
    const SECONDS_CUTOFF: f64 = 1e11;

    /// Parses RFC 3339, RFC 2822 (Flask's jsonify format),
    /// `YYYY-MM-DD HH:MM:SS[±HH:MM]` and bare `YYYY-MM-DD` (midnight UTC).
    pub fn parse_date(s: &str) -> Result<DateTime<Utc>> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
            return Ok(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%:z") {
            return Ok(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
            return Ok(naive.and_utc());
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
        }
        Err(anyhow!("Failed to parse date '{}'", s))
    }

    /// Epoch timestamp in seconds or milliseconds, told apart by magnitude.
    pub fn parse_epoch(value: f64) -> Result<DateTime<Utc>> {
        if !value.is_finite() {
            return Err(anyhow!("Invalid epoch timestamp {}", value));
        }
        let millis = if value.abs() < SECONDS_CUTOFF { value * 1000.0 } else { value };
        DateTime::from_timestamp_millis(millis.round() as i64)
            .ok_or_else(|| anyhow!("Epoch timestamp {} is out of range", value))
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::{Datelike, TimeZone, Timelike};

        #[test]
        fn test_parse_date_rfc2822() {
            let dt = parse_date("Mon, 04 Mar 2024 00:00:00 GMT").unwrap();
            assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap());
        }

        #[test]
        fn test_parse_date_with_offset() {
            let dt = parse_date("2024-03-04 09:30:00-05:00").unwrap();
            assert_eq!(dt.hour(), 14);
            assert_eq!(dt.minute(), 30);
            let dt = parse_date("2024-03-04T09:30:00-05:00").unwrap();
            assert_eq!(dt.hour(), 14);
        }

        #[test]
        fn test_parse_date_plain_day() {
            let dt = parse_date("2024-12-30").unwrap();
            assert_eq!((dt.year(), dt.month(), dt.day(), dt.hour()), (2024, 12, 30, 0));
        }

        #[test]
        fn test_parse_date_invalid() {
            assert!(parse_date("30/12/2024").is_err());
            assert!(parse_date("").is_err());
        }

        #[test]
        fn test_parse_epoch_units() {
            let expected = Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap();
            assert_eq!(parse_epoch(1_709_510_400.0).unwrap(), expected);
            assert_eq!(parse_epoch(1_709_510_400_000.0).unwrap(), expected);
            assert!(parse_epoch(f64::NAN).is_err());
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Epoch(f64),
    Text(String),
}

impl RawTimestamp {
    fn resolve(&self) -> anyhow::Result<DateTime<Utc>> {
        match self {
            RawTimestamp::Epoch(value) => date_format::parse_epoch(*value),
            RawTimestamp::Text(text) => date_format::parse_date(text),
        }
    }
}

// One row of the stock history endpoint (pandas column names).
#[derive(Debug, Deserialize)]
struct StockRecord {
    #[serde(rename = "Date", alias = "Datetime", alias = "date", alias = "timestamp")]
    date: RawTimestamp,
    #[serde(rename = "Open", alias = "open")]
    open: f64,
    #[serde(rename = "High", alias = "high")]
    high: f64,
    #[serde(rename = "Low", alias = "low")]
    low: f64,
    #[serde(rename = "Close", alias = "close")]
    close: f64,
    #[serde(rename = "Volume", alias = "volume", default)]
    volume: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StockPayload {
    Bare(Vec<StockRecord>),
    Wrapped { history: Vec<StockRecord> },
}

#[derive(Debug, Deserialize)]
struct CryptoBar {
    #[serde(alias = "time")]
    timestamp: f64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(rename = "volumeFrom", alias = "volumefrom", default)]
    volume_from: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CryptoRow {
    Pair(f64, f64),
    Bar(CryptoBar),
}

/// Decodes the stock history endpoint: a bare record array or `{ "history": [...] }`.
///
/// Records keep their payload order.
pub fn parse_stock_history(json: &str) -> Result<Vec<PricePoint>, EngineError> {
    let payload: StockPayload = serde_json::from_str(json).map_err(|e| {
        EngineError::HistoryFormatError(format!("Unrecognised stock history payload: {}", e))
    })?;
    let records = match payload {
        StockPayload::Bare(records) => records,
        StockPayload::Wrapped { history } => history,
    };

    let points = records
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            let timestamp = record.date.resolve().map_err(|e| {
                EngineError::HistoryFormatError(format!("Stock record {}: {}", idx, e))
            })?;
            Ok(PricePoint {
                timestamp,
                open: record.open,
                high: record.high,
                low: record.low,
                close: record.close,
                volume: record.volume.unwrap_or(0.0),
            })
        })
        .collect::<Result<Vec<_>, EngineError>>()?;

    tracing::debug!(count = points.len(), "Decoded stock history");
    Ok(points)
}

/// Decodes the crypto history endpoint: `[timestamp_ms, price]` pairs or
/// `{timestamp, open, high, low, close, volumeFrom}` bars.
pub fn parse_crypto_history(json: &str) -> Result<Vec<PricePoint>, EngineError> {
    let rows: Vec<CryptoRow> = serde_json::from_str(json).map_err(|e| {
        EngineError::HistoryFormatError(format!("Unrecognised crypto history payload: {}", e))
    })?;

    let points = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let raw_ts = match row {
                CryptoRow::Pair(ts, _) => *ts,
                CryptoRow::Bar(bar) => bar.timestamp,
            };
            let timestamp = date_format::parse_epoch(raw_ts).map_err(|e| {
                EngineError::HistoryFormatError(format!("Crypto row {}: {}", idx, e))
            })?;
            Ok(match row {
                CryptoRow::Pair(_, price) => PricePoint::from_close(timestamp, *price),
                CryptoRow::Bar(bar) => PricePoint {
                    timestamp,
                    open: bar.open,
                    high: bar.high,
                    low: bar.low,
                    close: bar.close,
                    volume: bar.volume_from.unwrap_or(0.0),
                },
            })
        })
        .collect::<Result<Vec<_>, EngineError>>()?;

    tracing::debug!(count = points.len(), "Decoded crypto history");
    Ok(points)
}
