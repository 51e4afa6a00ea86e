use crate::data::history::date_format;
use crate::error::EngineError;
use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, StringRecord};
use shared::models::PricePoint;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

pub struct HistoryCsvParser;

impl HistoryCsvParser {
    // CSV Header: Date,Open,High,Low,Close,Volume (yfinance export; extra columns are ignored)
    // Example Row: 2024-03-04 09:30:00-05:00,175.01,175.40,174.85,175.10,1523400
    pub fn load_price_points_from_csv(file_path: impl AsRef<Path>) -> Result<Vec<PricePoint>, EngineError> {
        let path = file_path.as_ref();
        let file = File::open(path)?;
        let points = Self::read_price_points(BufReader::new(file))?;
        tracing::info!(path = %path.display(), count = points.len(), "Loaded price history from CSV");
        Ok(points)
    }

    pub fn read_price_points<R: Read>(reader: R) -> Result<Vec<PricePoint>, EngineError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let mut points = Vec::new();

        for (idx, result) in rdr.records().enumerate() {
            let record = result?;
            let line = idx + 2;
            let point = Self::parse_record(&record, &headers)
                .map_err(|e| EngineError::HistoryFormatError(format!("Line {}: {:#}", line, e)))?;
            points.push(point);
        }
        Ok(points)
    }

    fn parse_record(record: &StringRecord, headers: &StringRecord) -> Result<PricePoint> {
        let date_str = Self::get_field(record, headers, &["Date", "Datetime"])
            .ok_or_else(|| anyhow!("Missing 'Date' field"))?;
        let timestamp = date_format::parse_date(date_str)?;

        Ok(PricePoint {
            timestamp,
            open: Self::number(record, headers, "Open")?,
            high: Self::number(record, headers, "High")?,
            low: Self::number(record, headers, "Low")?,
            close: Self::number(record, headers, "Close")?,
            volume: match Self::get_field(record, headers, &["Volume"]) {
                Some(v) if !v.is_empty() => v.parse::<f64>().with_context(|| format!("Error parsing 'Volume' value '{}'", v))?,
                _ => 0.0,
            },
        })
    }

    fn number(record: &StringRecord, headers: &StringRecord, name: &str) -> Result<f64> {
        let raw = Self::get_field(record, headers, &[name]).ok_or_else(|| anyhow!("Missing '{}' field", name))?;
        raw.parse::<f64>()
            .with_context(|| format!("Error parsing '{}' value '{}'", name, raw))
    }

    // Looks a field up by header name (case-insensitive), trying each alias in turn.
    fn get_field<'a>(record: &'a StringRecord, headers: &StringRecord, names: &[&str]) -> Option<&'a str> {
        names.iter().find_map(|name| {
            headers
                .iter()
                .position(|header| header.eq_ignore_ascii_case(name))
                .and_then(|pos| record.get(pos))
        })
    }
}
