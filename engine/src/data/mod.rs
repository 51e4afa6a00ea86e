// Price history ingestion and storage.
pub mod csv_parser;
pub mod history;
pub mod market_data;

use crate::error::EngineError;
use shared::models::PricePoint;
use std::path::Path;

/// Layout of a history file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum HistoryFormat {
    /// `Date,Open,High,Low,Close,Volume` CSV.
    Csv,
    /// Stock endpoint JSON (record array or `{ "history": [...] }`).
    StockJson,
    /// Crypto endpoint JSON (`[ts, price]` pairs or OHLC bars).
    CryptoJson,
}

impl HistoryFormat {
    /// Guesses the format from the file extension; JSON defaults to the stock layout.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "csv" => Some(HistoryFormat::Csv),
            "json" => Some(HistoryFormat::StockJson),
            _ => None,
        }
    }
}

pub fn load_history_file(path: &Path, format: HistoryFormat) -> Result<Vec<PricePoint>, EngineError> {
    match format {
        HistoryFormat::Csv => csv_parser::HistoryCsvParser::load_price_points_from_csv(path),
        HistoryFormat::StockJson => history::parse_stock_history(&std::fs::read_to_string(path)?),
        HistoryFormat::CryptoJson => history::parse_crypto_history(&std::fs::read_to_string(path)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_format_from_path() {
        assert_eq!(HistoryFormat::from_path(Path::new("aapl.CSV")), Some(HistoryFormat::Csv));
        assert_eq!(HistoryFormat::from_path(Path::new("aapl.json")), Some(HistoryFormat::StockJson));
        assert_eq!(HistoryFormat::from_path(Path::new("aapl")), None);
    }

    #[test]
    fn test_load_crypto_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[[1709510400000, 10.0], [1709596800000, 11.0]]").unwrap();
        let points = load_history_file(file.path(), HistoryFormat::CryptoJson).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].close, 11.0);
    }
}
