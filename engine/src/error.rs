use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },

    // Payload parsed but did not match any of the history contracts.
    #[error("History format error: {0}")]
    HistoryFormatError(String),

    #[error("Market data store error: {0}")]
    MarketDataError(String),

    #[error("Indicator calculation error: {0}")]
    IndicatorError(String),
}

impl EngineError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, EngineError::MarketDataError(msg) if msg.to_lowercase().contains("not found"))
    }

    /// Process exit code used by the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            EngineError::ConfigError(_) => 78,
            EngineError::CsvSystemError { .. }
            | EngineError::JsonError { .. }
            | EngineError::HistoryFormatError(_) => 65,
            EngineError::IoError { .. } => 74,
            EngineError::MarketDataError(_) if self.is_not_found() => 66,
            _ => 70,
        }
    }
}
