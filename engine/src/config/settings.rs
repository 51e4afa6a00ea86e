// Indicator and chart settings, loaded from a JSON file or left at their defaults
use crate::error::EngineError;
use crate::indicators::macd::{DEFAULT_MACD_FAST, DEFAULT_MACD_SIGNAL, DEFAULT_MACD_SLOW};
use crate::indicators::{DEFAULT_RSI_PERIOD, DEFAULT_SMA_WINDOW};
use chrono::FixedOffset;
use serde::Deserialize;
use shared::models::ChartPeriod;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct IndicatorSettings {
    pub sma_window: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub default_period: ChartPeriod,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        IndicatorSettings {
            sma_window: DEFAULT_SMA_WINDOW,
            rsi_period: DEFAULT_RSI_PERIOD,
            macd_fast: DEFAULT_MACD_FAST,
            macd_slow: DEFAULT_MACD_SLOW,
            macd_signal: DEFAULT_MACD_SIGNAL,
            default_period: ChartPeriod::default(),
        }
    }
}

impl IndicatorSettings {
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let settings: IndicatorSettings = serde_json::from_str(json)
            .map_err(|e| EngineError::ConfigError(format!("Invalid settings JSON: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            EngineError::ConfigError(format!("Failed to read settings file '{}': {}", path.display(), e))
        })?;
        let settings = Self::from_json_str(&contents)?;
        tracing::info!(path = %path.display(), ?settings, "Loaded indicator settings");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let periods = [
            ("sma_window", self.sma_window),
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, value)| *value == 0) {
            return Err(EngineError::ConfigError(format!("'{}' must be greater than 0", name)));
        }
        if self.macd_fast >= self.macd_slow {
            return Err(EngineError::ConfigError(format!(
                "'macd_fast' ({}) must be shorter than 'macd_slow' ({})",
                self.macd_fast, self.macd_slow
            )));
        }
        Ok(())
    }
}

/// Offset east of UTC for grouping intraday sessions; must stay within one day.
pub fn utc_offset_from_minutes(minutes: i32) -> Result<FixedOffset, EngineError> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| EngineError::ConfigError(format!("UTC offset of {} minutes is out of range", minutes)))
}
