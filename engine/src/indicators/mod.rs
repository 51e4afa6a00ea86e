// Technical indicators module
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use ema::{ema, Ema};
pub use macd::{macd, macd_with, Macd};
pub use rsi::{rsi, Rsi, DEFAULT_RSI_PERIOD};
pub use sma::{sma, sma_points, Sma, DEFAULT_SMA_WINDOW};

use crate::error::EngineError;
use serde_json::Value;
use shared::models::{Indicator, PricePoint};

// Common trait for all indicators
pub trait IndicatorCalculator: Send + Sync {
    fn name(&self) -> &str;
    fn parameters(&self) -> Value; // Parameters used for this indicator instance
    fn calculate(&self, data: &[PricePoint]) -> Vec<Option<f64>>; // One entry per input point, None where undefined

    fn to_indicator(&self, data: &[PricePoint]) -> Indicator {
        Indicator {
            name: self.name().to_string(),
            parameters: self.parameters(),
            values: self.calculate(data),
        }
    }
}

/// Builds a calculator from its short name and a JSON parameter object.
///
/// Missing parameters fall back to the chart defaults (SMA 50, EMA 20, RSI 14, MACD 12/26/9).
pub fn indicator_from_name(name: &str, params: &Value) -> Result<Box<dyn IndicatorCalculator>, EngineError> {
    let param = |key: &str, default: usize| -> Result<usize, EngineError> {
        let value = match params.get(key) {
            None | Some(Value::Null) => default,
            Some(raw) => raw.as_u64().map(|v| v as usize).ok_or_else(|| {
                EngineError::IndicatorError(format!(
                    "Indicator parameter '{}' must be a positive integer, got {}",
                    key, raw
                ))
            })?,
        };
        if value == 0 {
            return Err(EngineError::IndicatorError(format!("Indicator parameter '{}' cannot be 0", key)));
        }
        Ok(value)
    };

    let calculator: Box<dyn IndicatorCalculator> = match name.to_lowercase().as_str() {
        "sma" => Box::new(Sma::new(param("period", DEFAULT_SMA_WINDOW)?)),
        "ema" => Box::new(Ema::new(param("period", 20)?)),
        "rsi" => Box::new(Rsi::new(param("period", DEFAULT_RSI_PERIOD)?)),
        "macd" => Box::new(Macd::new(
            param("fast", macd::DEFAULT_MACD_FAST)?,
            param("slow", macd::DEFAULT_MACD_SLOW)?,
            param("signal", macd::DEFAULT_MACD_SIGNAL)?,
        )),
        _ => {
            tracing::error!(indicator_type = %name, "Unknown indicator type requested");
            return Err(EngineError::IndicatorError(format!("Unknown indicator type: {}", name)));
        }
    };
    Ok(calculator)
}

pub(crate) fn closes(data: &[PricePoint]) -> Vec<f64> {
    data.iter().map(|p| p.close).collect()
}
