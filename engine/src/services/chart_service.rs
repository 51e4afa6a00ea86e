// Assembles everything the big chart needs for one symbol and period.
use crate::chart::intraday::{stretch_intraday, StretchedSeries};
use crate::config::IndicatorSettings;
use crate::data::market_data::HistoryStore;
use crate::error::EngineError;
use crate::indicators::{macd_with, rsi, sma_points};
use chrono::FixedOffset;
use serde::Serialize;
use shared::models::{ChartPeriod, MacdPoint, PricePoint, Series, SeriesPoint};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub symbol: String,
    pub period: ChartPeriod,
    /// Closing prices on the real time axis.
    pub price: Series<f64>,
    /// Candles and volume on the synthetic axis; only for intraday periods.
    pub stretched: Option<StretchedSeries>,
    pub sma: Series<f64>,
    pub macd: Series<MacdPoint>,
    /// One entry per price change, stamped with the later of the two points.
    pub rsi: Series<Option<f64>>,
}

pub struct ChartService {
    store: Arc<RwLock<HistoryStore>>,
    settings: IndicatorSettings,
    // None means the machine's local timezone.
    timezone: Option<FixedOffset>,
}

impl ChartService {
    pub fn new(store: Arc<RwLock<HistoryStore>>, settings: IndicatorSettings) -> Self {
        ChartService { store, settings, timezone: None }
    }

    /// Groups intraday sessions by calendar day at a fixed UTC offset instead of local time.
    pub fn with_timezone(mut self, timezone: FixedOffset) -> Self {
        self.timezone = Some(timezone);
        self
    }

    pub fn settings(&self) -> &IndicatorSettings {
        &self.settings
    }

    pub async fn load_history(&self, symbol: &str, period: ChartPeriod, points: Vec<PricePoint>) -> usize {
        let received = points.len();
        let mut store = self.store.write().await;
        let stored = store.add_points(symbol, period, points);
        drop(store);
        tracing::info!(symbol, %period, received, stored, "Loaded price history");
        stored
    }

    pub async fn build_chart(&self, symbol: &str, period: ChartPeriod) -> Result<ChartData, EngineError> {
        tracing::debug!(symbol, %period, "Building chart");

        let store = self.store.read().await;
        let points = store.get_points(symbol, period, None, None);
        drop(store);

        let Some(points) = points else {
            tracing::warn!(symbol, %period, "No price history available for chart");
            return Err(EngineError::MarketDataError(format!(
                "History not found for symbol '{}' and period {}",
                symbol, period
            )));
        };

        let chart = self.assemble(symbol, period, &points);
        tracing::info!(
            symbol,
            %period,
            points = points.len(),
            sma = chart.sma.len(),
            intraday = period.is_intraday(),
            "Chart assembled"
        );
        Ok(chart)
    }

    /// Pure part of `build_chart`: indicators always see the chronological series,
    /// the time-stretch only feeds the candle view.
    pub fn assemble(&self, symbol: &str, period: ChartPeriod, points: &[PricePoint]) -> ChartData {
        let closes: Vec<f64> = points.iter().map(|p| p.close).collect();

        let price = points
            .iter()
            .map(|p| SeriesPoint { timestamp: p.timestamp, value: p.close })
            .collect();

        let stretched = period.is_intraday().then(|| match self.timezone {
            Some(offset) => stretch_intraday(points, &offset),
            None => stretch_intraday(points, &chrono::Local),
        });

        let macd = macd_with(
            &closes,
            self.settings.macd_fast,
            self.settings.macd_slow,
            self.settings.macd_signal,
        )
        .into_iter()
        .zip(points)
        .map(|(value, p)| SeriesPoint { timestamp: p.timestamp, value })
        .collect();

        let rsi = rsi(&closes, self.settings.rsi_period)
            .into_iter()
            .zip(points.iter().skip(1))
            .map(|(value, p)| SeriesPoint { timestamp: p.timestamp, value })
            .collect();

        ChartData {
            symbol: symbol.to_string(),
            period,
            price,
            stretched,
            sma: sma_points(points, self.settings.sma_window),
            macd,
            rsi,
        }
    }
}
