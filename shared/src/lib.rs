// Data models shared between the chart engine and its consumers.
pub mod models;

pub use models::{
    ChartPeriod, Indicator, MacdPoint, OhlcPoint, ParsePeriodError, PricePoint, Series,
    SeriesPoint, VolumePoint,
};
