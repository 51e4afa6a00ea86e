// Display transforms applied to price history before it reaches the chart surface.
pub mod intraday;

pub use intraday::{
    bucket_by_day, stretch_intraday, stretch_intraday_local, IntradayBucket, StretchedSeries,
};
