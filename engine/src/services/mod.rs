// Services built on top of the indicator engine.
pub mod chart_service;

pub use chart_service::{ChartData, ChartService};
