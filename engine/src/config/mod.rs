pub mod settings;

pub use settings::{utc_offset_from_minutes, IndicatorSettings};
