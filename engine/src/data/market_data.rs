// In-memory price history, keyed by symbol and chart period.
use chrono::{DateTime, Utc};
use shared::models::{ChartPeriod, PricePoint};
use std::collections::HashMap;

pub struct HistoryStore {
    // A history is kept sorted by timestamp without duplicates, which is what the indicators assume.
    data: HashMap<String, HashMap<ChartPeriod, Vec<PricePoint>>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        HistoryStore {
            data: HashMap::new(),
        }
    }

    /// Merges `new_points` into the stored history and returns the resulting length.
    ///
    /// On a duplicate timestamp the most recently added point wins, so a
    /// refreshed bar replaces the stale one.
    pub fn add_points(&mut self, symbol: &str, period: ChartPeriod, new_points: Vec<PricePoint>) -> usize {
        let history = self
            .data
            .entry(symbol.to_string())
            .or_default()
            .entry(period)
            .or_default();

        // Newer points go first so the stable sort keeps them ahead of older duplicates.
        let mut merged = new_points;
        merged.reverse();
        merged.append(history);
        merged.sort_by_key(|p| p.timestamp);
        merged.dedup_by_key(|p| p.timestamp);
        *history = merged;

        tracing::debug!(symbol, %period, len = history.len(), "Merged price history");
        history.len()
    }

    /// Replaces the stored history outright.
    pub fn replace_points(&mut self, symbol: &str, period: ChartPeriod, points: Vec<PricePoint>) -> usize {
        self.remove(symbol, period);
        self.add_points(symbol, period, points)
    }

    pub fn get_points(
        &self,
        symbol: &str,
        period: ChartPeriod,
        from_timestamp: Option<DateTime<Utc>>,
        to_timestamp: Option<DateTime<Utc>>,
    ) -> Option<Vec<PricePoint>> {
        self.data
            .get(symbol)
            .and_then(|symbol_data| symbol_data.get(&period))
            .map(|points| {
                points
                    .iter()
                    .filter(|p| from_timestamp.map_or(true, |start| p.timestamp >= start))
                    .filter(|p| to_timestamp.map_or(true, |end| p.timestamp <= end))
                    .copied()
                    .collect()
            })
    }

    pub fn remove(&mut self, symbol: &str, period: ChartPeriod) -> Option<Vec<PricePoint>> {
        let symbol_data = self.data.get_mut(symbol)?;
        let removed = symbol_data.remove(&period);
        if symbol_data.is_empty() {
            self.data.remove(symbol);
        }
        removed
    }

    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        symbols
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn point(day: i64, close: f64) -> PricePoint {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        PricePoint::from_close(base + Duration::days(day), close)
    }

    #[test]
    fn test_add_points_sorts_and_dedups() {
        let mut store = HistoryStore::new();
        let len = store.add_points("AAPL", ChartPeriod::Year1, vec![point(2, 3.0), point(0, 1.0), point(1, 2.0)]);
        assert_eq!(len, 3);

        let len = store.add_points("AAPL", ChartPeriod::Year1, vec![point(3, 4.0), point(1, 2.5)]);
        assert_eq!(len, 4);

        let points = store.get_points("AAPL", ChartPeriod::Year1, None, None).unwrap();
        let closes: Vec<f64> = points.iter().map(|p| p.close).collect();
        assert_eq!(closes, vec![1.0, 2.5, 3.0, 4.0]);
        assert!(points.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn test_get_points_range_filter() {
        let mut store = HistoryStore::new();
        store.add_points("BTC", ChartPeriod::Month6, (0..10).map(|d| point(d, d as f64)).collect());
        let from = Some(point(3, 0.0).timestamp);
        let to = Some(point(5, 0.0).timestamp);
        let points = store.get_points("BTC", ChartPeriod::Month6, from, to).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].close, 3.0);
    }

    #[test]
    fn test_periods_are_separate() {
        let mut store = HistoryStore::new();
        store.add_points("BTC", ChartPeriod::Day1, vec![point(0, 1.0)]);
        assert!(store.get_points("BTC", ChartPeriod::Year1, None, None).is_none());
        assert!(store.get_points("ETH", ChartPeriod::Day1, None, None).is_none());
    }

    #[test]
    fn test_replace_and_remove() {
        let mut store = HistoryStore::default();
        store.add_points("MSFT", ChartPeriod::Day1, vec![point(0, 1.0), point(1, 2.0)]);
        assert_eq!(store.replace_points("MSFT", ChartPeriod::Day1, vec![point(5, 9.0)]), 1);
        assert_eq!(store.symbols(), vec!["MSFT".to_string()]);
        assert_eq!(store.remove("MSFT", ChartPeriod::Day1).unwrap().len(), 1);
        assert!(store.symbols().is_empty());
        assert!(store.remove("MSFT", ChartPeriod::Day1).is_none());
    }
}
