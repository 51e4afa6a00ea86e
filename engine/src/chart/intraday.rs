//! Time-stretch transform for sub-daily charts.
//!
//! Intraday bars only cover the trading session, so plotting them on a real
//! time axis leaves overnight and weekend holes. Each trading day is instead
//! mapped onto its own synthetic 24 hour slot, with the session spread
//! linearly across the slot. The output is for display only; indicators
//! always run on the unstretched series.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use shared::models::{OhlcPoint, PricePoint, VolumePoint};
use std::collections::BTreeMap;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Points of one calendar day, by index into the input slice.
#[derive(Debug, Clone, PartialEq)]
pub struct IntradayBucket {
    pub date: NaiveDate,
    pub day_offset: usize,
    pub indices: Vec<usize>,
    pub first: DateTime<Utc>,
    pub last: DateTime<Utc>,
}

impl IntradayBucket {
    pub fn trading_duration(&self) -> Duration {
        self.last - self.first
    }
}

/// Index-aligned candle and volume sequences on the synthetic axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StretchedSeries {
    pub ohlc: Vec<OhlcPoint>,
    pub volume: Vec<VolumePoint>,
}

impl StretchedSeries {
    pub fn len(&self) -> usize {
        self.ohlc.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ohlc.is_empty()
    }
}

/// Groups points by their calendar date in `tz`, days in ascending order.
pub fn bucket_by_day<Tz: TimeZone>(points: &[PricePoint], tz: &Tz) -> Vec<IntradayBucket> {
    let mut days: BTreeMap<NaiveDate, Vec<usize>> = BTreeMap::new();
    for (idx, point) in points.iter().enumerate() {
        let date = point.timestamp.with_timezone(tz).date_naive();
        days.entry(date).or_default().push(idx);
    }

    days.into_iter()
        .enumerate()
        .filter_map(|(day_offset, (date, indices))| {
            let first = points[*indices.first()?].timestamp;
            let last = points[*indices.last()?].timestamp;
            Some(IntradayBucket { date, day_offset, indices, first, last })
        })
        .collect()
}

/// Stretches every trading day in `points` onto a uniform 24 hour slot.
///
/// Day `d` (in sorted date order) occupies `[start + d*24h, start + (d+1)*24h)`
/// where `start` is local midnight of the first day. A point's position in the
/// slot is its fraction of the way from the day's first to its last point; a
/// day with a single point (or zero span) sits at the start of its slot. The
/// last point of a day lands one millisecond before the next slot so two days
/// never share an x value.
pub fn stretch_intraday<Tz: TimeZone>(points: &[PricePoint], tz: &Tz) -> StretchedSeries {
    let buckets = bucket_by_day(points, tz);
    let Some(first_bucket) = buckets.first() else {
        return StretchedSeries::default();
    };
    let synthetic_start = local_midnight(first_bucket.date, tz);

    let mut xs = vec![synthetic_start; points.len()];
    for bucket in &buckets {
        let duration_ms = bucket.trading_duration().num_milliseconds();
        let slot_start = bucket.day_offset as i64 * DAY_MS;

        for &idx in &bucket.indices {
            let percentage_of_day = if duration_ms == 0 {
                0.0
            } else {
                (points[idx].timestamp - bucket.first).num_milliseconds() as f64 / duration_ms as f64
            };
            let in_day = ((percentage_of_day * DAY_MS as f64).round() as i64).min(DAY_MS - 1);
            xs[idx] = synthetic_start + Duration::milliseconds(slot_start + in_day);
        }
    }

    let ohlc = points
        .iter()
        .zip(&xs)
        .map(|(p, &x)| OhlcPoint { x, o: p.open, h: p.high, l: p.low, c: p.close })
        .collect();
    let volume = points
        .iter()
        .zip(&xs)
        .map(|(p, &x)| VolumePoint { x, y: p.volume })
        .collect();

    StretchedSeries { ohlc, volume }
}

/// `stretch_intraday` in the machine's local timezone.
pub fn stretch_intraday_local(points: &[PricePoint]) -> StretchedSeries {
    stretch_intraday(points, &chrono::Local)
}

// Midnight can be skipped by a DST transition; take the first valid instant after it.
fn local_midnight<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = date.and_time(chrono::NaiveTime::MIN);
    (0..=2)
        .find_map(|hours| {
            tz.from_local_datetime(&(midnight + Duration::hours(hours)))
                .earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}
