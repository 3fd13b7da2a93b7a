//! Date-range filter over an ordered daily series.

use crate::{record::DailyRecord, types::Day};

/// Every record with `start <= date <= end`, in input order.
///
/// `records` must be sorted ascending by date (a Dataset always is).
/// An inverted range yields an empty slice; bounds outside the series
/// simply clip to it.
pub fn filter_range(records: &[DailyRecord], start: Day, end: Day) -> &[DailyRecord] {
    if start > end {
        log::debug!("Inverted range {start} > {end}: empty selection");
        return &[];
    }
    let lo = records.partition_point(|r| r.date < start);
    let hi = records.partition_point(|r| r.date <= end);
    // lo <= hi holds because start <= end on a sorted series.
    &records[lo..hi.max(lo)]
}
