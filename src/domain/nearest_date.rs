//! Snap arbitrary dates onto the dates present in a sorted index.
//!
//! All lookups are binary searches over a strictly increasing slice. An
//! exact match is always returned as-is. When a directional lookup has no
//! candidate on the requested side it falls back to the overall nearest
//! date rather than failing.

use chrono::NaiveDate;

/// Closest date either way; ties go to the earlier date.
pub fn nearest(dates: &[NaiveDate], target: NaiveDate) -> Option<NaiveDate> {
    let idx = dates.partition_point(|d| *d < target);
    let after = dates.get(idx).copied();
    let before = idx.checked_sub(1).and_then(|i| dates.get(i)).copied();

    match (before, after) {
        (Some(b), Some(a)) => {
            if (a - target) < (target - b) {
                Some(a)
            } else {
                Some(b)
            }
        }
        (Some(b), None) => Some(b),
        (None, a) => a,
    }
}

/// Latest date on or before `target`.
pub fn nearest_past(dates: &[NaiveDate], target: NaiveDate) -> Option<NaiveDate> {
    let idx = dates.partition_point(|d| *d <= target);
    match idx.checked_sub(1) {
        Some(i) => Some(dates[i]),
        None => nearest(dates, target),
    }
}

/// Earliest date on or after `target`.
pub fn nearest_future(dates: &[NaiveDate], target: NaiveDate) -> Option<NaiveDate> {
    let idx = dates.partition_point(|d| *d < target);
    match dates.get(idx) {
        Some(d) => Some(*d),
        None => nearest(dates, target),
    }
}
