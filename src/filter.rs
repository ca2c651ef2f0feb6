//! Successful-launch projection
//!
//! Filtering keeps only launches with a confirmed successful outcome and
//! orders them by their raw UTC date string. The upstream dates are
//! fixed-width ISO-8601, so string order is chronological order.

use crate::data::{FilterDirection, Launch};

/// Returns the successful launches in `launches`, sorted by `launch_date_utc`
///
/// Launches whose outcome is `Some(false)` or `None` are dropped. The sort is
/// stable, so launches sharing a timestamp keep their relative order.
pub fn filter_launches(launches: &[Launch], direction: FilterDirection) -> Vec<Launch> {
    let mut successful: Vec<Launch> = launches
        .iter()
        .filter(|launch| launch.success == Some(true))
        .cloned()
        .collect();

    match direction {
        FilterDirection::Ascending => {
            successful.sort_by(|a, b| a.launch_date_utc.cmp(&b.launch_date_utc))
        }
        FilterDirection::Descending => {
            successful.sort_by(|a, b| b.launch_date_utc.cmp(&a.launch_date_utc))
        }
    }

    successful
}
