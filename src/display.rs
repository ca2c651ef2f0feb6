//! Text formatting for launch listings
//!
//! Helpers used by the command-line presenter to turn raw launch fields into
//! the strings shown next to each mission.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Shown in place of a date that cannot be parsed
pub const DATE_ERROR: &str = "Date error";

/// Upstream launch date layout, e.g. "2020-01-07T02:19:21.000Z"
const LAUNCH_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Display layout, e.g. "01-07-2020 02:19"
const DISPLAY_DATE_FORMAT: &str = "%m-%d-%Y %H:%M";

/// Reformats a raw UTC launch date for display
///
/// Returns [`DATE_ERROR`] when the input does not match the upstream layout.
pub fn format_launch_date(date_utc: &str) -> String {
    NaiveDateTime::parse_from_str(date_utc, LAUNCH_DATE_FORMAT)
        .map(|date| date.format(DISPLAY_DATE_FORMAT).to_string())
        .unwrap_or_else(|_| DATE_ERROR.to_string())
}

/// How far a launch lies from a reference time, in whole days
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeDistance {
    /// "Days Since:" for past launches, "Days From:" for upcoming ones
    pub label: &'static str,
    pub days: i64,
}

/// Distance in days between a launch and `now`
pub fn time_distance(launch_unix: i64, now: DateTime<Utc>) -> TimeDistance {
    let delta = now.timestamp().saturating_sub(launch_unix);
    if delta > 0 {
        TimeDistance {
            label: "Days Since:",
            days: delta / 86_400,
        }
    } else {
        TimeDistance {
            label: "Days From:",
            days: delta.saturating_neg() / 86_400,
        }
    }
}

/// Formats a valuation with thousands separators, e.g. "74,000,000,000"
pub fn format_valuation(valuation: u64) -> String {
    let digits = valuation.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Human label for a launch outcome
pub fn outcome_label(success: Option<bool>) -> &'static str {
    match success {
        Some(true) => "success",
        Some(false) => "failure",
        None => "unknown",
    }
}
