//! Human-relative timestamp formatting for report lines.

use chrono::{DateTime, Utc};

/// Formats the elapsed time since `then` as `"<n> <unit> ago"`.
///
/// Picks the single largest applicable unit: days, else hours, else
/// minutes, else seconds. The unit word is always plural, matching the
/// report format of the tools (`"1 hours ago"`, `"0 seconds ago"`).
pub fn relative_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);
    let (count, unit) = if secs >= 86_400 {
        (secs / 86_400, "days")
    } else if secs >= 3_600 {
        (secs / 3_600, "hours")
    } else if secs >= 60 {
        (secs / 60, "minutes")
    } else {
        (secs, "seconds")
    };
    format!("{count} {unit} ago")
}

/// [`relative_age`] against the current wall clock.
pub fn relative_age_from_now(then: DateTime<Utc>) -> String {
    relative_age(then, Utc::now())
}

// ============================================================================
// Tests
// ============================================================================
