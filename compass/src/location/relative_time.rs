//! "5 minutes ago" style formatting for fix times.

use chrono::{DateTime, Utc};

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

/// Describe `then` relative to `now` in coarse human units.
///
/// Less than a minute either way reads "just now"; otherwise the largest of
/// minutes, hours or days is used, e.g. "3 hours ago" or "in 2 minutes".
pub fn relative_time_span(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(then);
    let future = delta.num_seconds() < 0;
    let delta = if future { -delta } else { delta };

    if delta.num_minutes() < 1 {
        return "just now".to_string();
    }

    let span = if delta.num_hours() < 1 {
        plural(delta.num_minutes(), "minute")
    } else if delta.num_days() < 1 {
        plural(delta.num_hours(), "hour")
    } else {
        plural(delta.num_days(), "day")
    };

    if future {
        format!("in {}", span)
    } else {
        format!("{} ago", span)
    }
}
