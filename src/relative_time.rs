//! Human-readable relative timestamps ("5 minutes ago").
//!
//! Kept out of the UI code so unit boundaries and pluralization live in one
//! place.

use chrono::{DateTime, Utc};

/// Format the time elapsed between `then` and `now`.
///
/// Falls back to a plain date once the gap exceeds a month; timestamps from
/// the future (clock skew) read as "just now".
pub fn format_relative(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = now.signed_duration_since(then).num_seconds();

    if seconds < 10 {
        return "just now".to_string();
    }

    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;
    let weeks = days / 7;

    if seconds < 60 {
        format!("{seconds} seconds ago")
    } else if minutes == 1 {
        "a minute ago".to_string()
    } else if minutes < 60 {
        format!("{minutes} minutes ago")
    } else if hours == 1 {
        "an hour ago".to_string()
    } else if hours < 24 {
        format!("{hours} hours ago")
    } else if days == 1 {
        "yesterday".to_string()
    } else if days < 7 {
        format!("{days} days ago")
    } else if weeks == 1 {
        "a week ago".to_string()
    } else if weeks < 5 {
        format!("{weeks} weeks ago")
    } else {
        then.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(seconds: i64) -> (DateTime<Utc>, DateTime<Utc>) {
        let then = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        (then, then + chrono::Duration::seconds(seconds))
    }

    #[test]
    fn just_now_under_ten_seconds() {
        let (then, now) = at(3);
        assert_eq!(format_relative(then, now), "just now");
    }

    #[test]
    fn future_timestamps_read_as_just_now() {
        let (then, now) = at(-42);
        assert_eq!(format_relative(then, now), "just now");
    }

    #[test]
    fn seconds_below_a_minute() {
        let (then, now) = at(45);
        assert_eq!(format_relative(then, now), "45 seconds ago");
    }

    #[test]
    fn singular_minute() {
        let (then, now) = at(75);
        assert_eq!(format_relative(then, now), "a minute ago");
    }

    #[test]
    fn plural_minutes() {
        let (then, now) = at(5 * 60);
        assert_eq!(format_relative(then, now), "5 minutes ago");
    }

    #[test]
    fn singular_hour() {
        let (then, now) = at(60 * 60 + 30);
        assert_eq!(format_relative(then, now), "an hour ago");
    }

    #[test]
    fn plural_hours() {
        let (then, now) = at(7 * 60 * 60);
        assert_eq!(format_relative(then, now), "7 hours ago");
    }

    #[test]
    fn yesterday() {
        let (then, now) = at(30 * 60 * 60);
        assert_eq!(format_relative(then, now), "yesterday");
    }

    #[test]
    fn days_below_a_week() {
        let (then, now) = at(4 * 24 * 60 * 60);
        assert_eq!(format_relative(then, now), "4 days ago");
    }

    #[test]
    fn singular_week() {
        let (then, now) = at(8 * 24 * 60 * 60);
        assert_eq!(format_relative(then, now), "a week ago");
    }

    #[test]
    fn old_markers_fall_back_to_a_date() {
        let (then, now) = at(60 * 24 * 60 * 60);
        assert_eq!(format_relative(then, now), then.format("%Y-%m-%d").to_string());
    }
}
