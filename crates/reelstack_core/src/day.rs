//! UTC day-key derivation for streak bucketing.

use chrono::{DateTime, Utc};

/// Derive the UTC calendar-day key (`YYYY-MM-DD`) for a timestamp.
///
/// Daily streaks and leaderboard day-bucketing compare these keys, so all
/// day arithmetic is done in UTC regardless of the viewer's timezone.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
///
/// let ts = Utc.with_ymd_and_hms(2026, 3, 9, 23, 59, 59).unwrap();
/// assert_eq!(reelstack_core::day_key(ts), "2026-03-09");
/// ```
pub fn day_key(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn day_rolls_over_at_utc_midnight() {
        let before = Utc.with_ymd_and_hms(2026, 1, 31, 23, 59, 59).unwrap();
        let after = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        assert_eq!(day_key(before), "2026-01-31");
        assert_eq!(day_key(after), "2026-02-01");
    }
}
