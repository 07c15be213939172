//! Time utilities and constants for pipbot.

use chrono::{DateTime, Duration, FixedOffset, Utc};

/// Cache timing constants.
pub mod constants {
    use super::Duration;

    /// How long a fetched forex rate table stays fresh (24 hours).
    ///
    /// The ECB publishes reference rates once per working day, so refreshing
    /// more often only returns the same table.
    pub fn rate_refresh_window() -> Duration {
        Duration::hours(24)
    }

    /// How long Bitfinex swap totals are reused (150 seconds).
    pub fn swaps_refresh_window() -> Duration {
        Duration::seconds(150)
    }
}

/// A timestamp with timezone (always UTC internally).
pub type Timestamp = DateTime<Utc>;

/// Get the current timestamp.
pub fn now() -> Timestamp {
    Utc::now()
}

/// Check whether something refreshed at `refreshed_at` is still inside `window`.
///
/// A missing timestamp is never fresh.
pub fn is_fresh_within(refreshed_at: Option<Timestamp>, window: Duration) -> bool {
    match refreshed_at {
        Some(at) => now().signed_duration_since(at) < window,
        None => false,
    }
}

/// Format a localized time the way it is shown in chat, e.g. `3:07 PM on Tuesday, March 4`.
pub fn format_local_time(time: &DateTime<FixedOffset>) -> String {
    time.format("%-I:%M %p on %A, %B %-d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_is_fresh_within() {
        let recent = now() - Duration::seconds(10);
        assert!(is_fresh_within(Some(recent), Duration::minutes(1)));

        let old = now() - Duration::hours(25);
        assert!(!is_fresh_within(Some(old), constants::rate_refresh_window()));

        assert!(!is_fresh_within(None, constants::rate_refresh_window()));
    }

    #[test]
    fn test_format_local_time() {
        let offset = FixedOffset::east_opt(8 * 3600).unwrap();
        let time = offset.with_ymd_and_hms(2025, 3, 4, 15, 7, 0).unwrap();
        assert_eq!(format_local_time(&time), "3:07 PM on Tuesday, March 4");
    }
}
