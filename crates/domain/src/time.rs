//! Time and timestamp helpers.
//!
//! Timestamps are persisted and serialized as unix seconds.

use chrono::{DateTime, Utc};

/// UTC timestamp used for creation, update and expiry times.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Build a timestamp from unix seconds, falling back to the epoch when out of range.
#[must_use]
pub fn from_unix(secs: i64) -> Timestamp {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_return_current_utc_time() {
        let before = Utc::now();
        let ts = now();
        let after = Utc::now();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[test]
    fn should_roundtrip_unix_seconds() {
        let ts = from_unix(1_700_000_000);
        assert_eq!(ts.timestamp(), 1_700_000_000);
    }

    #[test]
    fn should_fall_back_to_epoch_when_out_of_range() {
        assert_eq!(from_unix(i64::MAX).timestamp(), 0);
    }
}
