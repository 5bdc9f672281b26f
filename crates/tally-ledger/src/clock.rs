//! Calendar-day keys in the report time zone.
//!
//! "Daily" counters roll over when the rendered date changes in the
//! configured zone, not at UTC midnight. The key must be recomputed on
//! every call; caching it would freeze the ledger on the day the daemon
//! started.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Default report time zone when the config does not name one.
pub const DEFAULT_TIME_ZONE: Tz = chrono_tz::America::Chicago;

/// The current calendar day in `tz`, formatted `YYYY-MM-DD`.
pub fn date_key(tz: Tz) -> String {
    date_key_at(Utc::now(), tz)
}

/// The calendar day of a specific instant in `tz`.
pub fn date_key_at(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%Y-%m-%d").to_string()
}

/// Whether `s` is a well-formed `YYYY-MM-DD` date key.
pub fn is_date_key(s: &str) -> bool {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}
