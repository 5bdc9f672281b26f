//! Daily appointment ledger.
//!
//! Counts are keyed by guild, calendar day, and user. Every write is
//! immediately mirrored into the active blitz campaign's ledger (if one
//! is running) via [`crate::blitz::mirror`]; the two counts evolve
//! independently after that, since a campaign may start mid-day or after
//! earlier edits.

use rusqlite::Connection;
use tally_db::queries::appts;

pub use tally_db::queries::appts::ApptRow;

use crate::{blitz, Result};

/// Default delta for a bare appointment command.
pub const DEFAULT_APPT_DELTA: i64 = 1;

/// Outcome of an appointment adjustment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApptAdjust {
    /// The day the adjustment applied to.
    pub day: String,
    /// New daily count for the user.
    pub day_count: i64,
    /// Campaign name and new campaign count, when a blitz was active.
    pub blitz: Option<(String, i64)>,
}

/// Apply a signed delta to a user's count for `day`, clamped at zero,
/// and mirror the same delta into the active campaign if one exists.
pub fn adjust(
    conn: &Connection,
    guild_id: &str,
    user_id: &str,
    day: &str,
    delta: i64,
) -> Result<ApptAdjust> {
    let day_count = appts::adjust(conn, guild_id, day, user_id, delta)?;
    let mirrored = blitz::mirror(conn, guild_id, user_id, day, delta)?;
    tracing::debug!(guild_id, user_id, day, delta, day_count, "appointment count adjusted");

    Ok(ApptAdjust {
        day: day.to_string(),
        day_count,
        blitz: mirrored,
    })
}

/// A user's count for one day.
pub fn count(conn: &Connection, guild_id: &str, day: &str, user_id: &str) -> Result<i64> {
    Ok(appts::get(conn, guild_id, day, user_id)?)
}

/// Ranked leaderboard for one day: count descending.
pub fn leaderboard(conn: &Connection, guild_id: &str, day: &str) -> Result<Vec<ApptRow>> {
    Ok(appts::top_by_count(conn, guild_id, day)?)
}

/// Remove the guild's rows for exactly one day. Returns rows removed.
pub fn clear_day(conn: &Connection, guild_id: &str, day: &str) -> Result<usize> {
    let removed = appts::clear_day(conn, guild_id, day)?;
    tracing::info!(guild_id, day, removed, "appointment board cleared");
    Ok(removed)
}
