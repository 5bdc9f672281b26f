//! Gym check-in ledger.
//!
//! One counter per user, mutated by signed deltas and clamped at zero:
//! removing more check-ins than exist leaves the count at zero rather
//! than failing.

use rusqlite::Connection;
use tally_db::queries::gym;

pub use tally_db::queries::gym::GymRow;

use crate::Result;

/// Default delta for a bare check-in command.
pub const DEFAULT_CHECKIN_DELTA: i64 = 1;

/// Apply a signed delta to a user's check-in count. Returns the new count.
pub fn adjust(conn: &Connection, guild_id: &str, user_id: &str, delta: i64) -> Result<i64> {
    let new_count = gym::adjust(conn, guild_id, user_id, delta)?;
    tracing::debug!(guild_id, user_id, delta, new_count, "gym count adjusted");
    Ok(new_count)
}

/// A user's current check-in count.
pub fn checkins(conn: &Connection, guild_id: &str, user_id: &str) -> Result<i64> {
    Ok(gym::get(conn, guild_id, user_id)?)
}

/// Ranked leaderboard: check-ins descending.
pub fn leaderboard(conn: &Connection, guild_id: &str) -> Result<Vec<GymRow>> {
    Ok(gym::top_by_checkins(conn, guild_id)?)
}

/// Remove every gym row for the guild. Returns rows removed.
pub fn clear(conn: &Connection, guild_id: &str) -> Result<usize> {
    let removed = gym::clear(conn, guild_id)?;
    tracing::info!(guild_id, removed, "gym board cleared");
    Ok(removed)
}
