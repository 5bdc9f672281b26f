//! Gym check-in counter queries.

use rusqlite::Connection;

use crate::Result;

/// A user's gym check-in count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GymRow {
    pub user_id: String,
    pub checkins: i64,
}

/// Apply a signed delta to a user's check-in count, clamped at zero.
///
/// Creates the row at zero if absent. Returns the new count.
pub fn adjust(conn: &Connection, guild_id: &str, user_id: &str, delta: i64) -> Result<i64> {
    let new_count = conn.query_row(
        "INSERT INTO gym (guild_id, user_id, checkins)
         VALUES (?1, ?2, MAX(0, ?3))
         ON CONFLICT(guild_id, user_id) DO UPDATE SET
             checkins = MAX(0, checkins + ?3)
         RETURNING checkins",
        rusqlite::params![guild_id, user_id, delta],
        |row| row.get(0),
    )?;
    Ok(new_count)
}

/// Get a user's check-in count, 0 if absent.
pub fn get(conn: &Connection, guild_id: &str, user_id: &str) -> Result<i64> {
    let count = conn
        .query_row(
            "SELECT checkins FROM gym WHERE guild_id = ?1 AND user_id = ?2",
            rusqlite::params![guild_id, user_id],
            |row| row.get(0),
        )
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(0),
            other => Err(other),
        })?;
    Ok(count)
}

/// Set a user's check-in count to an absolute value (upsert).
pub fn set(conn: &Connection, guild_id: &str, user_id: &str, checkins: i64) -> Result<()> {
    conn.execute(
        "INSERT INTO gym (guild_id, user_id, checkins)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(guild_id, user_id) DO UPDATE SET
             checkins = excluded.checkins",
        rusqlite::params![guild_id, user_id, checkins],
    )?;
    Ok(())
}

/// All gym rows for a guild, most check-ins first.
pub fn top_by_checkins(conn: &Connection, guild_id: &str) -> Result<Vec<GymRow>> {
    let mut stmt = conn.prepare(
        "SELECT user_id, checkins FROM gym
         WHERE guild_id = ?1 ORDER BY checkins DESC",
    )?;

    let rows = stmt
        .query_map([guild_id], |row| {
            Ok(GymRow {
                user_id: row.get(0)?,
                checkins: row.get(1)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Delete all gym rows for a guild. Returns the number of rows removed.
pub fn clear(conn: &Connection, guild_id: &str) -> Result<usize> {
    let removed = conn.execute("DELETE FROM gym WHERE guild_id = ?1", [guild_id])?;
    Ok(removed)
}
