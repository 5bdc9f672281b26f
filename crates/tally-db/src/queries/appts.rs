//! Daily appointment counter queries.
//!
//! Rows are additionally keyed by `day`, an ISO `YYYY-MM-DD` string. The
//! key changing as real days pass is the only "daily reset" mechanism.

use rusqlite::Connection;

use crate::Result;

/// A user's appointment count for one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApptRow {
    pub user_id: String,
    pub appt_count: i64,
}

/// Apply a signed delta to a user's count for one day, clamped at zero.
///
/// Creates the row at zero if absent. Returns the new count.
pub fn adjust(
    conn: &Connection,
    guild_id: &str,
    day: &str,
    user_id: &str,
    delta: i64,
) -> Result<i64> {
    let new_count = conn.query_row(
        "INSERT INTO daily_appts (guild_id, day, user_id, appt_count)
         VALUES (?1, ?2, ?3, MAX(0, ?4))
         ON CONFLICT(guild_id, day, user_id) DO UPDATE SET
             appt_count = MAX(0, appt_count + ?4)
         RETURNING appt_count",
        rusqlite::params![guild_id, day, user_id, delta],
        |row| row.get(0),
    )?;
    Ok(new_count)
}

/// Get a user's count for one day, 0 if absent.
pub fn get(conn: &Connection, guild_id: &str, day: &str, user_id: &str) -> Result<i64> {
    let count = conn
        .query_row(
            "SELECT appt_count FROM daily_appts
             WHERE guild_id = ?1 AND day = ?2 AND user_id = ?3",
            rusqlite::params![guild_id, day, user_id],
            |row| row.get(0),
        )
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(0),
            other => Err(other),
        })?;
    Ok(count)
}

/// Set a user's count for one day to an absolute value (upsert).
pub fn set(
    conn: &Connection,
    guild_id: &str,
    day: &str,
    user_id: &str,
    appt_count: i64,
) -> Result<()> {
    conn.execute(
        "INSERT INTO daily_appts (guild_id, day, user_id, appt_count)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(guild_id, day, user_id) DO UPDATE SET
             appt_count = excluded.appt_count",
        rusqlite::params![guild_id, day, user_id, appt_count],
    )?;
    Ok(())
}

/// All rows for one guild and day, highest count first.
pub fn top_by_count(conn: &Connection, guild_id: &str, day: &str) -> Result<Vec<ApptRow>> {
    let mut stmt = conn.prepare(
        "SELECT user_id, appt_count FROM daily_appts
         WHERE guild_id = ?1 AND day = ?2
         ORDER BY appt_count DESC",
    )?;

    let rows = stmt
        .query_map(rusqlite::params![guild_id, day], |row| {
            Ok(ApptRow {
                user_id: row.get(0)?,
                appt_count: row.get(1)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Delete rows for exactly one guild and day. Returns rows removed.
pub fn clear_day(conn: &Connection, guild_id: &str, day: &str) -> Result<usize> {
    let removed = conn.execute(
        "DELETE FROM daily_appts WHERE guild_id = ?1 AND day = ?2",
        rusqlite::params![guild_id, day],
    )?;
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Connection {
        crate::open_memory().expect("open test db")
    }

    #[test]
    fn test_adjust_clamps_at_zero() {
        let conn = test_db();
        assert_eq!(adjust(&conn, "g1", "2024-01-01", "alice", -5).expect("neg"), 0);
        assert_eq!(adjust(&conn, "g1", "2024-01-01", "alice", 3).expect("add"), 3);
        assert_eq!(adjust(&conn, "g1", "2024-01-01", "alice", -10).expect("over"), 0);
    }

    #[test]
    fn test_days_are_isolated() {
        let conn = test_db();
        adjust(&conn, "g1", "2024-01-01", "alice", 4).expect("day one");
        adjust(&conn, "g1", "2024-01-02", "alice", 1).expect("day two");

        assert_eq!(get(&conn, "g1", "2024-01-01", "alice").expect("d1"), 4);
        assert_eq!(get(&conn, "g1", "2024-01-02", "alice").expect("d2"), 1);
    }

    #[test]
    fn test_clear_day_leaves_other_days() {
        let conn = test_db();
        adjust(&conn, "g1", "2024-01-01", "alice", 2).expect("d1");
        adjust(&conn, "g1", "2024-01-02", "alice", 3).expect("d2");

        let removed = clear_day(&conn, "g1", "2024-01-01").expect("clear");
        assert_eq!(removed, 1);
        assert_eq!(get(&conn, "g1", "2024-01-01", "alice").expect("d1"), 0);
        assert_eq!(get(&conn, "g1", "2024-01-02", "alice").expect("d2"), 3);
    }

    #[test]
    fn test_leaderboard_single_day() {
        let conn = test_db();
        set(&conn, "g1", "2024-01-01", "a", 2).expect("a");
        set(&conn, "g1", "2024-01-01", "b", 6).expect("b");
        set(&conn, "g1", "2024-01-02", "c", 9).expect("other day");

        let board = top_by_count(&conn, "g1", "2024-01-01").expect("board");
        let order: Vec<&str> = board.iter().map(|r| r.user_id.as_str()).collect();
        assert_eq!(order, vec!["b", "a"]);
    }
}
