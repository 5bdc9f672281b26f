//! Sales counter queries.
//!
//! Each recording operation keeps `total_sales` in lockstep with the
//! `self_gen`/`set_sales` increments applied in the same statement; totals
//! are never recomputed after the fact.

use rusqlite::Connection;

use crate::Result;

/// A user's sales counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesRow {
    pub user_id: String,
    pub total_sales: i64,
    pub self_gen: i64,
    pub set_sales: i64,
}

/// Record a self-generated sale: +1 total, +1 self-gen, +1 set credit.
///
/// The set credit for self-generated sales is deliberate. Returns the
/// user's new counters.
pub fn record_self_gen(conn: &Connection, guild_id: &str, user_id: &str) -> Result<SalesRow> {
    let row = conn.query_row(
        "INSERT INTO sales (guild_id, user_id, total_sales, self_gen, set_sales)
         VALUES (?1, ?2, 1, 1, 1)
         ON CONFLICT(guild_id, user_id) DO UPDATE SET
             total_sales = total_sales + 1,
             self_gen = self_gen + 1,
             set_sales = set_sales + 1
         RETURNING user_id, total_sales, self_gen, set_sales",
        rusqlite::params![guild_id, user_id],
        |row| {
            Ok(SalesRow {
                user_id: row.get(0)?,
                total_sales: row.get(1)?,
                self_gen: row.get(2)?,
                set_sales: row.get(3)?,
            })
        },
    )?;
    Ok(row)
}

/// Record an assisted sale: +1 total for closer and setter, +1 set credit
/// for the setter only.
///
/// Both row updates run inside one transaction so a failure between them
/// cannot leave a half-applied sale.
pub fn record_assisted(
    conn: &Connection,
    guild_id: &str,
    closer_id: &str,
    setter_id: &str,
) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO sales (guild_id, user_id, total_sales, self_gen, set_sales)
         VALUES (?1, ?2, 1, 0, 0)
         ON CONFLICT(guild_id, user_id) DO UPDATE SET
             total_sales = total_sales + 1",
        rusqlite::params![guild_id, closer_id],
    )?;
    tx.execute(
        "INSERT INTO sales (guild_id, user_id, total_sales, self_gen, set_sales)
         VALUES (?1, ?2, 1, 0, 1)
         ON CONFLICT(guild_id, user_id) DO UPDATE SET
             total_sales = total_sales + 1,
             set_sales = set_sales + 1",
        rusqlite::params![guild_id, setter_id],
    )?;
    tx.commit()?;
    Ok(())
}

/// Get a user's counters, all zero if the row does not exist.
pub fn get(conn: &Connection, guild_id: &str, user_id: &str) -> Result<SalesRow> {
    let row = conn
        .query_row(
            "SELECT user_id, total_sales, self_gen, set_sales
             FROM sales WHERE guild_id = ?1 AND user_id = ?2",
            rusqlite::params![guild_id, user_id],
            |row| {
                Ok(SalesRow {
                    user_id: row.get(0)?,
                    total_sales: row.get(1)?,
                    self_gen: row.get(2)?,
                    set_sales: row.get(3)?,
                })
            },
        )
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(other),
        })?;

    Ok(row.unwrap_or_else(|| SalesRow {
        user_id: user_id.to_string(),
        total_sales: 0,
        self_gen: 0,
        set_sales: 0,
    }))
}

/// Set a user's counters to absolute values (upsert).
pub fn set(
    conn: &Connection,
    guild_id: &str,
    user_id: &str,
    total_sales: i64,
    self_gen: i64,
    set_sales: i64,
) -> Result<()> {
    conn.execute(
        "INSERT INTO sales (guild_id, user_id, total_sales, self_gen, set_sales)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(guild_id, user_id) DO UPDATE SET
             total_sales = excluded.total_sales,
             self_gen = excluded.self_gen,
             set_sales = excluded.set_sales",
        rusqlite::params![guild_id, user_id, total_sales, self_gen, set_sales],
    )?;
    Ok(())
}

/// All sales rows for a guild, ranked for the leaderboard.
pub fn top_by_sales(conn: &Connection, guild_id: &str) -> Result<Vec<SalesRow>> {
    let mut stmt = conn.prepare(
        "SELECT user_id, total_sales, self_gen, set_sales
         FROM sales WHERE guild_id = ?1
         ORDER BY total_sales DESC, self_gen DESC, set_sales DESC",
    )?;

    let rows = stmt
        .query_map([guild_id], |row| {
            Ok(SalesRow {
                user_id: row.get(0)?,
                total_sales: row.get(1)?,
                self_gen: row.get(2)?,
                set_sales: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Delete all sales rows for a guild. Returns the number of rows removed.
pub fn clear(conn: &Connection, guild_id: &str) -> Result<usize> {
    let removed = conn.execute("DELETE FROM sales WHERE guild_id = ?1", [guild_id])?;
    Ok(removed)
}
