//! Sales ledger.
//!
//! Three counters per user: `total_sales`, `self_gen`, `set_sales`.
//! A self-generated sale credits all three; an assisted sale credits
//! `total_sales` for closer and setter, and `set_sales` for the setter
//! only. The self-gen set credit is an intentional convention.

use rusqlite::Connection;
use tally_db::queries::sales;

pub use tally_db::queries::sales::SalesRow;

use crate::{LedgerError, Result};

/// Record a self-generated sale and return the user's new counters.
pub fn record_self_gen(conn: &Connection, guild_id: &str, user_id: &str) -> Result<SalesRow> {
    let row = sales::record_self_gen(conn, guild_id, user_id)?;
    tracing::info!(guild_id, user_id, total = row.total_sales, "self-gen sale recorded");
    Ok(row)
}

/// Record an assisted sale.
///
/// # Errors
///
/// [`LedgerError::Validation`] if closer and setter are the same user;
/// nothing is written in that case.
pub fn record_assisted(
    conn: &Connection,
    guild_id: &str,
    closer_id: &str,
    setter_id: &str,
) -> Result<()> {
    if closer_id == setter_id {
        return Err(LedgerError::Validation(
            "closer and setter must be different users".to_string(),
        ));
    }
    sales::record_assisted(conn, guild_id, closer_id, setter_id)?;
    tracing::info!(guild_id, closer_id, setter_id, "assisted sale recorded");
    Ok(())
}

/// A user's current counters, all zero if never recorded.
pub fn totals(conn: &Connection, guild_id: &str, user_id: &str) -> Result<SalesRow> {
    Ok(sales::get(conn, guild_id, user_id)?)
}

/// Ranked leaderboard: total sales descending, ties broken by self-gen,
/// then set credits.
pub fn leaderboard(conn: &Connection, guild_id: &str) -> Result<Vec<SalesRow>> {
    Ok(sales::top_by_sales(conn, guild_id)?)
}

/// Remove every sales row for the guild. Returns rows removed.
pub fn clear(conn: &Connection, guild_id: &str) -> Result<usize> {
    let removed = sales::clear(conn, guild_id)?;
    tracing::info!(guild_id, removed, "sales board cleared");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Connection {
        tally_db::open_memory().expect("open test db")
    }

    #[test]
    fn test_self_target_rejected_without_writes() {
        let conn = test_db();
        let result = record_assisted(&conn, "g1", "alice", "alice");
        assert!(matches!(result, Err(LedgerError::Validation(_))));

        let row = totals(&conn, "g1", "alice").expect("totals");
        assert_eq!(row.total_sales, 0);
    }

    #[test]
    fn test_assisted_split() {
        let conn = test_db();
        record_assisted(&conn, "g1", "closer", "setter").expect("record");

        let closer = totals(&conn, "g1", "closer").expect("closer");
        let setter = totals(&conn, "g1", "setter").expect("setter");
        assert_eq!((closer.total_sales, closer.set_sales), (1, 0));
        assert_eq!((setter.total_sales, setter.set_sales), (1, 1));
    }

    #[test]
    fn test_leaderboard_tie_break() {
        let conn = test_db();
        // Tied totals fall back to self-gen, then set credits.
        tally_db::queries::sales::set(&conn, "g1", "u1", 10, 3, 7).expect("u1");
        tally_db::queries::sales::set(&conn, "g1", "u2", 10, 5, 5).expect("u2");
        tally_db::queries::sales::set(&conn, "g1", "u3", 5, 0, 5).expect("u3");

        let board = leaderboard(&conn, "g1").expect("board");
        let order: Vec<&str> = board.iter().map(|r| r.user_id.as_str()).collect();
        assert_eq!(order, vec!["u2", "u1", "u3"]);
    }
}
