//! Integration test: Gym and daily appointment ledger semantics.
//!
//! Covers the clamp-at-zero rule, per-day isolation, the date-key
//! format, and per-guild clear isolation.

use tally_ledger::{appts, clock, gym};

#[test]
fn gym_counts_never_go_negative() {
    let conn = tally_db::open_memory().expect("open db");

    assert_eq!(gym::adjust(&conn, "g", "alice", -5).expect("from zero"), 0);

    gym::adjust(&conn, "g", "alice", 3).expect("add");
    assert_eq!(gym::adjust(&conn, "g", "alice", -10).expect("over-remove"), 0);

    // Clamping loses the overshoot; further adds start from zero.
    assert_eq!(gym::adjust(&conn, "g", "alice", 2).expect("add again"), 2);
}

#[test]
fn gym_leaderboard_and_clear() {
    let conn = tally_db::open_memory().expect("open db");

    for _ in 0..4 {
        gym::adjust(&conn, "g", "alice", 1).expect("alice");
    }
    gym::adjust(&conn, "g", "bob", 1).expect("bob");
    gym::adjust(&conn, "other", "carol", 9).expect("carol");

    let board = gym::leaderboard(&conn, "g").expect("board");
    assert_eq!(board.len(), 2);
    assert_eq!(board[0].user_id, "alice");

    gym::clear(&conn, "g").expect("clear");
    assert!(gym::leaderboard(&conn, "g").expect("board").is_empty());
    assert_eq!(gym::checkins(&conn, "other", "carol").expect("carol"), 9);
}

#[test]
fn appointment_days_never_interfere() {
    let conn = tally_db::open_memory().expect("open db");

    appts::adjust(&conn, "g", "alice", "2024-01-01", 3).expect("d1");
    appts::adjust(&conn, "g", "alice", "2024-01-02", 1).expect("d2");

    // Removing from one day cannot drain another.
    appts::adjust(&conn, "g", "alice", "2024-01-02", -5).expect("drain d2");
    assert_eq!(appts::count(&conn, "g", "2024-01-01", "alice").expect("d1"), 3);
    assert_eq!(appts::count(&conn, "g", "2024-01-02", "alice").expect("d2"), 0);

    // Clearing one day leaves the other untouched.
    appts::clear_day(&conn, "g", "2024-01-01").expect("clear d1");
    assert_eq!(appts::count(&conn, "g", "2024-01-01", "alice").expect("d1"), 0);
}

#[test]
fn date_keys_are_iso_dates_in_the_report_zone() {
    let key = clock::date_key(chrono_tz::America::Chicago);
    assert!(clock::is_date_key(&key));

    // Late-evening Chicago instants land on the next UTC day; the ledger
    // key stays on the Chicago day.
    let instant = chrono::DateTime::parse_from_rfc3339("2024-06-15T03:30:00Z")
        .expect("valid instant")
        .with_timezone(&chrono::Utc);
    assert_eq!(
        clock::date_key_at(instant, chrono_tz::America::Chicago),
        "2024-06-14"
    );
}
