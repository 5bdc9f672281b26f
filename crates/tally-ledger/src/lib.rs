//! # tally-ledger
//!
//! Domain logic for the activity ledgers: sales, gym check-ins, daily
//! appointments, and blitz campaigns. Each module wraps the atomic
//! counter primitives in [`tally_db`] with the validation and state
//! machine rules the command layer relies on.
//!
//! All functions take a borrowed [`rusqlite::Connection`]; the caller
//! owns the connection and serializes access to it.

pub mod appts;
pub mod blitz;
pub mod clock;
pub mod gym;
pub mod sales;

/// Ledger error types.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Invalid input from the caller; no state was changed.
    #[error("invalid input: {0}")]
    Validation(String),

    /// A campaign with this name has already been used for the guild.
    #[error("campaign '{0}' already exists")]
    AlreadyExists(String),

    /// A different campaign is currently active.
    #[error("campaign '{0}' is currently active")]
    AlreadyActive(String),

    /// No campaign is currently active.
    #[error("no active campaign")]
    NoneActive,

    /// The named campaign does not exist for the guild.
    #[error("campaign '{0}' not found")]
    NotFound(String),

    /// The guild has no campaign to resolve.
    #[error("no campaign data")]
    NoData,

    #[error(transparent)]
    Db(#[from] tally_db::DbError),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
