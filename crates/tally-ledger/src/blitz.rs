//! Blitz campaign manager.
//!
//! A blitz is a named, time-boxed appointment campaign. Per guild the
//! states are NoCampaign → Active → Ended; Ended is terminal for that
//! name, and a name can never be reused once started. At most one
//! campaign is active per guild at any time (also enforced by a partial
//! unique index in the schema).

use rusqlite::Connection;
use tally_db::queries::blitz;

pub use tally_db::queries::blitz::{BlitzApptRow, CampaignRow};

use crate::{LedgerError, Result};

/// One day of a campaign report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlitzDay {
    pub day: String,
    /// Rows for the day, highest count first.
    pub rows: Vec<BlitzApptRow>,
}

/// Start a new campaign.
///
/// # Errors
///
/// - [`LedgerError::Validation`] if the name is empty
/// - [`LedgerError::AlreadyExists`] if the name was ever used for this
///   guild, active or ended
/// - [`LedgerError::AlreadyActive`] if another campaign is running
pub fn start(conn: &Connection, guild_id: &str, name: &str, now: u64) -> Result<CampaignRow> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LedgerError::Validation("campaign name is required".to_string()));
    }

    if blitz::find_campaign(conn, guild_id, name)?.is_some() {
        return Err(LedgerError::AlreadyExists(name.to_string()));
    }
    if let Some(active) = blitz::active_campaign(conn, guild_id)? {
        return Err(LedgerError::AlreadyActive(active.name));
    }

    blitz::insert_campaign(conn, guild_id, name, now)?;
    tracing::info!(guild_id, name, started_at = now, "blitz campaign started");

    Ok(CampaignRow {
        name: name.to_string(),
        started_at: now,
        ended_at: None,
        active: true,
    })
}

/// End the currently active campaign.
///
/// # Errors
///
/// [`LedgerError::NoneActive`] if no campaign is running.
pub fn end(conn: &Connection, guild_id: &str, now: u64) -> Result<CampaignRow> {
    let Some(campaign) = blitz::active_campaign(conn, guild_id)? else {
        return Err(LedgerError::NoneActive);
    };

    blitz::end_campaign(conn, guild_id, &campaign.name, now)?;
    tracing::info!(guild_id, name = %campaign.name, ended_at = now, "blitz campaign ended");

    Ok(CampaignRow {
        ended_at: Some(now),
        active: false,
        ..campaign
    })
}

/// Mirror an appointment delta into the active campaign, if any.
///
/// Invoked by the daily appointment ledger after every adjustment. The
/// campaign count clamps at zero against its own current value; ended
/// campaigns never receive new counts. Returns the campaign name and
/// new count when a mirror happened.
pub fn mirror(
    conn: &Connection,
    guild_id: &str,
    user_id: &str,
    day: &str,
    delta: i64,
) -> Result<Option<(String, i64)>> {
    let Some(active) = blitz::active_campaign(conn, guild_id)? else {
        return Ok(None);
    };

    let new_count = blitz::adjust_count(conn, guild_id, &active.name, day, user_id, delta)?;
    Ok(Some((active.name, new_count)))
}

/// Resolve which campaign a query refers to.
///
/// An explicit name must exist (active or ended); otherwise the active
/// campaign wins, then the most recently ended one.
fn resolve(conn: &Connection, guild_id: &str, name: Option<&str>) -> Result<CampaignRow> {
    if let Some(name) = name {
        return blitz::find_campaign(conn, guild_id, name)?
            .ok_or_else(|| LedgerError::NotFound(name.to_string()));
    }
    if let Some(active) = blitz::active_campaign(conn, guild_id)? {
        return Ok(active);
    }
    if let Some(ended) = blitz::latest_ended(conn, guild_id)? {
        return Ok(ended);
    }
    Err(LedgerError::NoData)
}

/// Report a campaign's counts grouped by day ascending; within a day,
/// rows are ordered by count descending.
pub fn report(
    conn: &Connection,
    guild_id: &str,
    name: Option<&str>,
) -> Result<(CampaignRow, Vec<BlitzDay>)> {
    let campaign = resolve(conn, guild_id, name)?;
    let rows = blitz::campaign_rows(conn, guild_id, &campaign.name)?;

    let mut days: Vec<BlitzDay> = Vec::new();
    for row in rows {
        match days.last_mut() {
            Some(group) if group.day == row.day => group.rows.push(row),
            _ => days.push(BlitzDay {
                day: row.day.clone(),
                rows: vec![row],
            }),
        }
    }

    Ok((campaign, days))
}

/// Clear the counts of the active campaign, or the most recently ended
/// one if nothing is active. The campaign record survives, so its name
/// remains reserved. Returns the campaign and the rows removed.
pub fn clear_recent(conn: &Connection, guild_id: &str) -> Result<(CampaignRow, usize)> {
    let campaign = resolve(conn, guild_id, None)?;
    let removed = blitz::clear_campaign(conn, guild_id, &campaign.name)?;
    tracing::info!(guild_id, name = %campaign.name, removed, "blitz campaign data cleared");
    Ok((campaign, removed))
}
