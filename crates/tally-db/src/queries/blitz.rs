//! Blitz campaign metadata and campaign-scoped appointment queries.

use rusqlite::Connection;

use crate::Result;

/// A campaign record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignRow {
    pub name: String,
    pub started_at: u64,
    pub ended_at: Option<u64>,
    pub active: bool,
}

/// A campaign-scoped appointment row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlitzApptRow {
    pub day: String,
    pub user_id: String,
    pub appt_count: i64,
}

fn campaign_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CampaignRow> {
    Ok(CampaignRow {
        name: row.get(0)?,
        started_at: row.get::<_, i64>(1)? as u64,
        ended_at: row.get::<_, Option<i64>>(2)?.map(|t| t as u64),
        active: row.get(3)?,
    })
}

/// Insert a new active campaign.
pub fn insert_campaign(
    conn: &Connection,
    guild_id: &str,
    name: &str,
    started_at: u64,
) -> Result<()> {
    conn.execute(
        "INSERT INTO blitz_campaigns (guild_id, name, started_at, active)
         VALUES (?1, ?2, ?3, 1)",
        rusqlite::params![guild_id, name, started_at as i64],
    )?;
    Ok(())
}

/// Look up a campaign by name, active or ended.
pub fn find_campaign(conn: &Connection, guild_id: &str, name: &str) -> Result<Option<CampaignRow>> {
    let row = conn
        .query_row(
            "SELECT name, started_at, ended_at, active FROM blitz_campaigns
             WHERE guild_id = ?1 AND name = ?2",
            rusqlite::params![guild_id, name],
            campaign_from_row,
        )
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(other),
        })?;
    Ok(row)
}

/// The currently active campaign for a guild, if any.
pub fn active_campaign(conn: &Connection, guild_id: &str) -> Result<Option<CampaignRow>> {
    let row = conn
        .query_row(
            "SELECT name, started_at, ended_at, active FROM blitz_campaigns
             WHERE guild_id = ?1 AND active = 1",
            [guild_id],
            campaign_from_row,
        )
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(other),
        })?;
    Ok(row)
}

/// The most recently ended campaign for a guild, if any.
pub fn latest_ended(conn: &Connection, guild_id: &str) -> Result<Option<CampaignRow>> {
    let row = conn
        .query_row(
            "SELECT name, started_at, ended_at, active FROM blitz_campaigns
             WHERE guild_id = ?1 AND active = 0 AND ended_at IS NOT NULL
             ORDER BY ended_at DESC LIMIT 1",
            [guild_id],
            campaign_from_row,
        )
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(other),
        })?;
    Ok(row)
}

/// Mark a campaign as ended. Returns the number of rows updated.
pub fn end_campaign(conn: &Connection, guild_id: &str, name: &str, ended_at: u64) -> Result<usize> {
    let updated = conn.execute(
        "UPDATE blitz_campaigns SET active = 0, ended_at = ?1
         WHERE guild_id = ?2 AND name = ?3 AND active = 1",
        rusqlite::params![ended_at as i64, guild_id, name],
    )?;
    Ok(updated)
}

/// Apply a signed delta to a campaign-scoped count, clamped at zero.
///
/// Creates the row at zero if absent. Returns the new count.
pub fn adjust_count(
    conn: &Connection,
    guild_id: &str,
    campaign: &str,
    day: &str,
    user_id: &str,
    delta: i64,
) -> Result<i64> {
    let new_count = conn.query_row(
        "INSERT INTO blitz_appts (guild_id, campaign, day, user_id, appt_count)
         VALUES (?1, ?2, ?3, ?4, MAX(0, ?5))
         ON CONFLICT(guild_id, campaign, day, user_id) DO UPDATE SET
             appt_count = MAX(0, appt_count + ?5)
         RETURNING appt_count",
        rusqlite::params![guild_id, campaign, day, user_id, delta],
        |row| row.get(0),
    )?;
    Ok(new_count)
}

/// Get a campaign-scoped count, 0 if absent.
pub fn get_count(
    conn: &Connection,
    guild_id: &str,
    campaign: &str,
    day: &str,
    user_id: &str,
) -> Result<i64> {
    let count = conn
        .query_row(
            "SELECT appt_count FROM blitz_appts
             WHERE guild_id = ?1 AND campaign = ?2 AND day = ?3 AND user_id = ?4",
            rusqlite::params![guild_id, campaign, day, user_id],
            |row| row.get(0),
        )
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(0),
            other => Err(other),
        })?;
    Ok(count)
}

/// All rows for one campaign, day ascending, then count descending.
pub fn campaign_rows(conn: &Connection, guild_id: &str, campaign: &str) -> Result<Vec<BlitzApptRow>> {
    let mut stmt = conn.prepare(
        "SELECT day, user_id, appt_count FROM blitz_appts
         WHERE guild_id = ?1 AND campaign = ?2
         ORDER BY day ASC, appt_count DESC",
    )?;

    let rows = stmt
        .query_map(rusqlite::params![guild_id, campaign], |row| {
            Ok(BlitzApptRow {
                day: row.get(0)?,
                user_id: row.get(1)?,
                appt_count: row.get(2)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Delete the appointment rows for one campaign. The campaign record
/// itself is kept, so the name stays reserved. Returns rows removed.
pub fn clear_campaign(conn: &Connection, guild_id: &str, campaign: &str) -> Result<usize> {
    let removed = conn.execute(
        "DELETE FROM blitz_appts WHERE guild_id = ?1 AND campaign = ?2",
        rusqlite::params![guild_id, campaign],
    )?;
    Ok(removed)
}
