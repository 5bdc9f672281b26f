//! Blitz campaign command handlers.

use std::sync::Arc;

use serde_json::Value;
use tally_ledger::blitz;

use crate::commands::{self, require_str};
use crate::directory::Directory;
use crate::rpc::RpcError;
use crate::DaemonState;

type Result = std::result::Result<Value, RpcError>;

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// The campaign name argument: an explicit `name` param, or the joined
/// argument tokens.
fn campaign_name(params: &Value) -> Option<String> {
    if let Some(name) = params.get("name").and_then(|v| v.as_str()) {
        return Some(name.to_string());
    }
    let tokens: Vec<&str> = params
        .get("args")?
        .as_array()?
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    if tokens.is_empty() {
        None
    } else {
        Some(tokens.join(" "))
    }
}

/// Start a named campaign. Privileged.
pub async fn blitz_start(state: &Arc<DaemonState>, params: &Value) -> Result {
    commands::require_privileged(state, params)?;
    let guild_id = require_str(params, "guild_id")?;
    let name = campaign_name(params)
        .ok_or_else(|| RpcError::validation("campaign name is required"))?;

    let db = state.db.lock().await;
    let campaign =
        blitz::start(&db, guild_id, &name, now_secs()).map_err(commands::ledger_error)?;

    Ok(serde_json::json!({
        "name": campaign.name,
        "started_at": campaign.started_at,
    }))
}

/// End the active campaign. Privileged.
pub async fn blitz_end(state: &Arc<DaemonState>, params: &Value) -> Result {
    commands::require_privileged(state, params)?;
    let guild_id = require_str(params, "guild_id")?;

    let db = state.db.lock().await;
    let campaign = blitz::end(&db, guild_id, now_secs()).map_err(commands::ledger_error)?;

    Ok(serde_json::json!({
        "name": campaign.name,
        "started_at": campaign.started_at,
        "ended_at": campaign.ended_at,
    }))
}

/// Report a campaign, grouped by day. Defaults to the active campaign,
/// then the most recently ended one.
pub async fn blitz_report(state: &Arc<DaemonState>, params: &Value) -> Result {
    let guild_id = require_str(params, "guild_id")?;
    let name = campaign_name(params);
    let directory = Directory::from_params(params);

    let db = state.db.lock().await;
    let (campaign, days) =
        blitz::report(&db, guild_id, name.as_deref()).map_err(commands::ledger_error)?;

    let days: Vec<Value> = days
        .iter()
        .map(|group| {
            let rows: Vec<Value> = group
                .rows
                .iter()
                .take(state.config.report.leaderboard_limit)
                .enumerate()
                .map(|(i, row)| {
                    serde_json::json!({
                        "rank": i + 1,
                        "user_id": row.user_id,
                        "display_name": directory.resolve(&row.user_id),
                        "appt_count": row.appt_count,
                    })
                })
                .collect();
            serde_json::json!({"day": group.day, "rows": rows})
        })
        .collect();

    Ok(serde_json::json!({
        "campaign": {
            "name": campaign.name,
            "active": campaign.active,
            "started_at": campaign.started_at,
            "ended_at": campaign.ended_at,
        },
        "days": days,
    }))
}

/// Clear the counts of the active (or most recently ended) campaign.
/// The name stays reserved. Privileged.
pub async fn blitz_clear(state: &Arc<DaemonState>, params: &Value) -> Result {
    commands::require_privileged(state, params)?;
    let guild_id = require_str(params, "guild_id")?;

    let db = state.db.lock().await;
    let (campaign, removed) = blitz::clear_recent(&db, guild_id).map_err(commands::ledger_error)?;

    Ok(serde_json::json!({
        "name": campaign.name,
        "rows_removed": removed,
    }))
}
