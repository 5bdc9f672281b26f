//! Gym command handlers.

use std::sync::Arc;

use serde_json::Value;
use tally_ledger::gym;

use crate::commands::{self, parse_amount, require_str};
use crate::directory::Directory;
use crate::rpc::RpcError;
use crate::DaemonState;

type Result = std::result::Result<Value, RpcError>;

/// Log gym check-ins for the caller. A bare command adds one; a signed
/// amount adds or removes that many, never going below zero.
pub async fn gym_checkin(state: &Arc<DaemonState>, params: &Value) -> Result {
    let guild_id = require_str(params, "guild_id")?;
    let caller_id = require_str(params, "caller_id")?;
    let delta = parse_amount(params, gym::DEFAULT_CHECKIN_DELTA)?;
    let directory = Directory::from_params(params);

    let db = state.db.lock().await;
    let checkins = gym::adjust(&db, guild_id, caller_id, delta).map_err(commands::ledger_error)?;

    Ok(serde_json::json!({
        "user_id": caller_id,
        "display_name": directory.resolve(caller_id),
        "checkins": checkins,
    }))
}

/// Ranked gym leaderboard for a guild.
pub async fn gym_leaderboard(state: &Arc<DaemonState>, params: &Value) -> Result {
    let guild_id = require_str(params, "guild_id")?;
    let directory = Directory::from_params(params);

    let db = state.db.lock().await;
    let board = gym::leaderboard(&db, guild_id).map_err(commands::ledger_error)?;

    let rows: Vec<Value> = board
        .iter()
        .take(state.config.report.leaderboard_limit)
        .enumerate()
        .map(|(i, row)| {
            serde_json::json!({
                "rank": i + 1,
                "user_id": row.user_id,
                "display_name": directory.resolve(&row.user_id),
                "checkins": row.checkins,
            })
        })
        .collect();

    Ok(serde_json::json!(rows))
}

/// Wipe the guild's gym board. Privileged.
pub async fn clear_gym(state: &Arc<DaemonState>, params: &Value) -> Result {
    commands::require_privileged(state, params)?;
    let guild_id = require_str(params, "guild_id")?;

    let db = state.db.lock().await;
    let removed = gym::clear(&db, guild_id).map_err(commands::ledger_error)?;

    Ok(serde_json::json!({"rows_removed": removed}))
}
