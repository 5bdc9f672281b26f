//! Sales command handlers.

use std::sync::Arc;

use serde_json::Value;
use tally_ledger::sales;

use crate::commands::{self, first_mention, require_str};
use crate::directory::Directory;
use crate::rpc::RpcError;
use crate::DaemonState;

type Result = std::result::Result<Value, RpcError>;

/// Record a sale. Mentioning yourself records a self-generated sale; any
/// other mention records an assisted sale with the caller as setter and
/// the mentioned user as closer.
pub async fn record_sale(state: &Arc<DaemonState>, params: &Value) -> Result {
    commands::require_sales(state, params)?;

    let guild_id = require_str(params, "guild_id")?;
    let caller_id = require_str(params, "caller_id")?;
    let target_id = first_mention(params)
        .ok_or_else(|| RpcError::validation("mention the user to credit"))?;
    let directory = Directory::from_params(params);

    let db = state.db.lock().await;

    if target_id == caller_id {
        let row = sales::record_self_gen(&db, guild_id, caller_id)
            .map_err(commands::ledger_error)?;
        return Ok(serde_json::json!({
            "kind": "self_gen",
            "user_id": row.user_id,
            "display_name": directory.resolve(caller_id),
            "total_sales": row.total_sales,
            "self_gen": row.self_gen,
            "set_sales": row.set_sales,
        }));
    }

    sales::record_assisted(&db, guild_id, &target_id, caller_id)
        .map_err(commands::ledger_error)?;
    let closer = sales::totals(&db, guild_id, &target_id).map_err(commands::ledger_error)?;
    let setter = sales::totals(&db, guild_id, caller_id).map_err(commands::ledger_error)?;

    Ok(serde_json::json!({
        "kind": "assisted",
        "closer": {
            "user_id": closer.user_id,
            "display_name": directory.resolve(&target_id),
            "total_sales": closer.total_sales,
        },
        "setter": {
            "user_id": setter.user_id,
            "display_name": directory.resolve(caller_id),
            "total_sales": setter.total_sales,
            "set_sales": setter.set_sales,
        },
    }))
}

/// Ranked sales leaderboard for a guild.
pub async fn sales_leaderboard(state: &Arc<DaemonState>, params: &Value) -> Result {
    let guild_id = require_str(params, "guild_id")?;
    let directory = Directory::from_params(params);

    let db = state.db.lock().await;
    let board = sales::leaderboard(&db, guild_id).map_err(commands::ledger_error)?;

    let rows: Vec<Value> = board
        .iter()
        .take(state.config.report.leaderboard_limit)
        .enumerate()
        .map(|(i, row)| {
            serde_json::json!({
                "rank": i + 1,
                "user_id": row.user_id,
                "display_name": directory.resolve(&row.user_id),
                "total_sales": row.total_sales,
                "self_gen": row.self_gen,
                "set_sales": row.set_sales,
            })
        })
        .collect();

    Ok(serde_json::json!(rows))
}

/// Wipe the guild's sales board. Privileged.
pub async fn clear_sales(state: &Arc<DaemonState>, params: &Value) -> Result {
    commands::require_privileged(state, params)?;
    let guild_id = require_str(params, "guild_id")?;

    let db = state.db.lock().await;
    let removed = sales::clear(&db, guild_id).map_err(commands::ledger_error)?;

    Ok(serde_json::json!({"rows_removed": removed}))
}
