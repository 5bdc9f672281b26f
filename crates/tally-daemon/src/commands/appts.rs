//! Daily appointment command handlers.
//!
//! The date key is recomputed from the configured report time zone on
//! every invocation, so counts roll over naturally as days pass.

use std::sync::Arc;

use serde_json::Value;
use tally_ledger::{appts, clock};

use crate::commands::{self, parse_amount, require_str};
use crate::directory::Directory;
use crate::rpc::RpcError;
use crate::DaemonState;

type Result = std::result::Result<Value, RpcError>;

/// Adjust the caller's appointment count for today. Mirrors into the
/// active blitz campaign when one is running.
pub async fn appt_adjust(state: &Arc<DaemonState>, params: &Value) -> Result {
    let guild_id = require_str(params, "guild_id")?;
    let caller_id = require_str(params, "caller_id")?;
    let delta = parse_amount(params, appts::DEFAULT_APPT_DELTA)?;
    let directory = Directory::from_params(params);
    let day = clock::date_key(state.tz);

    let db = state.db.lock().await;
    let outcome =
        appts::adjust(&db, guild_id, caller_id, &day, delta).map_err(commands::ledger_error)?;

    let blitz = outcome.blitz.map(|(campaign, count)| {
        serde_json::json!({"campaign": campaign, "appt_count": count})
    });

    Ok(serde_json::json!({
        "user_id": caller_id,
        "display_name": directory.resolve(caller_id),
        "day": outcome.day,
        "appt_count": outcome.day_count,
        "blitz": blitz,
    }))
}

/// Ranked appointment leaderboard for today.
pub async fn appt_leaderboard(state: &Arc<DaemonState>, params: &Value) -> Result {
    let guild_id = require_str(params, "guild_id")?;
    let directory = Directory::from_params(params);
    let day = clock::date_key(state.tz);

    let db = state.db.lock().await;
    let board = appts::leaderboard(&db, guild_id, &day).map_err(commands::ledger_error)?;

    let rows: Vec<Value> = board
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

    Ok(serde_json::json!({"day": day, "rows": rows}))
}

/// Wipe the guild's appointment board for today. Privileged.
pub async fn clear_appts(state: &Arc<DaemonState>, params: &Value) -> Result {
    commands::require_privileged(state, params)?;
    let guild_id = require_str(params, "guild_id")?;
    let day = clock::date_key(state.tz);

    let db = state.db.lock().await;
    let removed = appts::clear_day(&db, guild_id, &day).map_err(commands::ledger_error)?;

    Ok(serde_json::json!({"day": day, "rows_removed": removed}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_state;

    #[tokio::test]
    async fn test_adjust_uses_todays_key() {
        let state = test_state().await;
        let params = serde_json::json!({"guild_id": "g1", "caller_id": "u1"});

        let result = appt_adjust(&state, &params).await.expect("adjust");
        assert_eq!(result["appt_count"], 1);
        assert_eq!(result["day"], clock::date_key(state.tz));
        assert!(result["blitz"].is_null());
    }

    #[tokio::test]
    async fn test_adjust_mirrors_into_blitz() {
        let state = test_state().await;
        {
            let db = state.db.lock().await;
            tally_ledger::blitz::start(&db, "g1", "Spring", 100).expect("start");
        }

        let params = serde_json::json!({"guild_id": "g1", "caller_id": "u1", "amount": 2});
        let result = appt_adjust(&state, &params).await.expect("adjust");
        assert_eq!(result["blitz"]["campaign"], "Spring");
        assert_eq!(result["blitz"]["appt_count"], 2);
    }

    #[tokio::test]
    async fn test_clear_requires_privilege() {
        let state = test_state().await;
        let params = serde_json::json!({
            "guild_id": "g1",
            "caller_id": "u1",
            "caller_roles": ["Member"],
        });

        let err = clear_appts(&state, &params).await.expect_err("denied");
        assert_eq!(err.code, -32030);
    }
}
