//! Diagnostics command handlers.

use std::sync::Arc;

use serde_json::Value;

use crate::rpc::RpcError;
use crate::DaemonState;

type Result = std::result::Result<Value, RpcError>;

/// Daemon status summary.
pub async fn get_status(state: &Arc<DaemonState>) -> Result {
    Ok(serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "schema_version": tally_db::SCHEMA_VERSION,
        "time_zone": state.tz.name(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_state;

    #[tokio::test]
    async fn test_status_reports_time_zone() {
        let state = test_state().await;
        let status = get_status(&state).await.expect("status");
        assert_eq!(status["time_zone"], "America/Chicago");
        assert_eq!(status["schema_version"], tally_db::SCHEMA_VERSION);
    }
}
