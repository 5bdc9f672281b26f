//! Command handlers, one module per counter family.

pub mod appts;
pub mod blitz;
pub mod diagnostics;
pub mod gym;
pub mod sales;

use serde_json::Value;
use tally_ledger::LedgerError;

use crate::rpc::RpcError;
use crate::DaemonState;

/// Extract a required string parameter.
pub(crate) fn require_str<'a>(params: &'a Value, key: &str) -> Result<&'a str, RpcError> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| RpcError::invalid_params(&format!("{key} required")))
}

/// The caller's role names, empty if absent.
pub(crate) fn caller_roles(params: &Value) -> Vec<String> {
    params
        .get("caller_roles")
        .and_then(|v| v.as_array())
        .map(|roles| {
            roles
                .iter()
                .filter_map(|r| r.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// The first mentioned user, if any.
pub(crate) fn first_mention(params: &Value) -> Option<String> {
    params
        .get("mentions")
        .and_then(|v| v.as_array())
        .and_then(|m| m.first())
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

/// Parse the optional signed `amount` parameter, accepting either a JSON
/// integer or a raw token string. Non-numeric tokens are rejected without
/// touching any state.
pub(crate) fn parse_amount(params: &Value, default: i64) -> Result<i64, RpcError> {
    match params.get("amount") {
        None => Ok(default),
        Some(v) if v.is_null() => Ok(default),
        Some(v) => {
            if let Some(n) = v.as_i64() {
                return Ok(n);
            }
            v.as_str()
                .and_then(|s| s.trim().parse::<i64>().ok())
                .ok_or_else(|| RpcError::validation("amount must be a whole number"))
        }
    }
}

/// Check the privileged capability (clears, campaign management).
///
/// Evaluated fresh on every invocation from the roles the gateway sent;
/// nothing is cached between commands.
pub(crate) fn require_privileged(state: &DaemonState, params: &Value) -> Result<(), RpcError> {
    require_capability(&caller_roles(params), &state.config.roles.privileged, "privileged")
}

/// Check the sales-eligible capability (recording sales).
pub(crate) fn require_sales(state: &DaemonState, params: &Value) -> Result<(), RpcError> {
    require_capability(&caller_roles(params), &state.config.roles.sales, "sales")
}

fn require_capability(
    roles: &[String],
    allowed: &[String],
    capability: &str,
) -> Result<(), RpcError> {
    if roles.iter().any(|r| allowed.contains(r)) {
        Ok(())
    } else {
        Err(RpcError::permission_denied(capability))
    }
}

/// Map ledger errors onto RPC error codes. Storage failures are logged
/// here and surfaced as a generic internal error.
pub(crate) fn ledger_error(err: LedgerError) -> RpcError {
    match err {
        LedgerError::Validation(detail) => RpcError::validation(&detail),
        LedgerError::AlreadyExists(name) => RpcError::campaign_exists(&name),
        LedgerError::AlreadyActive(name) => RpcError::campaign_active(&name),
        LedgerError::NoneActive => RpcError::no_active_campaign(),
        LedgerError::NotFound(name) => RpcError::campaign_not_found(&name),
        LedgerError::NoData => RpcError::no_campaign_data(),
        LedgerError::Db(e) => {
            tracing::error!("storage failure: {e}");
            RpcError::internal_error("storage failure")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_forms() {
        assert_eq!(parse_amount(&serde_json::json!({}), 1).expect("default"), 1);
        assert_eq!(
            parse_amount(&serde_json::json!({"amount": -3}), 1).expect("int"),
            -3
        );
        assert_eq!(
            parse_amount(&serde_json::json!({"amount": "4"}), 1).expect("token"),
            4
        );
        assert!(parse_amount(&serde_json::json!({"amount": "lots"}), 1).is_err());
    }

    #[test]
    fn test_capability_requires_matching_role() {
        let allowed = vec!["Leadership".to_string(), "Admin".to_string()];
        assert!(require_capability(&["Admin".to_string()], &allowed, "privileged").is_ok());

        let err = require_capability(&["Member".to_string()], &allowed, "privileged")
            .expect_err("denied");
        assert_eq!(err.code, -32030);
    }

    #[test]
    fn test_first_mention() {
        let params = serde_json::json!({"mentions": ["u1", "u2"]});
        assert_eq!(first_mention(&params).as_deref(), Some("u1"));
        assert_eq!(first_mention(&serde_json::json!({})), None);
    }
}
