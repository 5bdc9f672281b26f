//! JSON-RPC server over Unix socket.
//!
//! The chat gateway connects here and sends one request per inbound chat
//! command, carrying the guild, caller, caller roles, mentioned users,
//! pre-split argument tokens, and a best-effort display-name map. Each
//! connection runs on its own task; a failed command only fails its own
//! response.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;
use tracing::{debug, error, info, warn};

use crate::commands;
use crate::DaemonState;

/// JSON-RPC request.
#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    /// JSON-RPC version (must be "2.0").
    pub jsonrpc: String,
    /// Request ID.
    pub id: serde_json::Value,
    /// Method name.
    pub method: String,
    /// Parameters.
    #[serde(default)]
    pub params: serde_json::Value,
}

/// JSON-RPC response.
#[derive(Debug, Serialize)]
pub struct RpcResponse {
    /// JSON-RPC version.
    pub jsonrpc: String,
    /// Request ID.
    pub id: serde_json::Value,
    /// Result or error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

/// JSON-RPC error object.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RpcError {
    /// Error code.
    pub code: i32,
    /// Error name.
    pub message: String,
    /// Optional structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl RpcResponse {
    /// Create a success response.
    pub fn success(id: serde_json::Value, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: serde_json::Value, error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

impl RpcError {
    // Standard JSON-RPC errors

    /// Parse error (-32700).
    pub fn parse_error() -> Self {
        Self {
            code: -32700,
            message: "PARSE_ERROR".to_string(),
            data: None,
        }
    }

    /// Method not found (-32601).
    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: "METHOD_NOT_FOUND".to_string(),
            data: Some(serde_json::json!({"method": method})),
        }
    }

    /// Invalid params (-32602).
    pub fn invalid_params(detail: &str) -> Self {
        Self {
            code: -32602,
            message: "INVALID_PARAMS".to_string(),
            data: Some(serde_json::json!({"detail": detail})),
        }
    }

    /// Internal error (-32603).
    pub fn internal_error(detail: &str) -> Self {
        Self {
            code: -32603,
            message: "INTERNAL_ERROR".to_string(),
            data: Some(serde_json::json!({"detail": detail})),
        }
    }

    // Domain errors

    /// Permission denied (-32030).
    pub fn permission_denied(capability: &str) -> Self {
        Self {
            code: -32030,
            message: "PERMISSION_DENIED".to_string(),
            data: Some(serde_json::json!({"capability": capability})),
        }
    }

    /// Validation error (-32031): bad target or amount, no state change.
    pub fn validation(detail: &str) -> Self {
        Self {
            code: -32031,
            message: "VALIDATION_ERROR".to_string(),
            data: Some(serde_json::json!({"detail": detail})),
        }
    }

    /// Campaign name already used (-32040).
    pub fn campaign_exists(name: &str) -> Self {
        Self {
            code: -32040,
            message: "CAMPAIGN_EXISTS".to_string(),
            data: Some(serde_json::json!({"name": name})),
        }
    }

    /// Another campaign is active (-32041).
    pub fn campaign_active(name: &str) -> Self {
        Self {
            code: -32041,
            message: "CAMPAIGN_ACTIVE".to_string(),
            data: Some(serde_json::json!({"name": name})),
        }
    }

    /// No active campaign (-32042).
    pub fn no_active_campaign() -> Self {
        Self {
            code: -32042,
            message: "NO_ACTIVE_CAMPAIGN".to_string(),
            data: None,
        }
    }

    /// Campaign not found (-32043).
    pub fn campaign_not_found(name: &str) -> Self {
        Self {
            code: -32043,
            message: "CAMPAIGN_NOT_FOUND".to_string(),
            data: Some(serde_json::json!({"name": name})),
        }
    }

    /// No campaign data for the guild (-32044).
    pub fn no_campaign_data() -> Self {
        Self {
            code: -32044,
            message: "NO_CAMPAIGN_DATA".to_string(),
            data: None,
        }
    }
}

/// The RPC server.
pub struct RpcServer {
    state: Arc<DaemonState>,
    socket_path: PathBuf,
}

impl RpcServer {
    /// Create a new RPC server.
    pub fn new(state: Arc<DaemonState>, socket_path: PathBuf) -> Self {
        Self { state, socket_path }
    }

    /// Run the server, accepting connections.
    pub async fn run(&self) -> anyhow::Result<()> {
        // Remove stale socket file
        let _ = std::fs::remove_file(&self.socket_path);

        let listener = UnixListener::bind(&self.socket_path)?;
        info!("Gateway socket listening on {:?}", self.socket_path);

        loop {
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    let state = self.state.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(state, stream).await {
                            warn!("Connection error: {}", e);
                        }
                    });
                }
                Err(e) => {
                    error!("Accept error: {}", e);
                }
            }
        }
    }
}

/// Handle a single gateway connection.
async fn handle_connection(
    state: Arc<DaemonState>,
    stream: tokio::net::UnixStream,
) -> anyhow::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            break; // EOF
        }

        let response = match serde_json::from_str::<RpcRequest>(&line) {
            Ok(request) => dispatch_request(state.clone(), request).await,
            Err(_) => RpcResponse::error(serde_json::Value::Null, RpcError::parse_error()),
        };

        let mut response_json = serde_json::to_string(&response)?;
        response_json.push('\n');
        writer.write_all(response_json.as_bytes()).await?;
        writer.flush().await?;
    }

    Ok(())
}

/// Dispatch a JSON-RPC request to the appropriate command handler.
pub async fn dispatch_request(state: Arc<DaemonState>, request: RpcRequest) -> RpcResponse {
    let id = request.id.clone();
    let method = request.method.as_str();

    debug!("Dispatching RPC method: {}", method);

    let result = match method {
        // Sales
        "record_sale" => commands::sales::record_sale(&state, &request.params).await,
        "sales_leaderboard" => commands::sales::sales_leaderboard(&state, &request.params).await,
        "clear_sales" => commands::sales::clear_sales(&state, &request.params).await,

        // Gym
        "gym_checkin" => commands::gym::gym_checkin(&state, &request.params).await,
        "gym_leaderboard" => commands::gym::gym_leaderboard(&state, &request.params).await,
        "clear_gym" => commands::gym::clear_gym(&state, &request.params).await,

        // Daily appointments
        "appt_adjust" => commands::appts::appt_adjust(&state, &request.params).await,
        "appt_leaderboard" => commands::appts::appt_leaderboard(&state, &request.params).await,
        "clear_appts" => commands::appts::clear_appts(&state, &request.params).await,

        // Blitz campaigns
        "blitz_start" => commands::blitz::blitz_start(&state, &request.params).await,
        "blitz_end" => commands::blitz::blitz_end(&state, &request.params).await,
        "blitz_report" => commands::blitz::blitz_report(&state, &request.params).await,
        "blitz_clear" => commands::blitz::blitz_clear(&state, &request.params).await,

        // Diagnostics
        "get_status" => commands::diagnostics::get_status(&state).await,

        _ => Err(RpcError::method_not_found(method)),
    };

    match result {
        Ok(value) => RpcResponse::success(id, value),
        Err(err) => RpcResponse::error(id, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_error_codes() {
        let err = RpcError::permission_denied("privileged");
        assert_eq!(err.code, -32030);
        assert_eq!(err.message, "PERMISSION_DENIED");

        let err = RpcError::campaign_active("Spring");
        assert_eq!(err.code, -32041);
        assert_eq!(
            err.data.expect("data")["name"].as_str(),
            Some("Spring")
        );

        let err = RpcError::method_not_found("unknown");
        assert_eq!(err.code, -32601);
    }

    #[test]
    fn test_rpc_response_success() {
        let resp = RpcResponse::success(serde_json::json!(1), serde_json::json!({"checkins": 3}));
        assert!(resp.result.is_some());
        assert!(resp.error.is_none());
    }

    #[test]
    fn test_rpc_response_error() {
        let resp = RpcResponse::error(serde_json::json!(1), RpcError::no_campaign_data());
        assert!(resp.result.is_none());
        assert!(resp.error.is_some());
    }
}
