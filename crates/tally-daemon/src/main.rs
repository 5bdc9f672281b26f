//! tally-daemon: the activity counter daemon.
//!
//! Single OS process running a Tokio async runtime. The chat gateway
//! delivers pre-parsed command invocations via JSON-RPC over a Unix
//! socket and renders whatever comes back; all counter state (sales,
//! gym check-ins, daily appointments, blitz campaigns) lives here.

mod commands;
mod config;
mod directory;
mod rpc;

use std::sync::Arc;

use tracing::{error, info};

use crate::config::TallyConfig;
use crate::rpc::RpcServer;

/// Daemon-wide shared state.
pub struct DaemonState {
    /// Database connection.
    pub db: Arc<tokio::sync::Mutex<rusqlite::Connection>>,
    /// Configuration.
    pub config: TallyConfig,
    /// Report time zone, parsed once at startup.
    pub tz: chrono_tz::Tz,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tally=info".parse()?),
        )
        .init();

    info!("Tally daemon starting");

    // 1. Load config
    let config = TallyConfig::load()?;
    let tz = config.time_zone()?;
    let data_dir = config.data_dir();

    // Ensure data directory exists
    std::fs::create_dir_all(&data_dir)?;

    // 2. Open database
    let db_path = data_dir.join("tally.db");
    let conn = tally_db::open(&db_path)?;
    let db = Arc::new(tokio::sync::Mutex::new(conn));

    // 3. Build daemon state
    let state = Arc::new(DaemonState { db, config, tz });

    // 4. Start the gateway socket server
    let socket_path = data_dir.join("gateway.sock");
    let rpc_server = RpcServer::new(state, socket_path.clone());

    info!("Starting JSON-RPC server on {:?}", socket_path);

    tokio::select! {
        result = rpc_server.run() => {
            if let Err(e) = result {
                error!("RPC server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received, shutting down");
        }
    }

    // Clean up socket file
    let _ = std::fs::remove_file(&socket_path);

    info!("Daemon stopped");
    Ok(())
}

/// Build a daemon state over an in-memory database (for handler tests).
#[cfg(test)]
pub(crate) async fn test_state() -> Arc<DaemonState> {
    let conn = tally_db::open_memory().expect("open in-memory db");
    Arc::new(DaemonState {
        db: Arc::new(tokio::sync::Mutex::new(conn)),
        config: TallyConfig::default(),
        tz: chrono_tz::America::Chicago,
    })
}
