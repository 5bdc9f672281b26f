//! Configuration file management.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Complete daemon configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TallyConfig {
    /// Storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Role names for the two capability tiers.
    #[serde(default)]
    pub roles: RoleConfig,
    /// Leaderboard and date-key settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory. Empty = platform default.
    #[serde(default)]
    pub data_dir: String,
}

/// Role-gate configuration. A caller holds a capability when any of their
/// roles matches the configured list for that tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleConfig {
    /// Roles allowed to clear boards and manage blitz campaigns.
    #[serde(default = "default_privileged_roles")]
    pub privileged: Vec<String>,
    /// Roles allowed to record sales.
    #[serde(default = "default_sales_roles")]
    pub sales: Vec<String>,
}

/// Report configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// IANA time zone used to render daily date keys.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    /// Maximum rows returned per leaderboard.
    #[serde(default = "default_leaderboard_limit")]
    pub leaderboard_limit: usize,
}

// Default value functions

fn default_privileged_roles() -> Vec<String> {
    vec!["Leadership".to_string(), "Admin".to_string()]
}

fn default_sales_roles() -> Vec<String> {
    vec![
        "Leadership".to_string(),
        "Admin".to_string(),
        "Sales".to_string(),
    ]
}

fn default_time_zone() -> String {
    "America/Chicago".to_string()
}

fn default_leaderboard_limit() -> usize {
    25
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: String::new(),
        }
    }
}

impl Default for RoleConfig {
    fn default() -> Self {
        Self {
            privileged: default_privileged_roles(),
            sales: default_sales_roles(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            time_zone: default_time_zone(),
            leaderboard_limit: default_leaderboard_limit(),
        }
    }
}

impl TallyConfig {
    /// Load configuration from the default config file location.
    ///
    /// Falls back to defaults if the file does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: TallyConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse the configured report time zone.
    pub fn time_zone(&self) -> anyhow::Result<chrono_tz::Tz> {
        chrono_tz::Tz::from_str(&self.report.time_zone)
            .map_err(|e| anyhow::anyhow!("invalid report.time_zone: {e}"))
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> PathBuf {
        if self.storage.data_dir.is_empty() {
            Self::default_data_dir()
        } else {
            PathBuf::from(&self.storage.data_dir)
        }
    }

    /// Get the config file path.
    fn config_path() -> PathBuf {
        if let Ok(dir) = std::env::var("TALLY_DATA_DIR") {
            return PathBuf::from(dir).join("config.toml");
        }
        Self::default_data_dir().join("config.toml")
    }

    /// Platform-specific default data directory.
    fn default_data_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("TALLY_DATA_DIR") {
            return PathBuf::from(dir);
        }
        #[cfg(target_os = "macos")]
        {
            dirs_fallback("Library/Application Support/Tally")
        }
        #[cfg(not(target_os = "macos"))]
        {
            dirs_fallback(".tally")
        }
    }
}

/// Fallback home directory resolution.
fn dirs_fallback(subpath: &str) -> PathBuf {
    std::env::var("HOME")
        .map(|h| PathBuf::from(h).join(subpath))
        .unwrap_or_else(|_| PathBuf::from("/tmp/tally"))
}
