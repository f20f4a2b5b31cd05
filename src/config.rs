/// Monitor configuration.
///
/// All settings have compiled-in defaults so the binary runs with zero
/// setup; an optional TOML file (`monitor.toml` by default) can override
/// any subset of them. There is no environment-variable layer — the fixed
/// gauge identifier and endpoint belong in explicit configuration, not in
/// mutable globals.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// USGS site code for the Dungeness River gauge near Sequim, WA.
pub const DEFAULT_GAUGE_ID: &str = "12048000";

/// Identifying string sent as `User-Agent`; USGS rejects anonymous clients.
pub const DEFAULT_USER_AGENT: &str =
    "dungeness-monitor/0.1 (river flow status panel; contact: ops@dungeness-monitor.example)";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    /// 8-digit USGS site code to poll.
    pub gauge_id: String,
    /// User-Agent header value for all API requests.
    pub user_agent: String,
    /// Seconds between scheduled refresh cycles.
    pub refresh_interval_secs: u64,
    /// Per-request HTTP timeout, seconds.
    pub fetch_timeout_secs: u64,
    /// Optional log file path; console-only when absent.
    pub log_file: Option<String>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            gauge_id: DEFAULT_GAUGE_ID.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            refresh_interval_secs: 60,
            fetch_timeout_secs: 15,
            log_file: None,
        }
    }
}

impl MonitorConfig {
    /// Loads configuration from a TOML file, falling back to defaults if
    /// the file does not exist. A file that exists but fails to parse is an
    /// error — a half-read config is worse than none.
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        if !Path::new(path).exists() {
            return Ok(MonitorConfig::default());
        }
        let raw = std::fs::read_to_string(path)?;
        let config: MonitorConfig = toml::from_str(&raw)?;
        Ok(config)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
