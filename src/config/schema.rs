/// Configuration schema and defaults for infractl.
///
/// Defines the TOML-serializable configuration structure with the sections
/// `[backend]`, `[dashboard]`, `[session]` and `[logging]`.
///
/// Every field has a built-in default. Users only need to set the values
/// they want to override.
use serde::{Deserialize, Serialize};

use crate::model::Role;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level infractl configuration.
///
/// Maps directly to `~/.infractl/config.toml` and `.infractl.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfraConfig {
    pub backend: BackendConfig,
    pub dashboard: DashboardConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [backend]
// ---------------------------------------------------------------------------

/// Where the InfraControl server lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL; `/api/status` and `/api/domains` are appended.
    pub url: String,
    /// Per-request timeout. A hung request otherwise stalls its poll cycle.
    pub timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:5000".to_string(),
            timeout_ms: 10_000,
        }
    }
}

// ---------------------------------------------------------------------------
// [dashboard]
// ---------------------------------------------------------------------------

/// Local web shell settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Address `infractl serve` binds to.
    pub listen: String,
    /// Open the shell in the default browser on start.
    pub open_browser: bool,
    /// Server ids shown as mirror cards in the cluster view.
    pub cluster_members: Vec<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:9747".to_string(),
            open_browser: true,
            cluster_members: vec!["server1".to_string(), "server2".to_string()],
        }
    }
}

// ---------------------------------------------------------------------------
// [session]
// ---------------------------------------------------------------------------

/// Identity shown in the shell. The role only hides controls; the backend
/// is responsible for enforcing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub username: String,
    pub role: Role,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            username: "Admin".to_string(),
            role: Role::Admin,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Event log settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether poll and command events are appended to the log.
    pub enabled: bool,
    /// Path to the JSONL event log. `~` is expanded to the home directory.
    pub path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "~/.infractl/events.jsonl".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Annotated default file
// ---------------------------------------------------------------------------

impl InfraConfig {
    /// The commented config written by `infractl config init`.
    pub fn default_toml() -> &'static str {
        DEFAULT_TOML
    }
}

const DEFAULT_TOML: &str = r#"# infractl configuration
#
# Layers (later wins): built-in defaults, ~/.infractl/config.toml,
# ./.infractl.toml, INFRACTL_* environment variables.

[backend]
# InfraControl server base URL
url = "http://127.0.0.1:5000"
# Per-request timeout in milliseconds
timeout_ms = 10000

[dashboard]
# Address for `infractl serve`
listen = "127.0.0.1:9747"
open_browser = true
# Servers shown as mirror cards in the cluster view
cluster_members = ["server1", "server2"]

[session]
username = "Admin"
# "Admin" or "Viewer" (viewers get no add/rename/delete controls)
role = "Admin"

[logging]
enabled = true
path = "~/.infractl/events.jsonl"
"#;
