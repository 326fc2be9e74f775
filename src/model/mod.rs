//! Wire types for the InfraControl status API.
//!
//! Every field is optional on the wire. Missing collections stay `None` so
//! renderers can tell "absent" (render nothing) from "empty" (render the
//! empty state). Missing or `null` scalar fields fall back to their defaults.

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One full `GET /api/status` response.
///
/// Rebuilt wholesale on every poll tick; the client never merges snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusSnapshot {
    pub servers: Option<Vec<Server>>,
    pub cluster: Option<Cluster>,
    pub websites: Option<Vec<Website>>,
    pub alerts: Option<Vec<Alert>>,
    pub users: Option<Vec<User>>,
}

/// Reachability of a server or website as reported by the backend.
///
/// Anything other than `"online"` is treated as offline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Online,
    #[default]
    #[serde(other)]
    Offline,
}

impl LinkStatus {
    pub fn is_online(self) -> bool {
        self == Self::Online
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A monitored server node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Server {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub hostname: String,
    #[serde(deserialize_with = "null_default")]
    pub ip: String,
    #[serde(deserialize_with = "null_default")]
    pub status: LinkStatus,
    #[serde(deserialize_with = "display_string")]
    pub uptime: String,
    /// Display string such as `"42%"`.
    #[serde(deserialize_with = "display_string")]
    pub cpu: String,
    #[serde(deserialize_with = "display_string")]
    pub ram: String,
    #[serde(deserialize_with = "display_string")]
    pub disk: String,
    /// Console URL for the server's management interface.
    #[serde(deserialize_with = "null_default")]
    pub url: String,
}

/// High-availability cluster summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cluster {
    #[serde(deserialize_with = "null_default")]
    pub health_status: String,
    #[serde(deserialize_with = "null_default")]
    pub quorum: bool,
    #[serde(deserialize_with = "null_default")]
    pub cluster_ip: String,
    #[serde(deserialize_with = "display_string")]
    pub shared_load: String,
    /// Id of the server currently designated active.
    #[serde(deserialize_with = "null_default")]
    pub primary_node: String,
    #[serde(deserialize_with = "null_default")]
    pub services: ClusterServices,
}

/// State strings of the cluster stack daemons (e.g. `"active/enabled"`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterServices {
    #[serde(deserialize_with = "null_default")]
    pub corosync: String,
    #[serde(deserialize_with = "null_default")]
    pub pacemaker: String,
    #[serde(deserialize_with = "null_default")]
    pub pcsd: String,
}

/// A monitored website / domain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Website {
    #[serde(deserialize_with = "null_default")]
    pub domain: String,
    #[serde(deserialize_with = "null_default")]
    pub status: LinkStatus,
    /// Round-trip latency in milliseconds, `None` when unreachable.
    pub latency: Option<f64>,
    #[serde(deserialize_with = "null_default")]
    pub connections: u64,
    #[serde(deserialize_with = "null_default")]
    pub rpm: u64,
}

/// A backend-raised alert. The message text is its identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Alert {
    #[serde(deserialize_with = "null_default")]
    pub msg: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

impl Alert {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            kind: None,
            level: None,
        }
    }
}

/// A dashboard user as listed by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    #[serde(deserialize_with = "null_default")]
    pub username: String,
    #[serde(deserialize_with = "null_default")]
    pub role: String,
}

/// Role of the local dashboard session. `Viewer` sessions get no admin
/// controls; enforcement itself is the backend's job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[default]
    #[serde(alias = "admin")]
    Admin,
    #[serde(alias = "viewer")]
    Viewer,
}

impl Role {
    pub fn parse(val: &str) -> Option<Self> {
        match val.to_ascii_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "viewer" => Some(Self::Viewer),
            _ => None,
        }
    }

    pub fn is_admin(self) -> bool {
        self == Self::Admin
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "Admin"),
            Self::Viewer => write!(f, "Viewer"),
        }
    }
}

// ---------------------------------------------------------------------------
// Lenient scalars
// ---------------------------------------------------------------------------

/// Accept a string, a number, or null where the dashboard only needs text.
fn display_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Treat an explicit `null` like a missing key.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
