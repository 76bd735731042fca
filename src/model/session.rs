use serde::{Deserialize, Serialize};

/// Request body for linking a remote account.
#[derive(Debug, Deserialize)]
pub struct LinkRequest {
    pub username: String,
    pub password: String,
    pub season: i32,
}

/// One league discovered in the user's remote directory.
#[derive(Debug, Clone, Serialize)]
pub struct LinkedLeague {
    pub remote_id: String,
    pub name: String,
    pub season: i32,
    pub franchise_id: Option<String>,
    pub host: Option<String>,
}

/// Result of a link attempt: the canonical login succeeded, and each
/// league host was tried best-effort.
#[derive(Debug, Serialize)]
pub struct LinkSummary {
    pub leagues: Vec<LinkedLeague>,
    pub hosts_linked: Vec<String>,
    /// Hosts where the scoped login failed; those leagues degrade to
    /// canonical-token access.
    pub hosts_failed: Vec<String>,
}
