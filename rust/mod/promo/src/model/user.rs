use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user. `total_score`, `level` and `elo` are a cache of the
/// score ledger and are only written by the scoring engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier (UUIDv4, no dashes).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Email address, stored lowercase.
    pub email: String,

    /// Profile picture URL, set once the upload has been stored elsewhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture_url: Option<String>,

    /// Sum of every ledger entry for this user.
    #[serde(default)]
    pub total_score: i64,

    /// Current level, always >= 1.
    #[serde(default = "first_level")]
    pub level: u32,

    /// Current tier label.
    #[serde(default)]
    pub elo: String,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub picture_url: Option<String>,
}

fn first_level() -> u32 {
    1
}
