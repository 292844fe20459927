use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One append-only ledger entry. Reversals are new entries with negated
/// points; entries are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserScore {
    /// Time-derived id (zero-padded Unix nanoseconds).
    pub id: String,
    pub user_id: String,
    pub points: i64,
    pub score_date: DateTime<Utc>,
}

impl UserScore {
    /// The same entry with its points negated.
    pub fn negated(mut self) -> Self {
        self.points = -self.points;
        self
    }
}

/// One row of a leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// 1-based position.
    pub rank: usize,
    /// Points earned inside the window (not the all-time total).
    pub score: i64,
    pub user: super::User,
}
