//! Trailing-window score sums.
//!
//! The tier classifier and the leaderboard only need per-user sums over a
//! window. `LedgerScan` computes them by scanning the ledger on every call;
//! an indexed implementation can replace it behind the same trait.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use promo_core::ServiceError;

use crate::repository::PromoRepository;

pub trait ScoreWindow: Send + Sync {
    /// Sum of a user's ledger entries with `score_date >= since`.
    fn user_points_since(&self, user_id: &str, since: DateTime<Utc>) -> Result<i64, ServiceError>;

    /// Per-user sums of entries with `score_date >= since`, in the order each
    /// user first appears in the ledger.
    fn totals_since(&self, since: DateTime<Utc>) -> Result<Vec<(String, i64)>, ServiceError>;
}

/// Full-scan window over the repository's ledger.
pub struct LedgerScan {
    repo: Arc<dyn PromoRepository>,
}

impl LedgerScan {
    pub fn new(repo: Arc<dyn PromoRepository>) -> Self {
        Self { repo }
    }
}

impl ScoreWindow for LedgerScan {
    fn user_points_since(&self, user_id: &str, since: DateTime<Utc>) -> Result<i64, ServiceError> {
        let entries = self.repo.score_entries_for_user(user_id, since)?;
        Ok(entries.iter().map(|e| e.points).sum())
    }

    fn totals_since(&self, since: DateTime<Utc>) -> Result<Vec<(String, i64)>, ServiceError> {
        let entries = self.repo.score_entries_since(since)?;

        let mut order: Vec<(String, i64)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for entry in entries {
            match index.get(&entry.user_id) {
                Some(&i) => order[i].1 += entry.points,
                None => {
                    index.insert(entry.user_id.clone(), order.len());
                    order.push((entry.user_id, entry.points));
                }
            }
        }
        Ok(order)
    }
}
