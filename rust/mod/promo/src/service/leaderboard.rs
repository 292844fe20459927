use promo_core::ServiceError;
use tracing::{debug, warn};

use crate::engine::rank;
use crate::model::LeaderboardEntry;
use crate::service::{PromoService, log_failure};

impl PromoService {
    /// Top users by points earned in the trailing window.
    ///
    /// `window_days` and `limit` fall back to the configured defaults and are
    /// bounded by the configured maximums. Each entry's `score` is the
    /// windowed sum, not the user's lifetime total.
    pub fn top(
        &self,
        window_days: Option<i64>,
        limit: Option<usize>,
    ) -> Result<Vec<LeaderboardEntry>, ServiceError> {
        self.leaderboard(window_days, limit)
            .inspect_err(|e| log_failure("top", e))
    }

    fn leaderboard(
        &self,
        window_days: Option<i64>,
        limit: Option<usize>,
    ) -> Result<Vec<LeaderboardEntry>, ServiceError> {
        let limits = &self.config.leaderboard;
        let size = limits.size(limit)?;
        let since = limits.window_start(self.clock.now(), window_days)?;

        let totals = self.window.totals_since(since)?;
        let candidates = totals.len();

        let mut entries = Vec::with_capacity(size);
        for (user_id, score) in rank(totals, usize::MAX) {
            if entries.len() == size {
                break;
            }
            match self.repo.get_user(&user_id)? {
                Some(user) => entries.push(LeaderboardEntry {
                    rank: entries.len() + 1,
                    score,
                    user,
                }),
                None => warn!(user = %user_id, score, "ledger user has no record, skipped"),
            }
        }

        debug!(%since, candidates, returned = entries.len(), "leaderboard");
        Ok(entries)
    }
}
