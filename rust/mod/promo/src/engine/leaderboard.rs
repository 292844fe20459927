use chrono::{DateTime, Duration, Utc};
use promo_core::ServiceError;

/// Window and size bounds for leaderboard queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaderboardLimits {
    pub window_days: i64,
    pub default_size: usize,
    pub max_size: usize,
    pub max_window_days: i64,
}

impl LeaderboardLimits {
    pub fn new(
        window_days: i64,
        default_size: usize,
        max_size: usize,
        max_window_days: i64,
    ) -> Result<Self, ServiceError> {
        if window_days <= 0 || max_window_days < window_days {
            return Err(ServiceError::Configuration(format!(
                "leaderboard window must be within 1..={max_window_days} days, got {window_days}"
            )));
        }
        if default_size == 0 || max_size < default_size {
            return Err(ServiceError::Configuration(format!(
                "leaderboard size must be within 1..={max_size}, got {default_size}"
            )));
        }
        Ok(Self {
            window_days,
            default_size,
            max_size,
            max_window_days,
        })
    }

    /// Start of the requested window, defaulting to the configured one.
    pub fn window_start(
        &self,
        now: DateTime<Utc>,
        window_days: Option<i64>,
    ) -> Result<DateTime<Utc>, ServiceError> {
        let days = window_days.unwrap_or(self.window_days);
        if days <= 0 || days > self.max_window_days {
            return Err(ServiceError::Validation(format!(
                "window must be within 1..={} days, got {}",
                self.max_window_days, days
            )));
        }
        Ok(now - Duration::days(days))
    }

    /// Requested result size, defaulting to the configured one.
    pub fn size(&self, limit: Option<usize>) -> Result<usize, ServiceError> {
        let size = limit.unwrap_or(self.default_size);
        if size == 0 || size > self.max_size {
            return Err(ServiceError::Validation(format!(
                "limit must be within 1..={}, got {}",
                self.max_size, size
            )));
        }
        Ok(size)
    }
}

/// Top `limit` users by windowed points.
///
/// Every user in `totals` is eligible, including net-zero or negative sums.
/// The sort is stable, so ties keep the order in which users first appear.
pub fn rank(mut totals: Vec<(String, i64)>, limit: usize) -> Vec<(String, i64)> {
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals.truncate(limit);
    totals
}
