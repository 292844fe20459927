use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use promo_core::ServiceError;
use serde::{Deserialize, Serialize};

use super::window::ScoreWindow;

/// One rung of the tier ladder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierThreshold {
    pub label: String,
    pub minimal_score: i64,
}

impl TierThreshold {
    pub fn new(label: &str, minimal_score: i64) -> Self {
        Self {
            label: label.to_string(),
            minimal_score,
        }
    }
}

/// Ordered tier thresholds, highest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierLadder {
    tiers: Vec<TierThreshold>,
    default_label: String,
}

impl TierLadder {
    /// Validate and sort the thresholds. Labels must be non-blank and unique,
    /// and no two tiers may share a threshold.
    pub fn new(mut tiers: Vec<TierThreshold>, default_label: &str) -> Result<Self, ServiceError> {
        if default_label.trim().is_empty() {
            return Err(ServiceError::Configuration("default tier label is empty".into()));
        }

        let mut labels = HashSet::new();
        let mut scores = HashSet::new();
        labels.insert(default_label.to_string());
        for tier in &tiers {
            if tier.label.trim().is_empty() {
                return Err(ServiceError::Configuration("tier label is empty".into()));
            }
            if !labels.insert(tier.label.clone()) {
                return Err(ServiceError::Configuration(format!(
                    "tier label '{}' is defined twice",
                    tier.label
                )));
            }
            if !scores.insert(tier.minimal_score) {
                return Err(ServiceError::Configuration(format!(
                    "two tiers share minimal score {}",
                    tier.minimal_score
                )));
            }
        }

        tiers.sort_by(|a, b| b.minimal_score.cmp(&a.minimal_score));
        Ok(Self {
            tiers,
            default_label: default_label.to_string(),
        })
    }

    /// Highest tier whose threshold is <= `points`, else the default label.
    pub fn classify(&self, points: i64) -> &str {
        self.tiers
            .iter()
            .find(|t| t.minimal_score <= points)
            .map(|t| t.label.as_str())
            .unwrap_or(&self.default_label)
    }

    pub fn default_label(&self) -> &str {
        &self.default_label
    }

    /// Thresholds, highest first.
    pub fn tiers(&self) -> &[TierThreshold] {
        &self.tiers
    }
}

/// Assigns a tier from points earned in a trailing window.
#[derive(Debug, Clone)]
pub struct TierClassifier {
    ladder: TierLadder,
    window: Duration,
}

impl TierClassifier {
    pub fn new(ladder: TierLadder, window_days: i64) -> Result<Self, ServiceError> {
        if window_days <= 0 {
            return Err(ServiceError::Configuration(format!(
                "tier window must be at least one day, got {window_days}"
            )));
        }
        Ok(Self {
            ladder,
            window: Duration::days(window_days),
        })
    }

    pub fn ladder(&self) -> &TierLadder {
        &self.ladder
    }

    pub fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.window
    }

    /// Tier the user holds once `delta` (not yet in the ledger) is applied.
    pub fn tier_for(
        &self,
        window: &dyn ScoreWindow,
        user_id: &str,
        delta: i64,
        now: DateTime<Utc>,
    ) -> Result<String, ServiceError> {
        let in_window = window.user_points_since(user_id, self.window_start(now))?;
        Ok(self.ladder.classify(delta + in_window).to_string())
    }
}
