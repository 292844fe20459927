//! Scoring and leaderboard settings.
//!
//! `PromoSettings` is the raw, serde-friendly form read from the `[scoring]`
//! and `[leaderboard]` sections of the server config. `validate()` turns it
//! into an `EngineConfig` once at startup; the engine only sees typed values.

use promo_core::ServiceError;
use serde::{Deserialize, Serialize};

use crate::engine::{
    LeaderboardLimits, LevelCurve, ScoreWeights, Scorer, TierClassifier, TierLadder, TierThreshold,
};
use crate::model::InteractionKind;

/// `[scoring]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSettings {
    pub weights: ScoreWeights,
    pub minimal_points_level: i64,
    pub growth_rate: f64,
    /// Trailing window used for tier classification.
    pub tier_window_days: i64,
    pub allow_self_reaction: bool,
    /// Label for users below every tier threshold.
    pub default_tier: String,
    pub tiers: Vec<TierThreshold>,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            minimal_points_level: 10,
            growth_rate: 1.30,
            tier_window_days: 7,
            allow_self_reaction: false,
            default_tier: "none".to_string(),
            tiers: vec![
                TierThreshold::new("bronze", 25),
                TierThreshold::new("silver", 100),
            ],
        }
    }
}

/// `[leaderboard]` section.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardSettings {
    pub window_days: i64,
    pub default_size: usize,
    pub max_size: usize,
    pub max_window_days: i64,
}

impl Default for LeaderboardSettings {
    fn default() -> Self {
        Self {
            window_days: 7,
            default_size: 10,
            max_size: 100,
            max_window_days: 90,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromoSettings {
    pub scoring: ScoringSettings,
    pub leaderboard: LeaderboardSettings,
}

impl PromoSettings {
    pub fn validate(&self) -> Result<EngineConfig, ServiceError> {
        let s = &self.scoring;

        for kind in InteractionKind::ALL {
            if s.weights.weight(kind) == 0 {
                return Err(ServiceError::Configuration(format!(
                    "scoring.weights.{kind} must be > 0"
                )));
            }
        }

        let curve = LevelCurve::new(s.minimal_points_level, s.growth_rate)?;
        let ladder = TierLadder::new(s.tiers.clone(), &s.default_tier)?;
        let tiers = TierClassifier::new(ladder, s.tier_window_days)?;

        let l = &self.leaderboard;
        let leaderboard =
            LeaderboardLimits::new(l.window_days, l.default_size, l.max_size, l.max_window_days)?;

        Ok(EngineConfig {
            scorer: Scorer::new(s.weights),
            curve,
            tiers,
            allow_self_reaction: s.allow_self_reaction,
            leaderboard,
        })
    }
}

/// Validated engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub scorer: Scorer,
    pub curve: LevelCurve,
    pub tiers: TierClassifier,
    pub allow_self_reaction: bool,
    pub leaderboard: LeaderboardLimits,
}

impl EngineConfig {
    /// Defaults, already validated.
    pub fn defaults() -> Result<Self, ServiceError> {
        PromoSettings::default().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = EngineConfig::defaults().unwrap();
        assert_eq!(config.scorer.weights().favorite, 5);
        assert_eq!(config.curve.points_required(1), 10);
        assert_eq!(config.tiers.ladder().classify(25), "bronze");
        assert_eq!(config.tiers.ladder().default_label(), "none");
        assert!(!config.allow_self_reaction);
        assert_eq!(config.leaderboard.default_size, 10);
    }

    #[test]
    fn parses_partial_toml() {
        let raw = r#"
            [scoring]
            growth_rate = 1.5
            allow_self_reaction = true

            [scoring.weights]
            like = 4

            [[scoring.tiers]]
            label = "gold"
            minimal_score = 500

            [leaderboard]
            default_size = 5
        "#;
        let settings: PromoSettings = toml::from_str(raw).unwrap();
        assert_eq!(settings.scoring.weights.like, 4);
        assert_eq!(settings.scoring.weights.favorite, 5);
        assert_eq!(settings.scoring.minimal_points_level, 10);
        assert_eq!(settings.scoring.tiers, vec![TierThreshold::new("gold", 500)]);
        assert_eq!(settings.leaderboard.default_size, 5);
        assert_eq!(settings.leaderboard.max_size, 100);

        let config = settings.validate().unwrap();
        assert!(config.allow_self_reaction);
        assert_eq!(config.tiers.ladder().classify(499), "none");
        assert_eq!(config.tiers.ladder().classify(500), "gold");
    }

    #[test]
    fn zero_weight_is_a_configuration_error() {
        let mut settings = PromoSettings::default();
        settings.scoring.weights.comment = 0;
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, ServiceError::Configuration(ref m) if m.contains("comment")));
    }

    #[test]
    fn bad_curve_is_a_configuration_error() {
        let mut settings = PromoSettings::default();
        settings.scoring.growth_rate = 1.0;
        assert!(matches!(settings.validate(), Err(ServiceError::Configuration(_))));

        let mut settings = PromoSettings::default();
        settings.scoring.minimal_points_level = 0;
        assert!(matches!(settings.validate(), Err(ServiceError::Configuration(_))));
    }

    #[test]
    fn bad_leaderboard_is_a_configuration_error() {
        let mut settings = PromoSettings::default();
        settings.leaderboard.max_size = 3;
        assert!(matches!(settings.validate(), Err(ServiceError::Configuration(_))));
    }
}
