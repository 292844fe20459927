//! Pure scoring logic: identity, points, levels, tiers and ranking.
//!
//! Nothing here writes to storage. The only read is through `ScoreWindow`.

pub mod identity;
pub mod leaderboard;
pub mod leveling;
pub mod scoring;
pub mod tier;
pub mod window;

pub use identity::{InteractionKey, KeyMode};
pub use leaderboard::{LeaderboardLimits, rank};
pub use leveling::LevelCurve;
pub use scoring::{ScoreWeights, Scorer};
pub use tier::{TierClassifier, TierLadder, TierThreshold};
pub use window::{LedgerScan, ScoreWindow};
