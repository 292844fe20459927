use chrono::{DateTime, Utc};
use promo_core::{ServiceError, time_id};
use serde::{Deserialize, Serialize};

use crate::model::{InteractionKind, UserScore};

/// Points awarded to a promotion owner per interaction kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub favorite: u32,
    pub like: u32,
    pub comment: u32,
    pub create: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            favorite: 5,
            like: 2,
            comment: 3,
            create: 10,
        }
    }
}

impl ScoreWeights {
    pub fn weight(&self, kind: InteractionKind) -> u32 {
        match kind {
            InteractionKind::Favorite => self.favorite,
            InteractionKind::Like => self.like,
            InteractionKind::Comment => self.comment,
            InteractionKind::Create => self.create,
        }
    }
}

/// Turns an interaction kind into a ledger-entry candidate.
#[derive(Debug, Clone)]
pub struct Scorer {
    weights: ScoreWeights,
}

impl Scorer {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Ledger entry crediting `owner_id` with the weight of `kind`.
    ///
    /// A zero weight is a misconfiguration, not a caller error.
    pub fn score_for(
        &self,
        kind: InteractionKind,
        owner_id: &str,
        at: DateTime<Utc>,
    ) -> Result<UserScore, ServiceError> {
        let points = self.weights.weight(kind);
        if points == 0 {
            return Err(ServiceError::Configuration(format!(
                "no positive score weight configured for '{kind}'"
            )));
        }
        Ok(UserScore {
            id: time_id(at),
            user_id: owner_id.to_string(),
            points: i64::from(points),
            score_date: at,
        })
    }
}
