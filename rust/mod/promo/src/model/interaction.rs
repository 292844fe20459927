use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// InteractionKind
// ---------------------------------------------------------------------------

/// What a user did to a promotion.
///
/// `favorite` and `like` toggle: repeating one undoes it. `comment` and
/// `create` are append-only: every occurrence is a separate record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Favorite,
    Like,
    Comment,
    Create,
}

impl InteractionKind {
    pub const ALL: [InteractionKind; 4] = [
        InteractionKind::Favorite,
        InteractionKind::Like,
        InteractionKind::Comment,
        InteractionKind::Create,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Favorite => "favorite",
            Self::Like => "like",
            Self::Comment => "comment",
            Self::Create => "create",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "favorite" => Some(Self::Favorite),
            "like" => Some(Self::Like),
            "comment" => Some(Self::Comment),
            "create" => Some(Self::Create),
            _ => None,
        }
    }

    /// Whether a repeat of this kind undoes the previous one.
    pub fn is_toggleable(&self) -> bool {
        matches!(self, Self::Favorite | Self::Like)
    }
}

impl std::fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PromotionInteraction
// ---------------------------------------------------------------------------

/// A single live reaction to a promotion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionInteraction {
    /// Encoded `InteractionKey`.
    pub id: String,
    pub promotion_id: String,
    /// Owner of the promotion at the time of the reaction.
    pub owner_user_id: String,
    /// The user who reacted.
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(rename = "interactionType")]
    pub kind: InteractionKind,
    pub interaction_date: DateTime<Utc>,
}

/// An incoming reaction, as received from a caller. Fields are raw strings so
/// that validation can report exactly what is wrong.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactRequest {
    pub user_id: String,
    pub owner_user_id: String,
    pub promotion_id: String,
    #[serde(rename = "interactionType")]
    pub kind: String,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Which way a reaction moved the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionAction {
    /// A new interaction was stored and points were awarded.
    Created,
    /// A repeated toggle removed the interaction and reversed its points.
    Removed,
}

/// Result of a successful reaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub action: ReactionAction,
    /// The stored interaction (`Created`) or the one that was deleted (`Removed`).
    pub interaction: PromotionInteraction,
    /// The ledger entry that was appended.
    pub score: super::UserScore,
    /// The promotion owner after the update.
    pub owner: super::User,
}
