//! Data-access contract the engine is written against.
//!
//! The engine never touches the KV store directly; `KvRepository`
//! (see `store_impls`) is the production implementation.

use chrono::{DateTime, Utc};
use promo_core::ServiceError;

use crate::model::{Category, Promotion, PromotionInteraction, User, UserScore};

/// Opaque version token for optimistic concurrency. Obtained from a
/// `*_revision` read and handed back to a guarded write, which fails with
/// `ServiceError::Conflict` if the record changed in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision(Vec<u8>);

impl Revision {
    pub fn new(token: Vec<u8>) -> Self {
        Self(token)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// What happens to the interaction record in an apply.
#[derive(Debug, Clone)]
pub enum InteractionChange {
    /// Store a new interaction. Its id must not exist yet.
    Create(PromotionInteraction),
    /// Delete the interaction seen at `revision`.
    Remove {
        interaction: PromotionInteraction,
        revision: Revision,
    },
}

/// Everything one reaction writes. Implementations must apply it atomically:
/// either every record lands, or none does.
#[derive(Debug, Clone)]
pub struct InteractionWrite {
    /// Owner with updated total score, level and tier.
    pub owner: User,
    /// Revision of the owner record the update was computed from.
    pub owner_revision: Revision,
    /// Ledger entry to append.
    pub score: UserScore,
    pub change: InteractionChange,
}

pub trait PromoRepository: Send + Sync {
    // ── Promotions ──

    fn get_promotion(&self, id: &str) -> Result<Option<Promotion>, ServiceError>;
    fn put_promotion(&self, promotion: &Promotion) -> Result<(), ServiceError>;
    fn list_promotions(&self) -> Result<Vec<Promotion>, ServiceError>;

    // ── Users ──

    fn get_user_revision(&self, id: &str) -> Result<Option<(User, Revision)>, ServiceError>;

    fn get_user(&self, id: &str) -> Result<Option<User>, ServiceError> {
        Ok(self.get_user_revision(id)?.map(|(user, _)| user))
    }

    /// Insert a new user. Fails if the id is taken.
    fn insert_user(&self, user: &User) -> Result<(), ServiceError>;

    fn put_user(&self, user: &User) -> Result<(), ServiceError>;

    /// Replace a user only if it is still at `revision`.
    fn replace_user(&self, user: &User, revision: &Revision) -> Result<(), ServiceError>;

    // ── Interactions ──

    fn get_interaction_revision(
        &self,
        id: &str,
    ) -> Result<Option<(PromotionInteraction, Revision)>, ServiceError>;

    fn get_interaction(&self, id: &str) -> Result<Option<PromotionInteraction>, ServiceError> {
        Ok(self.get_interaction_revision(id)?.map(|(i, _)| i))
    }

    fn put_interaction(&self, interaction: &PromotionInteraction) -> Result<(), ServiceError>;
    fn delete_interaction(&self, id: &str) -> Result<(), ServiceError>;

    // ── Score ledger ──

    fn put_score_entry(&self, score: &UserScore) -> Result<(), ServiceError>;

    /// Entries for one user with `score_date >= since`, oldest first.
    fn score_entries_for_user(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<UserScore>, ServiceError>;

    /// All entries with `score_date >= since`, oldest first.
    fn score_entries_since(&self, since: DateTime<Utc>) -> Result<Vec<UserScore>, ServiceError>;

    // ── Categories ──

    fn list_categories(&self) -> Result<Vec<Category>, ServiceError>;
    fn put_category(&self, category: &Category) -> Result<(), ServiceError>;

    // ── Reactions ──

    /// Apply the owner update, ledger append and interaction change as one unit.
    fn apply_interaction(&self, write: &InteractionWrite) -> Result<(), ServiceError>;
}
