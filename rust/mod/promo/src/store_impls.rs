//! Record impls for the promo models and the KV-backed repository.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use promo_core::ServiceError;
use promo_kv::{BatchOp, KVStore};
use promo_store::{KvOps, Record, Versioned};

use crate::model::*;
use crate::repository::{InteractionChange, InteractionWrite, PromoRepository, Revision};

// ── Records ──

impl Record for User {
    const KIND: &'static str = "user";

    fn kv_prefix() -> &'static str {
        "promo:user:"
    }

    fn key_value(&self) -> String {
        self.id.clone()
    }
}

impl Record for Promotion {
    const KIND: &'static str = "promotion";

    fn kv_prefix() -> &'static str {
        "promo:promotion:"
    }

    fn key_value(&self) -> String {
        self.id.clone()
    }
}

impl Record for PromotionInteraction {
    const KIND: &'static str = "interaction";

    fn kv_prefix() -> &'static str {
        "promo:interaction:"
    }

    fn key_value(&self) -> String {
        self.id.clone()
    }
}

impl Record for UserScore {
    const KIND: &'static str = "score entry";

    // Ids are zero-padded nanoseconds, so a prefix scan is chronological.
    fn kv_prefix() -> &'static str {
        "promo:score:"
    }

    fn key_value(&self) -> String {
        self.id.clone()
    }
}

impl Record for Category {
    const KIND: &'static str = "category";

    fn kv_prefix() -> &'static str {
        "promo:category:"
    }

    fn key_value(&self) -> String {
        self.name.clone()
    }
}

// ── Repository ──

/// `PromoRepository` over a `KVStore`.
pub struct KvRepository {
    users: KvOps<User>,
    promotions: KvOps<Promotion>,
    interactions: KvOps<PromotionInteraction>,
    scores: KvOps<UserScore>,
    categories: KvOps<Category>,
}

impl KvRepository {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self {
            users: KvOps::new(Arc::clone(&kv)),
            promotions: KvOps::new(Arc::clone(&kv)),
            interactions: KvOps::new(Arc::clone(&kv)),
            scores: KvOps::new(Arc::clone(&kv)),
            categories: KvOps::new(kv),
        }
    }
}

fn revision_of<T>(versioned: Versioned<T>) -> (T, Revision) {
    (versioned.record, Revision::new(versioned.raw))
}

fn guard<T: Record>(id: &str, revision: Option<&Revision>) -> BatchOp {
    KvOps::<T>::expect_op(id, revision.map(Revision::as_bytes))
}

impl PromoRepository for KvRepository {
    fn get_promotion(&self, id: &str) -> Result<Option<Promotion>, ServiceError> {
        self.promotions.get(id)
    }

    fn put_promotion(&self, promotion: &Promotion) -> Result<(), ServiceError> {
        self.promotions.save(promotion)
    }

    fn list_promotions(&self) -> Result<Vec<Promotion>, ServiceError> {
        self.promotions.list()
    }

    fn get_user_revision(&self, id: &str) -> Result<Option<(User, Revision)>, ServiceError> {
        Ok(self.users.get_versioned(id)?.map(revision_of))
    }

    fn insert_user(&self, user: &User) -> Result<(), ServiceError> {
        self.users.save_new(user)
    }

    fn put_user(&self, user: &User) -> Result<(), ServiceError> {
        self.users.save(user)
    }

    fn replace_user(&self, user: &User, revision: &Revision) -> Result<(), ServiceError> {
        self.users.write_batch(&[
            guard::<User>(&user.id, Some(revision)),
            KvOps::<User>::put_op(user)?,
        ])
    }

    fn get_interaction_revision(
        &self,
        id: &str,
    ) -> Result<Option<(PromotionInteraction, Revision)>, ServiceError> {
        Ok(self.interactions.get_versioned(id)?.map(revision_of))
    }

    fn put_interaction(&self, interaction: &PromotionInteraction) -> Result<(), ServiceError> {
        self.interactions.save(interaction)
    }

    fn delete_interaction(&self, id: &str) -> Result<(), ServiceError> {
        self.interactions.delete(id)
    }

    /// Append a ledger entry. A taken id means two writers picked the same
    /// instant, which surfaces as `Conflict`.
    fn put_score_entry(&self, score: &UserScore) -> Result<(), ServiceError> {
        self.scores.write_batch(&[
            guard::<UserScore>(&score.id, None),
            KvOps::<UserScore>::put_op(score)?,
        ])
    }

    fn score_entries_for_user(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<UserScore>, ServiceError> {
        let mut entries = self.score_entries_since(since)?;
        entries.retain(|e| e.user_id == user_id);
        Ok(entries)
    }

    fn score_entries_since(&self, since: DateTime<Utc>) -> Result<Vec<UserScore>, ServiceError> {
        let mut entries = self.scores.list()?;
        entries.retain(|e| e.score_date >= since);
        Ok(entries)
    }

    fn list_categories(&self) -> Result<Vec<Category>, ServiceError> {
        self.categories.list()
    }

    fn put_category(&self, category: &Category) -> Result<(), ServiceError> {
        self.categories.save(category)
    }

    fn apply_interaction(&self, write: &InteractionWrite) -> Result<(), ServiceError> {
        let mut ops = vec![
            guard::<User>(&write.owner.id, Some(&write.owner_revision)),
            guard::<UserScore>(&write.score.id, None),
        ];

        match &write.change {
            InteractionChange::Create(interaction) => {
                ops.push(guard::<PromotionInteraction>(&interaction.id, None));
                ops.push(KvOps::<PromotionInteraction>::put_op(interaction)?);
            }
            InteractionChange::Remove {
                interaction,
                revision,
            } => {
                ops.push(guard::<PromotionInteraction>(&interaction.id, Some(revision)));
                ops.push(KvOps::<PromotionInteraction>::delete_op(&interaction.id));
            }
        }

        ops.push(KvOps::<User>::put_op(&write.owner)?);
        ops.push(KvOps::<UserScore>::put_op(&write.score)?);

        self.users.write_batch(&ops)
    }
}
