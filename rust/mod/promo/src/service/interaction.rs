//! Reaction handling: the toggle/append pipeline that turns a request into
//! a ledger entry plus an updated owner.

use chrono::{DateTime, Utc};
use promo_core::ServiceError;
use tracing::{debug, info};

use crate::engine::InteractionKey;
use crate::model::{
    InteractionKind, PromotionInteraction, ReactRequest, Reaction, ReactionAction, User,
};
use crate::repository::{InteractionChange, InteractionWrite};
use crate::service::{PromoService, log_failure, require};

/// Where a reaction request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Origin {
    /// A caller reacting to someone's promotion.
    Caller,
    /// Promotion creation emitting its own `create` interaction.
    PromotionCreated,
}

impl PromoService {
    /// React to a promotion.
    ///
    /// A repeated `favorite` or `like` from the same user removes the earlier
    /// one and reverses its points. Comments always add a new record.
    pub fn react(&self, req: ReactRequest) -> Result<Reaction, ServiceError> {
        self.apply_reaction(&req, Origin::Caller)
            .inspect_err(|e| log_failure("react", e))
    }

    /// Get an interaction by its encoded key.
    pub fn get_interaction(&self, id: &str) -> Result<PromotionInteraction, ServiceError> {
        self.repo
            .get_interaction(id)
            .and_then(|found| {
                found.ok_or_else(|| ServiceError::NotFound(format!("interaction '{id}' not found")))
            })
            .inspect_err(|e| log_failure("get_interaction", e))
    }

    /// Recompute a user's total score, level and tier from the ledger.
    pub fn rebuild_user_stats(&self, user_id: &str) -> Result<User, ServiceError> {
        self.rebuild(user_id)
            .inspect_err(|e| log_failure("rebuild_user_stats", e))
    }

    pub(crate) fn apply_reaction(
        &self,
        req: &ReactRequest,
        origin: Origin,
    ) -> Result<Reaction, ServiceError> {
        let kind = validate(req, origin, self.config.allow_self_reaction)?;

        let promotion = self.repo.get_promotion(&req.promotion_id)?.ok_or_else(|| {
            ServiceError::NotFound(format!("promotion '{}' not found", req.promotion_id))
        })?;
        if promotion.user_id != req.owner_user_id {
            return Err(ServiceError::Validation(format!(
                "promotion '{}' is not owned by '{}'",
                promotion.id, req.owner_user_id
            )));
        }
        let (mut owner, owner_revision) = self
            .repo
            .get_user_revision(&promotion.user_id)?
            .ok_or_else(|| ServiceError::NotFound(format!("user '{}' not found", promotion.user_id)))?;

        let now = self.clock.now();
        let key = InteractionKey::resolve(&req.user_id, &owner.id, &promotion.id, kind, now);
        let id = key.encode();
        let entry = self.config.scorer.score_for(kind, &owner.id, now)?;

        let existing = if key.is_toggleable() {
            self.repo.get_interaction_revision(&id)?
        } else {
            None
        };

        let (action, entry, change) = match existing {
            Some((interaction, revision)) => (
                ReactionAction::Removed,
                entry.negated(),
                InteractionChange::Remove {
                    interaction,
                    revision,
                },
            ),
            None => (
                ReactionAction::Created,
                entry,
                InteractionChange::Create(PromotionInteraction {
                    id,
                    promotion_id: promotion.id.clone(),
                    owner_user_id: owner.id.clone(),
                    user_id: req.user_id.clone(),
                    comment: comment_for(kind, req),
                    kind,
                    interaction_date: now,
                }),
            ),
        };

        owner.total_score = owner.total_score.saturating_add(entry.points);
        owner.level = self.config.curve.level_for_total(owner.total_score);
        owner.elo = self
            .config
            .tiers
            .tier_for(self.window.as_ref(), &owner.id, entry.points, now)?;

        let write = InteractionWrite {
            owner,
            owner_revision,
            score: entry,
            change,
        };
        self.repo.apply_interaction(&write)?;

        let InteractionWrite {
            owner,
            score,
            change,
            ..
        } = write;
        let interaction = match change {
            InteractionChange::Create(interaction) => interaction,
            InteractionChange::Remove { interaction, .. } => interaction,
        };

        info!(
            interaction = %interaction.id,
            owner = %owner.id,
            points = score.points,
            total = owner.total_score,
            level = owner.level,
            elo = %owner.elo,
            "reaction {:?}",
            action
        );

        Ok(Reaction {
            action,
            interaction,
            score,
            owner,
        })
    }

    fn rebuild(&self, user_id: &str) -> Result<User, ServiceError> {
        let (mut user, revision) = self
            .repo
            .get_user_revision(user_id)?
            .ok_or_else(|| ServiceError::NotFound(format!("user '{user_id}' not found")))?;

        let ledger = self.repo.score_entries_for_user(user_id, DateTime::<Utc>::MIN_UTC)?;
        let total = ledger.iter().fold(0i64, |acc, e| acc.saturating_add(e.points));
        let now = self.clock.now();

        let before = (user.total_score, user.level, user.elo.clone());
        user.total_score = total;
        user.level = self.config.curve.level_for_total(total);
        user.elo = self.config.tiers.tier_for(self.window.as_ref(), user_id, 0, now)?;

        if before != (user.total_score, user.level, user.elo.clone()) {
            self.repo.replace_user(&user, &revision)?;
            info!(
                user = %user.id,
                from_total = before.0,
                total = user.total_score,
                level = user.level,
                elo = %user.elo,
                "user stats rebuilt from ledger"
            );
        } else {
            debug!(user = %user.id, entries = ledger.len(), "user stats already consistent");
        }
        Ok(user)
    }
}

/// Check a request before anything is read or written.
fn validate(
    req: &ReactRequest,
    origin: Origin,
    allow_self_reaction: bool,
) -> Result<InteractionKind, ServiceError> {
    require(&req.user_id, "userId")?;
    require(&req.owner_user_id, "ownerUserId")?;
    require(&req.promotion_id, "promotionId")?;
    require(&req.kind, "interactionType")?;

    let kind = InteractionKind::from_str(&req.kind).ok_or_else(|| {
        ServiceError::Validation(format!("unknown interaction type '{}'", req.kind))
    })?;

    let own_promotion = req.user_id == req.owner_user_id;
    match kind {
        InteractionKind::Create => {
            if origin != Origin::PromotionCreated {
                return Err(ServiceError::Validation(
                    "create interactions are recorded when a promotion is created".into(),
                ));
            }
            if !own_promotion {
                return Err(ServiceError::Validation(
                    "create interactions must come from the promotion owner".into(),
                ));
            }
        }
        _ if own_promotion && !allow_self_reaction => {
            return Err(ServiceError::Validation(
                "users cannot react to their own promotion".into(),
            ));
        }
        _ => {}
    }

    if kind == InteractionKind::Comment
        && req.comment.as_deref().is_none_or(|c| c.trim().is_empty())
    {
        return Err(ServiceError::Validation("comment text is empty".into()));
    }

    Ok(kind)
}

fn comment_for(kind: InteractionKind, req: &ReactRequest) -> Option<String> {
    if kind == InteractionKind::Comment {
        req.comment.clone()
    } else {
        None
    }
}
