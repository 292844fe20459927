//! End-to-end scoring behaviour over a real redb store.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Duration, Utc};
use promo::model::*;
use promo::repository::{InteractionWrite, Revision};
use promo::{KvRepository, PromoRepository, PromoService, PromoSettings};
use promo_core::{Clock, ManualClock, ServiceError, time_id};
use promo_kv::{KVStore, RedbStore};

// ── Harness ──

/// Delegates to a `KvRepository` and counts every call.
struct Counting {
    inner: KvRepository,
    calls: AtomicUsize,
}

impl Counting {
    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PromoRepository for Counting {
    fn get_promotion(&self, id: &str) -> Result<Option<Promotion>, ServiceError> {
        self.tick();
        self.inner.get_promotion(id)
    }
    fn put_promotion(&self, p: &Promotion) -> Result<(), ServiceError> {
        self.tick();
        self.inner.put_promotion(p)
    }
    fn list_promotions(&self) -> Result<Vec<Promotion>, ServiceError> {
        self.tick();
        self.inner.list_promotions()
    }
    fn get_user_revision(&self, id: &str) -> Result<Option<(User, Revision)>, ServiceError> {
        self.tick();
        self.inner.get_user_revision(id)
    }
    fn insert_user(&self, u: &User) -> Result<(), ServiceError> {
        self.tick();
        self.inner.insert_user(u)
    }
    fn put_user(&self, u: &User) -> Result<(), ServiceError> {
        self.tick();
        self.inner.put_user(u)
    }
    fn replace_user(&self, u: &User, r: &Revision) -> Result<(), ServiceError> {
        self.tick();
        self.inner.replace_user(u, r)
    }
    fn get_interaction_revision(
        &self,
        id: &str,
    ) -> Result<Option<(PromotionInteraction, Revision)>, ServiceError> {
        self.tick();
        self.inner.get_interaction_revision(id)
    }
    fn put_interaction(&self, i: &PromotionInteraction) -> Result<(), ServiceError> {
        self.tick();
        self.inner.put_interaction(i)
    }
    fn delete_interaction(&self, id: &str) -> Result<(), ServiceError> {
        self.tick();
        self.inner.delete_interaction(id)
    }
    fn put_score_entry(&self, s: &UserScore) -> Result<(), ServiceError> {
        self.tick();
        self.inner.put_score_entry(s)
    }
    fn score_entries_for_user(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<UserScore>, ServiceError> {
        self.tick();
        self.inner.score_entries_for_user(user_id, since)
    }
    fn score_entries_since(&self, since: DateTime<Utc>) -> Result<Vec<UserScore>, ServiceError> {
        self.tick();
        self.inner.score_entries_since(since)
    }
    fn list_categories(&self) -> Result<Vec<Category>, ServiceError> {
        self.tick();
        self.inner.list_categories()
    }
    fn put_category(&self, c: &Category) -> Result<(), ServiceError> {
        self.tick();
        self.inner.put_category(c)
    }
    fn apply_interaction(&self, w: &InteractionWrite) -> Result<(), ServiceError> {
        self.tick();
        self.inner.apply_interaction(w)
    }
}

struct Harness {
    svc: Arc<PromoService>,
    repo: Arc<Counting>,
    clock: Arc<ManualClock>,
    _dir: tempfile::TempDir,
}

fn start() -> DateTime<Utc> {
    DateTime::from_timestamp(1_704_067_200, 0).unwrap()
}

fn harness_with(settings: PromoSettings) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let kv: Arc<dyn KVStore> = Arc::new(RedbStore::open(&dir.path().join("promo.redb")).unwrap());
    let repo = Arc::new(Counting {
        inner: KvRepository::new(kv),
        calls: AtomicUsize::new(0),
    });
    let clock = Arc::new(ManualClock::at(start()));
    let svc = PromoService::new(
        repo.clone(),
        settings.validate().unwrap(),
        clock.clone() as Arc<dyn Clock>,
    );
    Harness {
        svc,
        repo,
        clock,
        _dir: dir,
    }
}

fn harness() -> Harness {
    harness_with(PromoSettings::default())
}

impl Harness {
    fn user(&self, name: &str) -> User {
        self.svc
            .create_user(CreateUser {
                name: name.into(),
                email: format!("{name}@example.com"),
                picture_url: None,
            })
            .unwrap()
    }

    fn promotion(&self, owner: &User) -> Promotion {
        let (promotion, _) = self
            .svc
            .create_promotion(CreatePromotion {
                user_id: owner.id.clone(),
                title: "Half price headphones".into(),
                link: "https://shop.example.com/deal".into(),
                categories: vec!["audio".into()],
                ..Default::default()
            })
            .unwrap();
        promotion
    }

    fn react(
        &self,
        actor: &User,
        promotion: &Promotion,
        kind: &str,
    ) -> Result<Reaction, ServiceError> {
        self.svc.react(ReactRequest {
            user_id: actor.id.clone(),
            owner_user_id: promotion.user_id.clone(),
            promotion_id: promotion.id.clone(),
            kind: kind.into(),
            comment: (kind == "comment").then(|| "great deal".to_string()),
        })
    }

    fn ledger_sum(&self, user_id: &str) -> i64 {
        self.repo
            .inner
            .score_entries_for_user(user_id, DateTime::<Utc>::MIN_UTC)
            .unwrap()
            .iter()
            .map(|e| e.points)
            .sum()
    }

    fn assert_total_matches_ledger(&self, user_id: &str) {
        let user = self.svc.get_user(user_id).unwrap();
        assert_eq!(user.total_score, self.ledger_sum(user_id), "cache drifted for {user_id}");
    }
}

// ── Toggling ──

#[test]
fn repeated_like_toggles() {
    let h = harness();
    let alice = h.user("alice");
    let bob = h.user("bob");
    let promo = h.promotion(&alice);
    assert_eq!(h.svc.get_user(&alice.id).unwrap().total_score, 10);

    let first = h.react(&bob, &promo, "like").unwrap();
    assert_eq!(first.action, ReactionAction::Created);
    assert_eq!(first.score.points, 2);
    assert_eq!(first.owner.total_score, 12);
    assert!(h.svc.get_interaction(&first.interaction.id).is_ok());

    let second = h.react(&bob, &promo, "like").unwrap();
    assert_eq!(second.action, ReactionAction::Removed);
    assert_eq!(second.score.points, -2);
    assert_eq!(second.interaction.id, first.interaction.id);
    assert_eq!(second.owner.total_score, 10);
    assert!(matches!(
        h.svc.get_interaction(&first.interaction.id),
        Err(ServiceError::NotFound(_))
    ));

    let third = h.react(&bob, &promo, "like").unwrap();
    assert_eq!(third.action, ReactionAction::Created);
    assert_eq!(third.owner.total_score, 12);
    assert!(h.svc.get_interaction(&third.interaction.id).is_ok());

    h.assert_total_matches_ledger(&alice.id);
}

#[test]
fn like_and_favorite_toggle_independently() {
    let h = harness();
    let alice = h.user("alice");
    let bob = h.user("bob");
    let promo = h.promotion(&alice);

    let like = h.react(&bob, &promo, "like").unwrap();
    let fav = h.react(&bob, &promo, "favorite").unwrap();
    assert_ne!(like.interaction.id, fav.interaction.id);
    assert_eq!(fav.owner.total_score, 10 + 2 + 5);

    let unfav = h.react(&bob, &promo, "favorite").unwrap();
    assert_eq!(unfav.action, ReactionAction::Removed);
    assert!(h.svc.get_interaction(&like.interaction.id).is_ok());
    assert_eq!(unfav.owner.total_score, 12);
}

#[test]
fn same_comment_twice_makes_two_records() {
    let h = harness();
    let alice = h.user("alice");
    let bob = h.user("bob");
    let promo = h.promotion(&alice);

    let a = h.react(&bob, &promo, "comment").unwrap();
    let b = h.react(&bob, &promo, "comment").unwrap();

    assert_eq!(a.action, ReactionAction::Created);
    assert_eq!(b.action, ReactionAction::Created);
    assert_ne!(a.interaction.id, b.interaction.id);
    assert_eq!(a.interaction.comment.as_deref(), Some("great deal"));
    assert!(h.svc.get_interaction(&a.interaction.id).is_ok());
    assert!(h.svc.get_interaction(&b.interaction.id).is_ok());
    assert_eq!(b.owner.total_score, 10 + 3 + 3);
}

#[test]
fn total_tracks_ledger_through_mixed_activity() {
    let h = harness();
    let users: Vec<User> = ["alice", "bob", "carol", "dave"].iter().map(|n| h.user(n)).collect();
    let promos: Vec<Promotion> = users[..2].iter().map(|u| h.promotion(u)).collect();

    let kinds = ["like", "favorite", "comment", "like", "favorite", "like"];
    for round in 0..4 {
        for (i, actor) in users.iter().enumerate() {
            for promo in &promos {
                if promo.user_id == actor.id {
                    continue;
                }
                let kind = kinds[(i + round) % kinds.len()];
                h.react(actor, promo, kind).unwrap();
                h.clock.advance(Duration::minutes(5));
            }
        }
    }

    for user in &users {
        h.assert_total_matches_ledger(&user.id);
        let stored = h.svc.get_user(&user.id).unwrap();
        assert_eq!(stored.level, h.svc.config().curve.level_for_total(stored.total_score));
    }
}

// ── Levels and tiers ──

#[test]
fn create_weight_reaches_level_two() {
    let h = harness();
    let alice = h.user("alice");
    assert_eq!(alice.level, 1);
    assert_eq!(alice.elo, "none");

    let promo = h.promotion(&alice);
    let alice = h.svc.get_user(&promo.user_id).unwrap();
    assert_eq!(alice.total_score, 10);
    assert_eq!(alice.level, 2);
}

#[test]
fn tier_follows_trailing_window() {
    let h = harness();
    let alice = h.user("alice");
    let fans: Vec<User> = ["bob", "carol"].iter().map(|n| h.user(n)).collect();
    let promo = h.promotion(&alice);

    // 10 (create) + 5 + 5 (favorites) + 2 (like) = 22
    for fan in &fans {
        h.react(fan, &promo, "favorite").unwrap();
    }
    let r = h.react(&fans[0], &promo, "like").unwrap();
    assert_eq!(r.owner.total_score, 22);
    assert_eq!(r.owner.elo, "none");

    // +2 = 24: still below bronze.
    let r = h.react(&fans[1], &promo, "like").unwrap();
    assert_eq!(r.owner.total_score, 24);
    assert_eq!(r.owner.elo, "none");

    // +3 = 27: bronze.
    let r = h.react(&fans[0], &promo, "comment").unwrap();
    assert_eq!(r.owner.elo, "bronze");

    // A week later the old points have left the window.
    h.clock.advance(Duration::days(8));
    let r = h.react(&fans[1], &promo, "comment").unwrap();
    assert_eq!(r.owner.total_score, 30);
    assert_eq!(r.owner.elo, "none");
}

#[test]
fn reversal_restores_level() {
    let h = harness();
    let alice = h.user("alice");
    let bob = h.user("bob");
    let promo = h.promotion(&alice);

    let before = h.svc.get_user(&alice.id).unwrap();
    h.react(&bob, &promo, "favorite").unwrap();
    let after = h.react(&bob, &promo, "favorite").unwrap();
    assert_eq!(after.owner.level, before.level);
    assert_eq!(after.owner.total_score, before.total_score);
}

// ── Rejections ──

#[test]
fn empty_comment_touches_nothing() {
    let h = harness();
    let alice = h.user("alice");
    let bob = h.user("bob");
    let promo = h.promotion(&alice);

    let calls = h.repo.calls();
    let err = h
        .svc
        .react(ReactRequest {
            user_id: bob.id.clone(),
            owner_user_id: alice.id.clone(),
            promotion_id: promo.id.clone(),
            kind: "comment".into(),
            comment: Some("   ".into()),
        })
        .unwrap_err();

    assert!(matches!(err, ServiceError::Validation(_)));
    assert_eq!(h.repo.calls(), calls);
}

#[test]
fn missing_promotion_writes_nothing() {
    let h = harness();
    let alice = h.user("alice");
    let bob = h.user("bob");
    let ghost = Promotion {
        id: "ghost".into(),
        user_id: alice.id.clone(),
        title: "t".into(),
        link: "l".into(),
        description: None,
        original_price: None,
        discounted_price: None,
        discount_badge: None,
        platform: None,
        image_url: None,
        categories: vec![],
        created_at: start(),
    };

    let err = h.react(&bob, &ghost, "like").unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    assert_eq!(h.svc.get_user(&alice.id).unwrap().total_score, 0);
    assert!(h.repo.inner.score_entries_since(DateTime::<Utc>::MIN_UTC).unwrap().is_empty());
}

#[test]
fn missing_owner_writes_nothing() {
    let h = harness();
    let bob = h.user("bob");
    let orphan = Promotion {
        id: "orphan".into(),
        user_id: "deleted-user".into(),
        title: "t".into(),
        link: "l".into(),
        description: None,
        original_price: None,
        discounted_price: None,
        discount_badge: None,
        platform: None,
        image_url: None,
        categories: vec![],
        created_at: start(),
    };
    h.repo.inner.put_promotion(&orphan).unwrap();

    let err = h.react(&bob, &orphan, "like").unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(ref m) if m.contains("deleted-user")));
    assert!(h.repo.inner.score_entries_since(DateTime::<Utc>::MIN_UTC).unwrap().is_empty());
    assert_eq!(h.repo.inner.list_promotions().unwrap().len(), 1);
}

#[test]
fn owner_must_match_promotion() {
    let h = harness();
    let alice = h.user("alice");
    let bob = h.user("bob");
    let carol = h.user("carol");
    let promo = h.promotion(&alice);

    let err = h
        .svc
        .react(ReactRequest {
            user_id: bob.id.clone(),
            owner_user_id: carol.id.clone(),
            promotion_id: promo.id.clone(),
            kind: "like".into(),
            comment: None,
        })
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
    assert_eq!(h.svc.get_user(&carol.id).unwrap().total_score, 0);
}

#[test]
fn self_reaction_is_a_setting() {
    let h = harness();
    let alice = h.user("alice");
    let promo = h.promotion(&alice);
    assert!(matches!(h.react(&alice, &promo, "like"), Err(ServiceError::Validation(_))));

    let mut settings = PromoSettings::default();
    settings.scoring.allow_self_reaction = true;
    let h = harness_with(settings);
    let alice = h.user("alice");
    let promo = h.promotion(&alice);
    let r = h.react(&alice, &promo, "like").unwrap();
    assert_eq!(r.owner.total_score, 12);
}

#[test]
fn create_cannot_be_sent_directly() {
    let h = harness();
    let alice = h.user("alice");
    let promo = h.promotion(&alice);

    assert!(matches!(h.react(&alice, &promo, "create"), Err(ServiceError::Validation(_))));
    assert!(matches!(h.react(&alice, &promo, "share"), Err(ServiceError::Validation(_))));
    assert_eq!(h.svc.get_user(&alice.id).unwrap().total_score, 10);
}

// ── Leaderboard ──

#[test]
fn leaderboard_ranks_windowed_sums() {
    let h = harness();
    let a = h.user("a");
    let b = h.user("b");
    let now = h.clock.now();

    for (offset, user, points) in [(1, &a, 50), (2, &b, 80), (3, &a, 10)] {
        let at = now - Duration::hours(1) + Duration::seconds(offset);
        h.repo
            .inner
            .put_score_entry(&UserScore {
                id: time_id(at),
                user_id: user.id.clone(),
                points,
                score_date: at,
            })
            .unwrap();
    }

    let top = h.svc.top(None, Some(2)).unwrap();
    let rows: Vec<_> = top.iter().map(|e| (e.rank, e.user.id.as_str(), e.score)).collect();
    assert_eq!(rows, vec![(1, b.id.as_str(), 80), (2, a.id.as_str(), 60)]);

    let top1 = h.svc.top(None, Some(1)).unwrap();
    assert_eq!(top1.len(), 1);
    assert_eq!(top1[0].user.id, b.id);
}

#[test]
fn leaderboard_window_and_exclusions() {
    let h = harness();
    let a = h.user("a");
    let b = h.user("b");
    let c = h.user("c");
    let vanished = "vanished".to_string();
    let now = h.clock.now();

    let rows = [
        (now - Duration::days(20), &a.id, 500),
        (now - Duration::days(2), &b.id, 5),
        (now - Duration::days(1), &c.id, 4),
        (now - Duration::hours(12), &c.id, -4),
        (now - Duration::hours(6), &vanished, 99),
    ];
    for (at, user_id, points) in rows {
        h.repo
            .inner
            .put_score_entry(&UserScore {
                id: time_id(at),
                user_id: user_id.clone(),
                points,
                score_date: at,
            })
            .unwrap();
    }

    // Default 7-day window: a is too old, c nets zero but still ranks,
    // the unknown user is skipped.
    let top = h.svc.top(None, None).unwrap();
    let rows: Vec<_> = top.iter().map(|e| (e.rank, e.user.id.clone(), e.score)).collect();
    assert_eq!(rows, vec![(1, b.id.clone(), 5), (2, c.id.clone(), 0)]);

    let wide = h.svc.top(Some(30), None).unwrap();
    let ids: Vec<_> = wide.iter().map(|e| e.user.id.clone()).collect();
    assert_eq!(ids, vec![a.id.clone(), b.id.clone(), c.id.clone()]);
}

#[test]
fn undone_like_keeps_user_on_leaderboard() {
    let h = harness();
    let a = h.user("a");
    let b = h.user("b");
    let now = h.clock.now();

    for (offset, user, points) in [(1, &a, 5), (2, &b, 5), (3, &b, -5)] {
        let at = now - Duration::hours(1) + Duration::seconds(offset);
        h.repo
            .inner
            .put_score_entry(&UserScore {
                id: time_id(at),
                user_id: user.id.clone(),
                points,
                score_date: at,
            })
            .unwrap();
    }

    let top = h.svc.top(None, Some(10)).unwrap();
    let rows: Vec<_> = top.iter().map(|e| (e.user.id.as_str(), e.score)).collect();
    assert_eq!(rows, vec![(a.id.as_str(), 5), (b.id.as_str(), 0)]);
}

#[test]
fn leaderboard_bounds() {
    let h = harness();
    assert!(matches!(h.svc.top(Some(365), None), Err(ServiceError::Validation(_))));
    assert!(matches!(h.svc.top(None, Some(0)), Err(ServiceError::Validation(_))));
    assert!(matches!(h.svc.top(None, Some(1000)), Err(ServiceError::Validation(_))));
    assert!(h.svc.top(None, None).unwrap().is_empty());
}

// ── Ledger replay ──

#[test]
fn rebuild_restores_cached_stats() {
    let h = harness();
    let alice = h.user("alice");
    let bob = h.user("bob");
    let promo = h.promotion(&alice);
    h.react(&bob, &promo, "favorite").unwrap();

    let mut tampered = h.svc.get_user(&alice.id).unwrap();
    tampered.total_score = 999;
    tampered.level = 40;
    tampered.elo = "silver".into();
    h.repo.inner.put_user(&tampered).unwrap();

    let rebuilt = h.svc.rebuild_user_stats(&alice.id).unwrap();
    assert_eq!(rebuilt.total_score, 15);
    assert_eq!(rebuilt.level, 2);
    assert_eq!(rebuilt.elo, "none");
    assert_eq!(h.svc.get_user(&alice.id).unwrap(), rebuilt);

    assert!(matches!(
        h.svc.rebuild_user_stats("nobody"),
        Err(ServiceError::NotFound(_))
    ));
}

// ── Users and promotions ──

#[test]
fn user_validation() {
    let h = harness();
    let ok = h
        .svc
        .create_user(CreateUser {
            name: " Alice ".into(),
            email: "Alice@Example.COM".into(),
            picture_url: None,
        })
        .unwrap();
    assert_eq!(ok.name, "Alice");
    assert_eq!(ok.email, "alice@example.com");
    assert_eq!((ok.total_score, ok.level), (0, 1));

    for (name, email) in [("", "a@b.com"), ("a", ""), ("a", "not-an-email")] {
        let err = h
            .svc
            .create_user(CreateUser {
                name: name.into(),
                email: email.into(),
                picture_url: None,
            })
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)), "{name}/{email}");
    }

    let updated = h.svc.update_picture_url(&ok.id, "https://cdn.example.com/a.png").unwrap();
    assert_eq!(updated.picture_url.as_deref(), Some("https://cdn.example.com/a.png"));
    assert!(matches!(
        h.svc.update_picture_url("nobody", "x"),
        Err(ServiceError::NotFound(_))
    ));
}

#[test]
fn promotion_validation() {
    let h = harness();
    let alice = h.user("alice");

    let missing_owner = h.svc.create_promotion(CreatePromotion {
        user_id: "nobody".into(),
        title: "t".into(),
        link: "l".into(),
        ..Default::default()
    });
    assert!(matches!(missing_owner, Err(ServiceError::NotFound(_))));

    let blank_category = h.svc.create_promotion(CreatePromotion {
        user_id: alice.id.clone(),
        title: "t".into(),
        link: "l".into(),
        categories: vec!["games".into(), " ".into()],
        ..Default::default()
    });
    assert!(matches!(blank_category, Err(ServiceError::Validation(_))));

    let no_title = h.svc.create_promotion(CreatePromotion {
        user_id: alice.id.clone(),
        link: "l".into(),
        ..Default::default()
    });
    assert!(matches!(no_title, Err(ServiceError::Validation(_))));

    assert!(h.repo.inner.list_promotions().unwrap().is_empty());
}

#[test]
fn search_and_categories() {
    let h = harness();
    let alice = h.user("alice");

    let (games, _) = h
        .svc
        .create_promotion(CreatePromotion {
            user_id: alice.id.clone(),
            title: "Console bundle".into(),
            link: "https://a.example.com".into(),
            platform: Some("Amazon".into()),
            categories: vec!["games".into()],
            ..Default::default()
        })
        .unwrap();
    h.clock.advance(Duration::seconds(1));
    let (books, _) = h
        .svc
        .create_promotion(CreatePromotion {
            user_id: alice.id.clone(),
            title: "Paperback sale".into(),
            link: "https://b.example.com".into(),
            categories: vec!["books".into(), "books".into()],
            ..Default::default()
        })
        .unwrap();
    assert_eq!(books.categories, vec!["books"]);

    let all = h.svc.search_promotions(&PromotionQuery::default()).unwrap();
    assert_eq!(all.iter().map(|p| &p.id).collect::<Vec<_>>(), vec![&books.id, &games.id]);

    let by_text = h
        .svc
        .search_promotions(&PromotionQuery {
            categories: vec![],
            search: Some("amazon".into()),
        })
        .unwrap();
    assert_eq!(by_text.len(), 1);
    assert_eq!(by_text[0].id, games.id);

    let either = h
        .svc
        .search_promotions(&PromotionQuery {
            categories: vec!["books".into()],
            search: Some("console".into()),
        })
        .unwrap();
    assert_eq!(either.len(), 2);

    let names: Vec<_> = h.svc.list_categories().unwrap().into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["books", "games"]);

    h.svc.add_category("travel").unwrap();
    assert!(matches!(h.svc.add_category("  "), Err(ServiceError::Validation(_))));
    assert_eq!(h.svc.list_categories().unwrap().len(), 3);

    let with_image = h.svc.update_image_url(&games.id, "https://cdn.example.com/g.png").unwrap();
    assert_eq!(
        h.svc.get_promotion(&games.id).unwrap().image_url,
        with_image.image_url
    );
}
