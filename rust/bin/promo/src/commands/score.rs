use anyhow::Result;
use promo::PromoService;
use promo::model::{LeaderboardEntry, ReactRequest, ReactionAction};

use super::{emit, or_dash};

pub fn react(svc: &PromoService, req: ReactRequest, json: bool) -> Result<()> {
    let reaction = svc.react(req)?;
    emit(json, &reaction, |r| {
        let verb = match r.action {
            ReactionAction::Created => "recorded",
            ReactionAction::Removed => "removed",
        };
        println!("{} {} ({:+} points)", r.interaction.kind, verb, r.score.points);
        println!(
            "owner {}: score {}, level {}, elo {}",
            r.owner.id, r.owner.total_score, r.owner.level, r.owner.elo
        );
    })
}

pub fn interaction(svc: &PromoService, id: &str, json: bool) -> Result<()> {
    let interaction = svc.get_interaction(id)?;
    emit(json, &interaction, |i| {
        println!("{:<12} {}", "ID", i.id);
        println!("{:<12} {}", "KIND", i.kind);
        println!("{:<12} {}", "PROMOTION", i.promotion_id);
        println!("{:<12} {}", "USER", i.user_id);
        println!("{:<12} {}", "OWNER", i.owner_user_id);
        println!("{:<12} {}", "COMMENT", or_dash(i.comment.as_deref()));
        println!("{:<12} {}", "DATE", i.interaction_date.to_rfc3339());
    })
}

pub fn leaderboard(
    svc: &PromoService,
    days: Option<i64>,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let entries = svc.top(days, limit)?;
    emit(json, &entries, |rows: &Vec<LeaderboardEntry>| {
        println!("{:>4} {:>8} {:<6} {:<8} NAME", "RANK", "POINTS", "LEVEL", "ELO");
        for e in rows {
            println!(
                "{:>4} {:>8} {:<6} {:<8} {}",
                e.rank, e.score, e.user.level, e.user.elo, e.user.name
            );
        }
    })
}
