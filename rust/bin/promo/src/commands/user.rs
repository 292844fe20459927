use anyhow::Result;
use promo::PromoService;
use promo::model::{CreateUser, User};

use super::{emit, or_dash};

pub fn create(svc: &PromoService, input: CreateUser, json: bool) -> Result<()> {
    let user = svc.create_user(input)?;
    emit(json, &user, |u| {
        println!("user created.");
        print_user(u);
    })
}

pub fn get(svc: &PromoService, id: &str, json: bool) -> Result<()> {
    let user = svc.get_user(id)?;
    emit(json, &user, print_user)
}

pub fn set_picture(svc: &PromoService, id: &str, url: &str, json: bool) -> Result<()> {
    let user = svc.update_picture_url(id, url)?;
    emit(json, &user, print_user)
}

pub fn rebuild(svc: &PromoService, id: &str, json: bool) -> Result<()> {
    let before = svc.get_user(id)?;
    let after = svc.rebuild_user_stats(id)?;
    emit(json, &after, |u| {
        if before.total_score == u.total_score && before.level == u.level && before.elo == u.elo {
            println!("user {} already consistent with the ledger.", u.id);
        } else {
            println!(
                "user {} rebuilt: score {} -> {}, level {} -> {}, elo {} -> {}",
                u.id, before.total_score, u.total_score, before.level, u.level, before.elo, u.elo
            );
        }
    })
}

pub(crate) fn print_user(u: &User) {
    println!("{:<12} {}", "ID", u.id);
    println!("{:<12} {}", "NAME", u.name);
    println!("{:<12} {}", "EMAIL", u.email);
    println!("{:<12} {}", "PICTURE", or_dash(u.picture_url.as_deref()));
    println!("{:<12} {}", "SCORE", u.total_score);
    println!("{:<12} {}", "LEVEL", u.level);
    println!("{:<12} {}", "ELO", u.elo);
    println!("{:<12} {}", "CREATED", u.created_at.to_rfc3339());
}
