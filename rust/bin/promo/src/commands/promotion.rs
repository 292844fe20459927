use anyhow::Result;
use promo::PromoService;
use promo::model::{Category, CreatePromotion, Promotion, PromotionQuery};

use super::{emit, or_dash};

pub fn create(svc: &PromoService, input: CreatePromotion, json: bool) -> Result<()> {
    let (promotion, reaction) = svc.create_promotion(input)?;
    let out = serde_json::json!({ "promotion": &promotion, "reaction": &reaction });
    emit(json, &out, |_| {
        println!("promotion created.");
        print_promotion(&promotion);
        println!(
            "owner {} now at {} points, level {}, elo {}",
            reaction.owner.id, reaction.owner.total_score, reaction.owner.level, reaction.owner.elo
        );
    })
}

pub fn get(svc: &PromoService, id: &str, json: bool) -> Result<()> {
    let promotion = svc.get_promotion(id)?;
    emit(json, &promotion, print_promotion)
}

pub fn set_image(svc: &PromoService, id: &str, url: &str, json: bool) -> Result<()> {
    let promotion = svc.update_image_url(id, url)?;
    emit(json, &promotion, print_promotion)
}

pub fn search(svc: &PromoService, query: &PromotionQuery, json: bool) -> Result<()> {
    let found = svc.search_promotions(query)?;
    emit(json, &found, |rows| {
        println!("{:<34} {:<34} {:<20} TITLE", "ID", "OWNER", "CATEGORIES");
        for p in rows {
            println!("{:<34} {:<34} {:<20} {}", p.id, p.user_id, p.categories.join(","), p.title);
        }
        println!("({} found)", rows.len());
    })
}

pub fn add_category(svc: &PromoService, name: &str, json: bool) -> Result<()> {
    let category = svc.add_category(name)?;
    emit(json, &category, |c| println!("category {} added.", c.name))
}

pub fn list_categories(svc: &PromoService, json: bool) -> Result<()> {
    let categories = svc.list_categories()?;
    emit(json, &categories, |rows: &Vec<Category>| {
        for c in rows {
            println!("{}", c.name);
        }
    })
}

fn print_promotion(p: &Promotion) {
    println!("{:<12} {}", "ID", p.id);
    println!("{:<12} {}", "OWNER", p.user_id);
    println!("{:<12} {}", "TITLE", p.title);
    println!("{:<12} {}", "LINK", p.link);
    println!("{:<12} {}", "PLATFORM", or_dash(p.platform.as_deref()));
    println!("{:<12} {}", "PRICE", or_dash(p.discounted_price.as_deref()));
    println!("{:<12} {}", "WAS", or_dash(p.original_price.as_deref()));
    println!("{:<12} {}", "BADGE", or_dash(p.discount_badge.as_deref()));
    println!("{:<12} {}", "IMAGE", or_dash(p.image_url.as_deref()));
    println!("{:<12} {}", "CATEGORIES", p.categories.join(", "));
    println!("{:<12} {}", "CREATED", p.created_at.to_rfc3339());
}
