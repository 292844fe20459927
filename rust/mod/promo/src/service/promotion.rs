use promo_core::{ServiceError, new_id};
use tracing::{debug, info};

use crate::model::{Category, CreatePromotion, Promotion, PromotionQuery, ReactRequest, Reaction};
use crate::service::interaction::Origin;
use crate::service::{PromoService, log_failure, non_blank, require};

impl PromoService {
    /// Publish a promotion and credit its owner with the `create` weight.
    ///
    /// The promotion is stored first and the `create` interaction goes
    /// through the reaction pipeline afterwards. If the second step fails the
    /// promotion stays and the error is returned.
    pub fn create_promotion(
        &self,
        input: CreatePromotion,
    ) -> Result<(Promotion, Reaction), ServiceError> {
        self.publish(input)
            .inspect_err(|e| log_failure("create_promotion", e))
    }

    /// Get a promotion by id.
    pub fn get_promotion(&self, id: &str) -> Result<Promotion, ServiceError> {
        self.repo
            .get_promotion(id)
            .and_then(|found| {
                found.ok_or_else(|| ServiceError::NotFound(format!("promotion '{id}' not found")))
            })
            .inspect_err(|e| log_failure("get_promotion", e))
    }

    /// Promotions matching any of the query filters, newest first.
    pub fn search_promotions(&self, query: &PromotionQuery) -> Result<Vec<Promotion>, ServiceError> {
        let mut found: Vec<Promotion> = self
            .repo
            .list_promotions()
            .inspect_err(|e| log_failure("search_promotions", e))?
            .into_iter()
            .filter(|p| query.matches(p))
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        debug!(hits = found.len(), "promotion search");
        Ok(found)
    }

    /// Point a promotion at an already uploaded image.
    pub fn update_image_url(&self, id: &str, url: &str) -> Result<Promotion, ServiceError> {
        self.set_image(id, url)
            .inspect_err(|e| log_failure("update_image_url", e))
    }

    /// All known categories, by name.
    pub fn list_categories(&self) -> Result<Vec<Category>, ServiceError> {
        self.repo
            .list_categories()
            .inspect_err(|e| log_failure("list_categories", e))
    }

    /// Register a category. Adding an existing name is a no-op.
    pub fn add_category(&self, name: &str) -> Result<Category, ServiceError> {
        let category = Category {
            name: name.trim().to_string(),
        };
        require(&category.name, "category name")
            .and_then(|_| self.repo.put_category(&category))
            .inspect_err(|e| log_failure("add_category", e))?;
        Ok(category)
    }

    fn publish(&self, input: CreatePromotion) -> Result<(Promotion, Reaction), ServiceError> {
        require(&input.user_id, "userId")?;
        require(&input.title, "title")?;
        require(&input.link, "link")?;
        if input.categories.iter().any(|c| c.trim().is_empty()) {
            return Err(ServiceError::Validation("category name is empty".into()));
        }

        if self.repo.get_user(&input.user_id)?.is_none() {
            return Err(ServiceError::NotFound(format!("user '{}' not found", input.user_id)));
        }

        let mut categories: Vec<String> = Vec::with_capacity(input.categories.len());
        for c in input.categories {
            let c = c.trim().to_string();
            if !categories.contains(&c) {
                categories.push(c);
            }
        }

        let promotion = Promotion {
            id: new_id(),
            user_id: input.user_id,
            title: input.title.trim().to_string(),
            link: input.link.trim().to_string(),
            description: non_blank(input.description),
            original_price: non_blank(input.original_price),
            discounted_price: non_blank(input.discounted_price),
            discount_badge: non_blank(input.discount_badge),
            platform: non_blank(input.platform),
            image_url: None,
            categories,
            created_at: self.clock.now(),
        };

        for name in &promotion.categories {
            self.repo.put_category(&Category { name: name.clone() })?;
        }
        self.repo.put_promotion(&promotion)?;
        info!(promotion = %promotion.id, owner = %promotion.user_id, "promotion created");

        let reaction = self.apply_reaction(
            &ReactRequest {
                user_id: promotion.user_id.clone(),
                owner_user_id: promotion.user_id.clone(),
                promotion_id: promotion.id.clone(),
                kind: "create".into(),
                comment: None,
            },
            Origin::PromotionCreated,
        )?;

        Ok((promotion, reaction))
    }

    fn set_image(&self, id: &str, url: &str) -> Result<Promotion, ServiceError> {
        require(url, "imageUrl")?;
        let mut promotion = self
            .repo
            .get_promotion(id)?
            .ok_or_else(|| ServiceError::NotFound(format!("promotion '{id}' not found")))?;
        promotion.image_url = Some(url.trim().to_string());
        self.repo.put_promotion(&promotion)?;
        Ok(promotion)
    }
}
