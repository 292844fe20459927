use promo_core::{ServiceError, new_id};
use tracing::info;

use crate::model::{CreateUser, User};
use crate::service::{PromoService, log_failure, non_blank, require};

impl PromoService {
    /// Register a user. Score starts at zero, level at 1, tier at the default.
    pub fn create_user(&self, input: CreateUser) -> Result<User, ServiceError> {
        self.insert_new_user(input)
            .inspect_err(|e| log_failure("create_user", e))
    }

    /// Get a user by id.
    pub fn get_user(&self, id: &str) -> Result<User, ServiceError> {
        self.repo
            .get_user(id)
            .and_then(|found| {
                found.ok_or_else(|| ServiceError::NotFound(format!("user '{id}' not found")))
            })
            .inspect_err(|e| log_failure("get_user", e))
    }

    /// Point a user at an already uploaded profile picture.
    pub fn update_picture_url(&self, id: &str, url: &str) -> Result<User, ServiceError> {
        self.set_picture(id, url)
            .inspect_err(|e| log_failure("update_picture_url", e))
    }

    fn insert_new_user(&self, input: CreateUser) -> Result<User, ServiceError> {
        require(&input.name, "name")?;
        require(&input.email, "email")?;
        let email = input.email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(ServiceError::Validation(format!("email '{email}' is invalid")));
        }

        let user = User {
            id: new_id(),
            name: input.name.trim().to_string(),
            email,
            picture_url: non_blank(input.picture_url),
            total_score: 0,
            level: 1,
            elo: self.config.tiers.ladder().default_label().to_string(),
            created_at: self.clock.now(),
        };
        self.repo.insert_user(&user)?;
        info!(user = %user.id, "user created");
        Ok(user)
    }

    fn set_picture(&self, id: &str, url: &str) -> Result<User, ServiceError> {
        require(url, "pictureUrl")?;
        let (mut user, revision) = self
            .repo
            .get_user_revision(id)?
            .ok_or_else(|| ServiceError::NotFound(format!("user '{id}' not found")))?;
        user.picture_url = Some(url.trim().to_string());
        self.repo.replace_user(&user, &revision)?;
        Ok(user)
    }
}

/// `local@host.tld`: local part of `[a-z0-9._%+-]`, host of `[a-z0-9.-]`,
/// and a 2 to 4 letter top-level domain. Expects lowercase input.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };

    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "._%+-".contains(c));
    let host_ok = !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || ".-".contains(c));
    let tld_ok = (2..=4).contains(&tld.len()) && tld.chars().all(|c| c.is_ascii_lowercase());

    local_ok && host_ok && tld_ok
}
