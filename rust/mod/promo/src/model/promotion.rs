use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An advertised deal, owned by the user who posted it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub id: String,

    /// Owner (the user who posted the deal).
    pub user_id: String,

    pub title: String,
    pub link: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_badge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,

    /// Image URL, set after the image has been stored elsewhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(default)]
    pub categories: Vec<String>,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a promotion.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePromotion {
    pub user_id: String,
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub original_price: Option<String>,
    #[serde(default)]
    pub discounted_price: Option<String>,
    #[serde(default)]
    pub discount_badge: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Search filters. A promotion matches when no filter is given, or when any
/// one filter matches: it carries one of `categories`, or `search` occurs
/// (case-insensitive) in one of its text fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromotionQuery {
    #[serde(default, rename = "category")]
    pub categories: Vec<String>,
    #[serde(default)]
    pub search: Option<String>,
}

impl PromotionQuery {
    pub fn matches(&self, promotion: &Promotion) -> bool {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        if self.categories.is_empty() && needle.is_none() {
            return true;
        }

        let category_hit = self
            .categories
            .iter()
            .any(|c| promotion.categories.iter().any(|pc| pc == c));
        if category_hit {
            return true;
        }

        let Some(needle) = needle else {
            return false;
        };
        let fields = [
            Some(promotion.user_id.as_str()),
            Some(promotion.title.as_str()),
            promotion.description.as_deref(),
            promotion.platform.as_deref(),
            Some(promotion.link.as_str()),
        ];
        fields
            .into_iter()
            .flatten()
            .chain(promotion.categories.iter().map(String::as_str))
            .any(|f| f.to_lowercase().contains(&needle))
    }
}

/// A classification tag for promotions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
}
