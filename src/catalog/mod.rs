pub mod mock;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub const EMPTY_CATEGORY_MESSAGE: &str = "No influencers found for this category yet.";

// --- Stories ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum MediaKind {
    Image,
    Video,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StoryItem {
    pub id: String,
    pub kind: MediaKind,
    pub url: String,
    pub duration_seconds: f64,
    pub created_at: DateTime<Utc>,
}

/// One user's ordered run of story media.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Story {
    pub id: String,
    pub username: String,
    pub avatar_image: String,
    #[serde(default)]
    pub is_live: bool,
    pub viewed: bool,
    pub items: Vec<StoryItem>,
}

// --- Products ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum OptionKind {
    Color,
    Storage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OptionValue {
    pub id: String,
    pub label: String,
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductOption {
    pub kind: OptionKind,
    pub name: String,
    pub values: Vec<OptionValue>,
}

impl ProductOption {
    pub fn value(&self, value_id: &str) -> Option<&OptionValue> {
        self.values.iter().find(|v| v.id == value_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductDetails {
    pub id: String,
    pub title: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    pub images: Vec<String>,
    pub rating: f64,
    pub review_count: u32,
    pub pickup_date: String,
    pub options: Vec<ProductOption>,
}

impl ProductDetails {
    pub fn option(&self, name: &str) -> Option<&ProductOption> {
        self.options.iter().find(|o| o.name == name)
    }
}

/// A product card in a category carousel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogProduct {
    pub id: String,
    pub title: String,
    pub images: Vec<String>,
    pub price: f64,
    pub category: String,
}

impl From<&CatalogProduct> for ProductDetails {
    fn from(product: &CatalogProduct) -> Self {
        ProductDetails {
            id: product.id.clone(),
            title: product.title.clone(),
            price: product.price,
            original_price: None,
            images: product.images.clone(),
            rating: 0.0,
            review_count: 0,
            pickup_date: String::new(),
            options: Vec::new(),
        }
    }
}

// --- Categories ---

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Category {
    pub title: String,
    pub image: String,
    pub slug: String,
    pub influencer_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Influencer {
    pub id: String,
    pub name: String,
    pub username: String,
    pub avatar: String,
    pub followers: u64,
    pub category: String,
    pub bio: String,
}

/// Everything a category page renders. `empty_message` is set when no
/// influencer matches the slug.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct CategoryPage {
    pub slug: String,
    pub title: String,
    pub influencers: Vec<Influencer>,
    pub products: Vec<CatalogProduct>,
    pub empty_message: Option<String>,
}

/// Embedded short-form video shown in the shorts grid.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Short {
    pub username: String,
    pub profile_image: String,
    pub video_id: String,
    pub description: Option<String>,
    pub followers: Option<u64>,
}

pub fn influencers_for_category<'a>(
    influencers: &'a [Influencer],
    slug: &str,
) -> Vec<&'a Influencer> {
    influencers.iter().filter(|i| i.category == slug).collect()
}

pub fn products_for_category<'a>(
    products: &'a [CatalogProduct],
    slug: &str,
) -> Vec<&'a CatalogProduct> {
    products.iter().filter(|p| p.category == slug).collect()
}

/// "smart-home" -> "smart home". Only the first dash is replaced.
pub fn category_title(slug: &str) -> String {
    slug.replacen('-', " ", 1)
}

pub fn category_page(
    slug: &str,
    influencers: &[Influencer],
    products: &[CatalogProduct],
) -> CategoryPage {
    let matched: Vec<Influencer> = influencers_for_category(influencers, slug)
        .into_iter()
        .cloned()
        .collect();
    let empty_message = matched
        .is_empty()
        .then(|| EMPTY_CATEGORY_MESSAGE.to_string());

    CategoryPage {
        slug: slug.to_string(),
        title: category_title(slug),
        influencers: matched,
        products: products_for_category(products, slug)
            .into_iter()
            .cloned()
            .collect(),
        empty_message,
    }
}

/// All static content a session browses.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub stories: Arc<[Story]>,
    pub product: ProductDetails,
    pub categories: Vec<Category>,
    pub influencers: Vec<Influencer>,
    pub products: Vec<CatalogProduct>,
    pub shorts: Vec<Short>,
}

impl Catalog {
    pub fn mock() -> Self {
        Self {
            stories: mock::stories().into(),
            product: mock::product(),
            categories: mock::categories(),
            influencers: mock::influencers(),
            products: mock::catalog_products(),
            shorts: mock::shorts(),
        }
    }

    pub fn category_page(&self, slug: &str) -> CategoryPage {
        category_page(slug, &self.influencers, &self.products)
    }

    pub fn catalog_product(&self, id: &str) -> Option<&CatalogProduct> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn short(&self, video_id: &str) -> Option<&Short> {
        self.shorts.iter().find(|s| s.video_id == video_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_influencers_by_slug() {
        let influencers = mock::influencers();
        let found = influencers_for_category(&influencers, "smartphones");
        assert_eq!(found.len(), 3);
        assert!(found.iter().all(|i| i.category == "smartphones"));
    }

    #[test]
    fn unknown_category_has_empty_state_message() {
        let page = category_page("drones", &mock::influencers(), &mock::catalog_products());
        assert!(page.influencers.is_empty());
        assert!(page.products.is_empty());
        assert_eq!(page.empty_message.as_deref(), Some(EMPTY_CATEGORY_MESSAGE));
    }

    #[test]
    fn known_category_has_no_empty_message() {
        let page = category_page("laptops", &mock::influencers(), &mock::catalog_products());
        assert_eq!(page.influencers.len(), 1);
        assert!(page.empty_message.is_none());
        assert!(page.products.iter().all(|p| p.category == "laptops"));
    }

    #[test]
    fn title_replaces_first_dash_only() {
        assert_eq!(category_title("smart-home-tech"), "smart home-tech");
        assert_eq!(category_title("tvs"), "tvs");
    }

    #[test]
    fn product_option_lookup() {
        let product = mock::product();
        let color = product.option("Color").unwrap();
        assert_eq!(color.kind, OptionKind::Color);
        assert!(!color.value("rose").unwrap().available);
        assert!(product.option("Size").is_none());
    }
}
