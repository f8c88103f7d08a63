use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents a product in the catalog.
///
/// Products are never removed: an admin delete sets `is_deleted`, which hides the
/// product from customer listings while keeping it resolvable for past orders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub category: Option<String>,
    pub weight: Option<String>,
    pub price: Decimal,
    pub stock: u32,
    pub images: Vec<String>,
    pub description: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Params for creating a new product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub weight: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial update of a product. Absent fields are left as they are.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub category: Option<String>,
    pub weight: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<u32>,
    pub images: Option<Vec<String>>,
    pub description: Option<String>,
}

/// Name and price captured at the moment stock was reserved.
#[derive(Debug, Clone, PartialEq)]
pub struct ReservedStock {
    pub product_id: String,
    pub name: String,
    pub price: Decimal,
    pub qty: u32,
}

impl Product {
    pub fn is_visible(&self) -> bool {
        !self.is_deleted
    }

    /// Case-insensitive substring match on the name. An empty needle matches everything.
    pub fn name_matches(&self, needle: &str) -> bool {
        needle.is_empty() || self.name.to_lowercase().contains(&needle.to_lowercase())
    }
}

impl ProductCreate {
    pub fn new(name: impl Into<String>, slug: impl Into<String>, price: Decimal, stock: u32) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            category: None,
            weight: None,
            price,
            stock,
            images: Vec::new(),
            description: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.images.push(image.into());
        self
    }
}
