//! Product domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use northloom_core::{CategoryId, ImageId, InventoryId, Price, ProductId, SubcategoryId};

/// A catalog product with its per-size inventory and image gallery.
///
/// The flat columns come straight from the `products` table; `inventory` and
/// `images` are filled in by the repository from their own tables.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Vendor article number.
    pub article: String,
    pub base_price: Price,
    pub sale_price: Option<Price>,
    pub description: Option<String>,
    /// Shipping weight in grams.
    pub weight: Option<Decimal>,
    pub product_origin: Option<String>,
    pub category_id: CategoryId,
    pub subcategory_id: SubcategoryId,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    #[sqlx(skip)]
    pub inventory: Vec<InventoryLevel>,
    #[sqlx(skip)]
    pub images: Vec<ProductImage>,
}

/// Stock count for one size of one product. Unique on `(product_id, size)`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct InventoryLevel {
    pub id: InventoryId,
    pub product_id: ProductId,
    pub size: String,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// One image URL in a product's gallery.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductImage {
    pub id: ImageId,
    pub product_id: ProductId,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
