//! Product repository for database operations.
//!
//! Products are aggregates: the flat row plus per-size inventory and an image
//! gallery. Writes that touch more than one table run in a transaction.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::PgPool;

use northloom_core::{CategoryId, Price, ProductId, SubcategoryId};

use super::{RepositoryError, map_constraint_violation, map_delete_restricted};
use crate::models::{InventoryLevel, Product, ProductImage};

const COLUMNS: &str = "id, name, article, base_price, sale_price, description, weight, \
                       product_origin, category_id, subcategory_id, created_at, updated_at";

const INVENTORY_COLUMNS: &str = "id, product_id, size, quantity, created_at, updated_at";
const IMAGE_COLUMNS: &str = "id, product_id, url, created_at, updated_at";

/// Input for inserting a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub article: String,
    pub base_price: Price,
    pub sale_price: Option<Price>,
    pub description: Option<String>,
    pub weight: Option<Decimal>,
    pub product_origin: Option<String>,
    pub category_id: CategoryId,
    pub subcategory_id: SubcategoryId,
    pub inventory: Vec<InventoryEntry>,
    pub images: Vec<String>,
}

/// A size/quantity pair for inventory inserts and upserts.
#[derive(Debug, Clone)]
pub struct InventoryEntry {
    pub size: String,
    pub quantity: i32,
}

/// Partial update for a product. `None` fields keep their current value;
/// inventory entries are upserted by `(product_id, size)`.
#[derive(Debug, Clone)]
pub struct ProductChanges {
    pub id: ProductId,
    pub name: Option<String>,
    pub article: Option<String>,
    pub base_price: Option<Price>,
    pub sale_price: Option<Price>,
    pub description: Option<String>,
    pub weight: Option<Decimal>,
    pub product_origin: Option<String>,
    pub category_id: Option<CategoryId>,
    pub subcategory_id: Option<SubcategoryId>,
    pub inventory: Vec<InventoryEntry>,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a product together with its inventory rows and image URLs.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if the category or
    /// subcategory does not exist, `RepositoryError::Conflict` on duplicate
    /// inventory sizes.
    pub async fn create(&self, new: NewProduct) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (name, article, base_price, sale_price, description, weight, \
                                   product_origin, category_id, subcategory_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        ))
        .bind(&new.name)
        .bind(&new.article)
        .bind(new.base_price)
        .bind(new.sale_price)
        .bind(&new.description)
        .bind(new.weight)
        .bind(&new.product_origin)
        .bind(new.category_id)
        .bind(new.subcategory_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            map_constraint_violation(e, "product already exists", "unknown category or subcategory")
        })?;

        for entry in &new.inventory {
            sqlx::query("INSERT INTO inventory (product_id, size, quantity) VALUES ($1, $2, $3)")
                .bind(product.id)
                .bind(&entry.size)
                .bind(entry.quantity)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    map_constraint_violation(e, "duplicate inventory size", "unknown product")
                })?;
        }

        for url in &new.images {
            sqlx::query("INSERT INTO product_images (product_id, url) VALUES ($1, $2)")
                .bind(product.id)
                .bind(url)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        self.get(product.id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Get a product by ID with its inventory and images.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, Product>(&format!(
            "SELECT {COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(product) => {
                let mut loaded = self.load_children(vec![product]).await?;
                Ok(loaded.pop())
            }
            None => Ok(None),
        }
    }

    /// Paginated product listing with inventory and images.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, Product>(&format!(
            "SELECT {COLUMNS} FROM products ORDER BY id OFFSET $1 LIMIT $2"
        ))
        .bind(offset)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        self.load_children(rows).await
    }

    /// Paginated products belonging to a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_by_category(
        &self,
        category_id: CategoryId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, Product>(&format!(
            "SELECT {COLUMNS} FROM products WHERE category_id = $1 ORDER BY id OFFSET $2 LIMIT $3"
        ))
        .bind(category_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        self.load_children(rows).await
    }

    /// Paginated products belonging to a subcategory.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_by_subcategory(
        &self,
        subcategory_id: SubcategoryId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, Product>(&format!(
            "SELECT {COLUMNS} FROM products WHERE subcategory_id = $1 ORDER BY id OFFSET $2 LIMIT $3"
        ))
        .bind(subcategory_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        self.load_children(rows).await
    }

    /// Apply a partial update; inventory entries are upserted by size.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist,
    /// `RepositoryError::InvalidReference` when moved to an unknown
    /// category/subcategory.
    pub async fn update(&self, changes: ProductChanges) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET
                name = COALESCE($2, name),
                article = COALESCE($3, article),
                base_price = COALESCE($4, base_price),
                sale_price = COALESCE($5, sale_price),
                description = COALESCE($6, description),
                weight = COALESCE($7, weight),
                product_origin = COALESCE($8, product_origin),
                category_id = COALESCE($9, category_id),
                subcategory_id = COALESCE($10, subcategory_id),
                updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        ))
        .bind(changes.id)
        .bind(&changes.name)
        .bind(&changes.article)
        .bind(changes.base_price)
        .bind(changes.sale_price)
        .bind(&changes.description)
        .bind(changes.weight)
        .bind(&changes.product_origin)
        .bind(changes.category_id)
        .bind(changes.subcategory_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            map_constraint_violation(e, "product already exists", "unknown category or subcategory")
        })?
        .ok_or(RepositoryError::NotFound)?;

        for entry in &changes.inventory {
            sqlx::query(
                "INSERT INTO inventory (product_id, size, quantity) VALUES ($1, $2, $3)
                 ON CONFLICT (product_id, size)
                 DO UPDATE SET quantity = EXCLUDED.quantity, updated_at = now()",
            )
            .bind(updated.id)
            .bind(&entry.size)
            .bind(entry.quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.get(changes.id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Delete a product. Inventory and images go with it by cascade.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist,
    /// `RepositoryError::Conflict` if order lines reference it.
    pub async fn delete(&self, id: ProductId) -> Result<ProductId, RepositoryError> {
        let deleted: Option<ProductId> =
            sqlx::query_scalar("DELETE FROM products WHERE id = $1 RETURNING id")
                .bind(id)
                .fetch_optional(self.pool)
                .await
                .map_err(|e| {
                    map_delete_restricted(
                        e,
                        "This product has order history and cannot be deleted",
                    )
                })?;
        deleted.ok_or(RepositoryError::NotFound)
    }

    /// Attach inventory and image rows to a batch of flat products.
    async fn load_children(
        &self,
        mut products: Vec<Product>,
    ) -> Result<Vec<Product>, RepositoryError> {
        if products.is_empty() {
            return Ok(products);
        }

        let ids: Vec<i32> = products.iter().map(|p| p.id.as_i32()).collect();

        let inventory = sqlx::query_as::<_, InventoryLevel>(&format!(
            "SELECT {INVENTORY_COLUMNS} FROM inventory WHERE product_id = ANY($1) ORDER BY size"
        ))
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let images = sqlx::query_as::<_, ProductImage>(&format!(
            "SELECT {IMAGE_COLUMNS} FROM product_images WHERE product_id = ANY($1) ORDER BY id"
        ))
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut inventory_by_product: HashMap<i32, Vec<InventoryLevel>> = HashMap::new();
        for level in inventory {
            inventory_by_product
                .entry(level.product_id.as_i32())
                .or_default()
                .push(level);
        }

        let mut images_by_product: HashMap<i32, Vec<ProductImage>> = HashMap::new();
        for image in images {
            images_by_product
                .entry(image.product_id.as_i32())
                .or_default()
                .push(image);
        }

        for product in &mut products {
            product.inventory = inventory_by_product
                .remove(&product.id.as_i32())
                .unwrap_or_default();
            product.images = images_by_product
                .remove(&product.id.as_i32())
                .unwrap_or_default();
        }

        Ok(products)
    }
}
