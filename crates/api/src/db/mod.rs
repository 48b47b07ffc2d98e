//! Database operations for the shop's `PostgreSQL` instance.
//!
//! # Tables
//!
//! - `categories` / `subcategories` - Catalog taxonomy
//! - `products` - Catalog entries, FK'd to both taxonomy tables
//! - `inventory` - Per-size stock counts, unique on `(product_id, size)`
//! - `product_images` - Image URLs per product
//! - `orders` / `order_items` - Placed orders and their line items
//! - `users` - Staff/admin accounts with Argon2id password hashes
//! - `content` - Editorial content blocks
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p northloom-cli -- migrate
//! ```

pub mod categories;
pub mod content;
pub mod orders;
pub mod products;
pub mod subcategories;
pub mod users;

use std::time::Duration;

use northloom_core::ProductId;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Errors from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique category name).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Foreign key violation (e.g., unknown category on product insert).
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// Not enough stock to satisfy an order line.
    #[error("insufficient stock for product {product_id} size {size}")]
    InsufficientStock {
        /// Product whose inventory ran short.
        product_id: ProductId,
        /// Size of the inventory row.
        size: String,
    },
}

/// Map a sqlx error to `Conflict`/`InvalidReference` when it is a constraint
/// violation, passing other errors through as `Database`.
pub(crate) fn map_constraint_violation(
    e: sqlx::Error,
    conflict_msg: &str,
    reference_msg: &str,
) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict(conflict_msg.to_owned());
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::InvalidReference(reference_msg.to_owned());
        }
    }
    RepositoryError::Database(e)
}

/// Map a sqlx error on a DELETE to `Conflict` when a foreign key still
/// references the row, passing other errors through as `Database`.
///
/// `order_items.product_id` has no ON DELETE action: order history outlives
/// the catalog, so deleting an ordered product (or cascading into one via
/// its category) is refused rather than rewriting past orders.
pub(crate) fn map_delete_restricted(e: sqlx::Error, conflict_msg: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_foreign_key_violation() {
            return RepositoryError::Conflict(conflict_msg.to_owned());
        }
    }
    RepositoryError::Database(e)
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
