//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! POST /api/login                       - Obtain an access token
//!
//! # Categories (subcategories mirror this shape)
//! POST   /api/categories/create         - Create (staff)
//! PUT    /api/categories/update         - Rename (staff)
//! DELETE /api/categories/{id}           - Delete, cascades to products (staff)
//! GET    /api/categories/{id}           - Products in the category (paginated)
//! GET    /api/categories                - All categories
//!
//! # Products
//! POST   /api/products/create           - Create with inventory + images (staff)
//! PUT    /api/products/update           - Partial update, inventory upsert (staff)
//! DELETE /api/products/{id}             - Delete (staff)
//! GET    /api/products/{id}             - Product with inventory + images
//! GET    /api/products                  - Paginated listing
//!
//! # Orders
//! POST /api/orders/create               - Place an order (public)
//! PUT  /api/orders/update               - Update info/items (staff)
//! PUT  /api/orders/{id}/return          - Restock + mark returned (staff)
//! GET  /api/orders/{id}                 - Order with items (staff)
//! GET  /api/orders                      - Paginated listing (staff)
//! GET  /api/orders/customer/{telephone} - Orders by phone number (staff)
//!
//! # Users
//! POST   /api/users/create              - Create (admin)
//! PUT    /api/users/update              - Update email/roles (admin)
//! PUT    /api/users/password            - Change own password (any user)
//! DELETE /api/users/{id}                - Delete (admin)
//! GET    /api/users/{id}                - Fetch (admin)
//! GET    /api/users                     - List (admin)
//!
//! # Content
//! POST   /api/content/create            - Create (staff)
//! PUT    /api/content/update            - Update (staff)
//! DELETE /api/content/{id}              - Delete (staff)
//! GET    /api/content/{id}              - Fetch
//! GET    /api/content[?title=...]       - List, optional title filter
//! ```

pub mod auth;
pub mod categories;
pub mod content;
pub mod orders;
pub mod products;
pub mod subcategories;
pub mod users;

use axum::{Router, routing::post};
use serde::Deserialize;

use crate::state::AppState;

/// Assemble all `/api` routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .nest("/categories", categories::routes())
        .nest("/subcategories", subcategories::routes())
        .nest("/products", products::routes())
        .nest("/orders", orders::routes())
        .nest("/users", users::routes())
        .nest("/content", content::routes())
}

/// Offset/limit pagination query parameters.
///
/// Negative values would make Postgres reject the whole query, so the
/// accessors clamp them to zero instead.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    offset: i64,
    #[serde(default = "default_limit")]
    limit: i64,
}

const fn default_limit() -> i64 {
    20
}

impl Pagination {
    /// Rows to skip, clamped to zero.
    #[must_use]
    pub fn offset(&self) -> i64 {
        self.offset.max(0)
    }

    /// Page size, clamped to zero.
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.max(0)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: default_limit(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let page: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!(page.offset(), 0);
        assert_eq!(page.limit(), 20);
    }

    #[test]
    fn test_negative_pagination_clamped_to_zero() {
        let page: Pagination = serde_json::from_str(r#"{"offset":-5,"limit":-1}"#).unwrap();
        assert_eq!(page.offset(), 0);
        assert_eq!(page.limit(), 0);
    }

    #[test]
    fn test_explicit_pagination_passed_through() {
        let page: Pagination = serde_json::from_str(r#"{"offset":40,"limit":10}"#).unwrap();
        assert_eq!(page.offset(), 40);
        assert_eq!(page.limit(), 10);
    }
}
