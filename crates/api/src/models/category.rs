//! Catalog taxonomy types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use northloom_core::{CategoryId, SubcategoryId};

/// A top-level product category. Names are unique.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A subcategory. Orthogonal to [`Category`] - every product carries one of
/// each. Names are unique.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Subcategory {
    pub id: SubcategoryId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
