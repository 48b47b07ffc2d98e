//! Category repository for database operations.

use sqlx::PgPool;

use northloom_core::CategoryId;

use super::{RepositoryError, map_constraint_violation, map_delete_restricted};
use crate::models::Category;

const COLUMNS: &str = "id, name, created_at, updated_at";

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name is already registered.
    pub async fn create(&self, name: &str) -> Result<Category, RepositoryError> {
        sqlx::query_as::<_, Category>(&format!(
            "INSERT INTO categories (name) VALUES ($1) RETURNING {COLUMNS}"
        ))
        .bind(name)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            map_constraint_violation(
                e,
                "This category name is already registered",
                "invalid category",
            )
        })
    }

    /// Get a category by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, Category>(&format!(
            "SELECT {COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    /// Get a category by its unique name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, Category>(&format!(
            "SELECT {COLUMNS} FROM categories WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, Category>(&format!(
            "SELECT {COLUMNS} FROM categories ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Rename a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category does not exist.
    /// Returns `RepositoryError::Conflict` if the new name is taken.
    pub async fn update(&self, id: CategoryId, name: &str) -> Result<Category, RepositoryError> {
        sqlx::query_as::<_, Category>(&format!(
            "UPDATE categories SET name = $2, updated_at = now() WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(name)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            map_constraint_violation(
                e,
                "This category name is already registered",
                "invalid category",
            )
        })?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a category. Products referencing it are removed by cascade.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category does not exist,
    /// `RepositoryError::Conflict` if the cascade reaches a product with
    /// order history.
    pub async fn delete(&self, id: CategoryId) -> Result<CategoryId, RepositoryError> {
        let deleted: Option<CategoryId> =
            sqlx::query_scalar("DELETE FROM categories WHERE id = $1 RETURNING id")
                .bind(id)
                .fetch_optional(self.pool)
                .await
                .map_err(|e| {
                    map_delete_restricted(
                        e,
                        "This category contains products with order history and cannot be deleted",
                    )
                })?;
        deleted.ok_or(RepositoryError::NotFound)
    }
}
