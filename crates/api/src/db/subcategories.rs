//! Subcategory repository for database operations.

use sqlx::PgPool;

use northloom_core::SubcategoryId;

use super::{RepositoryError, map_constraint_violation, map_delete_restricted};
use crate::models::Subcategory;

const COLUMNS: &str = "id, name, created_at, updated_at";

/// Repository for subcategory database operations.
pub struct SubcategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SubcategoryRepository<'a> {
    /// Create a new subcategory repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new subcategory.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name is already registered.
    pub async fn create(&self, name: &str) -> Result<Subcategory, RepositoryError> {
        sqlx::query_as::<_, Subcategory>(&format!(
            "INSERT INTO subcategories (name) VALUES ($1) RETURNING {COLUMNS}"
        ))
        .bind(name)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            map_constraint_violation(
                e,
                "This subcategory name is already registered",
                "invalid subcategory",
            )
        })
    }

    /// Get a subcategory by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: SubcategoryId) -> Result<Option<Subcategory>, RepositoryError> {
        let row = sqlx::query_as::<_, Subcategory>(&format!(
            "SELECT {COLUMNS} FROM subcategories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    /// Get a subcategory by its unique name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Subcategory>, RepositoryError> {
        let row = sqlx::query_as::<_, Subcategory>(&format!(
            "SELECT {COLUMNS} FROM subcategories WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    /// List all subcategories.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Subcategory>, RepositoryError> {
        let rows = sqlx::query_as::<_, Subcategory>(&format!(
            "SELECT {COLUMNS} FROM subcategories ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Rename a subcategory.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the subcategory does not exist.
    /// Returns `RepositoryError::Conflict` if the new name is taken.
    pub async fn update(
        &self,
        id: SubcategoryId,
        name: &str,
    ) -> Result<Subcategory, RepositoryError> {
        sqlx::query_as::<_, Subcategory>(&format!(
            "UPDATE subcategories SET name = $2, updated_at = now() WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(name)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            map_constraint_violation(
                e,
                "This subcategory name is already registered",
                "invalid subcategory",
            )
        })?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a subcategory. Products referencing it are removed by cascade.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the subcategory does not exist,
    /// `RepositoryError::Conflict` if the cascade reaches a product with
    /// order history.
    pub async fn delete(&self, id: SubcategoryId) -> Result<SubcategoryId, RepositoryError> {
        let deleted: Option<SubcategoryId> =
            sqlx::query_scalar("DELETE FROM subcategories WHERE id = $1 RETURNING id")
                .bind(id)
                .fetch_optional(self.pool)
                .await
                .map_err(|e| {
                    map_delete_restricted(
                        e,
                        "This subcategory contains products with order history and cannot be deleted",
                    )
                })?;
        deleted.ok_or(RepositoryError::NotFound)
    }
}
