//! Content repository for database operations.

use sqlx::PgPool;

use northloom_core::ContentId;

use super::RepositoryError;
use crate::models::Content;

const COLUMNS: &str = "id, title, description, created_at, updated_at";

/// Repository for editorial content blocks.
pub struct ContentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ContentRepository<'a> {
    /// Create a new content repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new content block.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, title: &str, description: &str) -> Result<Content, RepositoryError> {
        let row = sqlx::query_as::<_, Content>(&format!(
            "INSERT INTO content (title, description) VALUES ($1, $2) RETURNING {COLUMNS}"
        ))
        .bind(title)
        .bind(description)
        .fetch_one(self.pool)
        .await?;
        Ok(row)
    }

    /// Get a content block by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ContentId) -> Result<Option<Content>, RepositoryError> {
        let row =
            sqlx::query_as::<_, Content>(&format!("SELECT {COLUMNS} FROM content WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;
        Ok(row)
    }

    /// List content blocks, optionally filtered by exact title.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, title: Option<&str>) -> Result<Vec<Content>, RepositoryError> {
        let rows = match title {
            Some(title) => {
                sqlx::query_as::<_, Content>(&format!(
                    "SELECT {COLUMNS} FROM content WHERE title = $1 ORDER BY id"
                ))
                .bind(title)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Content>(&format!("SELECT {COLUMNS} FROM content ORDER BY id"))
                    .fetch_all(self.pool)
                    .await?
            }
        };
        Ok(rows)
    }

    /// Update a content block's title and/or description.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the block does not exist.
    pub async fn update(
        &self,
        id: ContentId,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<Content, RepositoryError> {
        sqlx::query_as::<_, Content>(&format!(
            "UPDATE content SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(title)
        .bind(description)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a content block.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the block does not exist.
    pub async fn delete(&self, id: ContentId) -> Result<ContentId, RepositoryError> {
        let deleted: Option<ContentId> =
            sqlx::query_scalar("DELETE FROM content WHERE id = $1 RETURNING id")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;
        deleted.ok_or(RepositoryError::NotFound)
    }
}
