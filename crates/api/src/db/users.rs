//! User repository for database operations.
//!
//! Password hashes stay inside this module's `get_password_hash`; the
//! [`User`] domain type never carries one.

use sqlx::PgPool;

use northloom_core::{Email, UserId};

use super::{RepositoryError, map_constraint_violation};
use crate::models::User;

const COLUMNS: &str = "id, email, is_staff, is_superuser, created_at, updated_at";

/// Partial update for a user's email and role flags.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub id: UserId,
    pub email: Option<Email>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new user with a pre-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    pub async fn create(
        &self,
        email: &Email,
        password_hash: &str,
        is_staff: bool,
        is_superuser: bool,
    ) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, password_hash, is_staff, is_superuser)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        ))
        .bind(email)
        .bind(password_hash)
        .bind(is_staff)
        .bind(is_superuser)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_constraint_violation(e, "email already exists", "invalid user"))
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row =
            sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE email = $1"))
                .bind(email)
                .fetch_optional(self.pool)
                .await?;
        Ok(row)
    }

    /// Get a user and their password hash for credential verification.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserWithHash>(&format!(
            "SELECT {COLUMNS}, password_hash FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| (r.user, r.password_hash)))
    }

    /// List all users.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users ORDER BY id"))
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// Update email and role flags.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist,
    /// `RepositoryError::Conflict` if the new email is taken.
    pub async fn update(&self, changes: UserChanges) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET
                email = COALESCE($2, email),
                is_staff = COALESCE($3, is_staff),
                is_superuser = COALESCE($4, is_superuser),
                updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        ))
        .bind(changes.id)
        .bind(changes.email)
        .bind(changes.is_staff)
        .bind(changes.is_superuser)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_constraint_violation(e, "email already exists", "invalid user"))?
        .ok_or(RepositoryError::NotFound)
    }

    /// Replace a user's password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn set_password_hash(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(password_hash)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn delete(&self, id: UserId) -> Result<UserId, RepositoryError> {
        let deleted: Option<UserId> =
            sqlx::query_scalar("DELETE FROM users WHERE id = $1 RETURNING id")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;
        deleted.ok_or(RepositoryError::NotFound)
    }
}

/// Internal row type pairing the domain user with its hash.
#[derive(sqlx::FromRow)]
struct UserWithHash {
    #[sqlx(flatten)]
    user: User,
    password_hash: String,
}
