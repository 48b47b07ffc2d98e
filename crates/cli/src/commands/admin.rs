//! Account management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a staff account
//! nl-cli admin create -e staff@example.com -p <password>
//!
//! # Create a superuser account
//! nl-cli admin create -e admin@example.com -p <password> --superuser
//! ```
//!
//! # Environment Variables
//!
//! - `NORTHLOOM_DATABASE_URL` - `PostgreSQL` connection string
//!   (falls back to `DATABASE_URL`)

use sqlx::PgPool;
use thiserror::Error;

use northloom_api::db::RepositoryError;
use northloom_api::db::users::UserRepository;
use northloom_api::services::auth::{AuthError, hash_password};
use northloom_core::Email;

use super::migrate::MigrationError;

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error(transparent)]
    Environment(#[from] MigrationError),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Repository error.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Password does not meet requirements.
    #[error("Password must be at least 8 characters")]
    WeakPassword,

    /// User already exists.
    #[error("A user already exists with email: {0}")]
    UserExists(String),
}

/// Create a staff account, optionally with the superuser role.
///
/// # Returns
///
/// The ID of the created user.
///
/// # Errors
///
/// Returns `AdminError` if the email is invalid, the password is too short,
/// or the email is already registered.
pub async fn create_user(email: &str, password: &str, superuser: bool) -> Result<i32, AdminError> {
    dotenvy::dotenv().ok();

    let email = Email::parse(email).map_err(|_| AdminError::InvalidEmail(email.to_owned()))?;
    if password.len() < 8 {
        return Err(AdminError::WeakPassword);
    }

    let database_url = super::migrate::database_url()?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    let repo = UserRepository::new(&pool);

    if repo.get_by_email(&email).await?.is_some() {
        return Err(AdminError::UserExists(email.to_string()));
    }

    let password_hash = hash_password(password)?;
    let user = repo.create(&email, &password_hash, true, superuser).await?;

    tracing::info!(
        "Account created! ID: {}, Email: {}, Superuser: {}",
        user.id,
        user.email,
        user.is_superuser
    );

    Ok(user.id.as_i32())
}
