//! Authentication error types.

use northloom_core::EmailError;

use crate::db::RepositoryError;

/// Errors from authentication operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Email/password combination is wrong (or the user does not exist -
    /// the two cases are deliberately indistinguishable to callers).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The bearer token's expiry has passed.
    #[error("token expired")]
    TokenExpired,

    /// The bearer token is malformed or its signature does not verify.
    #[error("invalid token")]
    InvalidToken,

    /// A user with this email is already registered.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password does not meet requirements.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// Email format is invalid.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Password hashing or parsing failed.
    #[error("password hash error: {0}")]
    PasswordHash(String),

    /// Token could not be signed.
    #[error("token encoding error: {0}")]
    TokenEncoding(String),

    /// Underlying repository failure.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}
