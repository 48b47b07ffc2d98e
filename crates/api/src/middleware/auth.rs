//! Authentication extractors.
//!
//! Provides extractors for requiring a bearer token (and optionally a role)
//! in route handlers. The token is verified and the user re-loaded from the
//! database on every request, so revoking an account takes effect
//! immediately even for outstanding tokens.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use northloom_core::Email;

use crate::db::users::UserRepository;
use crate::error::AppError;
use crate::models::User;
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CurrentUser(user): CurrentUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_owned()))?;

        let claims = state.tokens().verify(token)?;

        let email = Email::parse(&claims.email)
            .map_err(|_| AppError::Unauthorized("Could not validate credentials".to_owned()))?;

        let user = UserRepository::new(state.pool())
            .get_by_email(&email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Could not validate credentials".to_owned()))?;

        Ok(Self(user))
    }
}

/// Extractor that requires a staff (or superuser) account.
pub struct RequireStaff(pub User);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_staff_member() {
            return Err(AppError::Forbidden("Not enough permissions".to_owned()));
        }
        Ok(Self(user))
    }
}

/// Extractor that requires a superuser account.
pub struct RequireAdmin(pub User);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_superuser {
            return Err(AppError::Forbidden("Not enough permissions".to_owned()));
        }
        Ok(Self(user))
    }
}
