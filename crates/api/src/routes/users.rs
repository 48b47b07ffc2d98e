//! User management route handlers.
//!
//! Account administration is superuser only. Password change is the one
//! self-service operation: any authenticated user can rotate their own.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::{Value, json};

use northloom_core::{Email, UserId};

use crate::db::users::{UserChanges, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::{CurrentUser, RequireAdmin};
use crate::models::User;
use crate::services::auth::AuthService;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/update", put(update))
        .route("/password", put(change_password))
        .route("/", get(list))
        .route("/{id}", get(fetch).delete(remove))
}

#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUser {
    pub id: UserId,
    pub email: Option<String>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePassword {
    pub password: String,
}

/// Create a user account. Admin only.
async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(payload): Json<CreateUser>,
) -> Result<(StatusCode, Json<User>)> {
    let user = AuthService::new(state.pool(), state.tokens())
        .create_user(
            &payload.email,
            &payload.password,
            payload.is_staff,
            payload.is_superuser,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Update a user's email and role flags. Admin only.
async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(payload): Json<UpdateUser>,
) -> Result<Json<User>> {
    let email = payload
        .email
        .as_deref()
        .map(Email::parse)
        .transpose()
        .map_err(|_| AppError::BadRequest("Invalid email address".to_owned()))?;

    let user = UserRepository::new(state.pool())
        .update(UserChanges {
            id: payload.id,
            email,
            is_staff: payload.is_staff,
            is_superuser: payload.is_superuser,
        })
        .await?;
    Ok(Json(user))
}

/// Change the calling user's own password.
async fn change_password(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<ChangePassword>,
) -> Result<Json<Value>> {
    AuthService::new(state.pool(), state.tokens())
        .change_password(user.id, &payload.password)
        .await?;
    Ok(Json(json!({ "detail": "Password has been updated" })))
}

/// List all users. Admin only.
async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<User>>> {
    let users = UserRepository::new(state.pool()).list().await?;
    Ok(Json(users))
}

/// Fetch a single user. Admin only.
async fn fetch(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<UserId>,
) -> Result<Json<User>> {
    let user = UserRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id {id} does not exist")))?;
    Ok(Json(user))
}

/// Delete a user account. Admin only.
async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<UserId>,
) -> Result<Json<Value>> {
    UserRepository::new(state.pool()).delete(id).await?;
    Ok(Json(json!({ "detail": format!("User {id} has been deleted") })))
}
