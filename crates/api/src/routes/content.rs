//! Editorial content route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::{Value, json};

use northloom_core::ContentId;

use crate::db::content::ContentRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireStaff;
use crate::models::Content;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/update", put(update))
        .route("/", get(list))
        .route("/{id}", get(fetch).delete(remove))
}

#[derive(Debug, Deserialize)]
pub struct CreateContent {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateContent {
    pub id: ContentId,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContentFilter {
    pub title: Option<String>,
}

/// Create a content block. Staff only.
async fn create(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Json(payload): Json<CreateContent>,
) -> Result<(StatusCode, Json<Content>)> {
    let content = ContentRepository::new(state.pool())
        .create(&payload.title, &payload.description)
        .await?;
    Ok((StatusCode::CREATED, Json(content)))
}

/// Update a content block's title and/or description. Staff only.
async fn update(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Json(payload): Json<UpdateContent>,
) -> Result<Json<Content>> {
    let content = ContentRepository::new(state.pool())
        .update(
            payload.id,
            payload.title.as_deref(),
            payload.description.as_deref(),
        )
        .await?;
    Ok(Json(content))
}

/// List content blocks, optionally filtered by exact title.
async fn list(
    State(state): State<AppState>,
    Query(filter): Query<ContentFilter>,
) -> Result<Json<Vec<Content>>> {
    let content = ContentRepository::new(state.pool())
        .list(filter.title.as_deref())
        .await?;
    Ok(Json(content))
}

/// Fetch a single content block.
async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<ContentId>,
) -> Result<Json<Content>> {
    let content = ContentRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Content with id {id} does not exist")))?;
    Ok(Json(content))
}

/// Delete a content block. Staff only.
async fn remove(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<ContentId>,
) -> Result<Json<Value>> {
    ContentRepository::new(state.pool()).delete(id).await?;
    Ok(Json(json!({ "detail": format!("Content {id} has been deleted") })))
}
