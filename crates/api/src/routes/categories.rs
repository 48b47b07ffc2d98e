//! Category route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::{Value, json};

use northloom_core::CategoryId;

use super::Pagination;
use crate::db::categories::CategoryRepository;
use crate::db::products::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireStaff;
use crate::models::{Category, Product};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/update", put(update))
        .route("/", get(list))
        .route("/{id}", get(products_in).delete(remove))
}

#[derive(Debug, Deserialize)]
pub struct CreateCategory {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategory {
    pub id: CategoryId,
    pub name: String,
}

/// Create a category. Staff only.
async fn create(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Json(payload): Json<CreateCategory>,
) -> Result<(StatusCode, Json<Category>)> {
    let category = CategoryRepository::new(state.pool())
        .create(&payload.name)
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Rename a category. Staff only.
async fn update(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Json(payload): Json<UpdateCategory>,
) -> Result<Json<Category>> {
    let category = CategoryRepository::new(state.pool())
        .update(payload.id, &payload.name)
        .await?;
    Ok(Json(category))
}

/// List all categories.
async fn list(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let categories = CategoryRepository::new(state.pool()).list().await?;
    Ok(Json(categories))
}

/// Paginated products belonging to a category.
async fn products_in(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Product>>> {
    // A missing category is a 404, not an empty page
    CategoryRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category with id {id} does not exist")))?;

    let products = ProductRepository::new(state.pool())
        .list_by_category(id, page.offset(), page.limit())
        .await?;
    Ok(Json(products))
}

/// Delete a category and its products. Staff only.
async fn remove(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<CategoryId>,
) -> Result<Json<Value>> {
    CategoryRepository::new(state.pool()).delete(id).await?;
    Ok(Json(json!({ "detail": format!("Category {id} has been deleted") })))
}
