//! Subcategory route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::{Value, json};

use northloom_core::SubcategoryId;

use super::Pagination;
use crate::db::products::ProductRepository;
use crate::db::subcategories::SubcategoryRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireStaff;
use crate::models::{Product, Subcategory};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/update", put(update))
        .route("/", get(list))
        .route("/{id}", get(products_in).delete(remove))
}

#[derive(Debug, Deserialize)]
pub struct CreateSubcategory {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSubcategory {
    pub id: SubcategoryId,
    pub name: String,
}

/// Create a subcategory. Staff only.
async fn create(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Json(payload): Json<CreateSubcategory>,
) -> Result<(StatusCode, Json<Subcategory>)> {
    let subcategory = SubcategoryRepository::new(state.pool())
        .create(&payload.name)
        .await?;
    Ok((StatusCode::CREATED, Json(subcategory)))
}

/// Rename a subcategory. Staff only.
async fn update(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Json(payload): Json<UpdateSubcategory>,
) -> Result<Json<Subcategory>> {
    let subcategory = SubcategoryRepository::new(state.pool())
        .update(payload.id, &payload.name)
        .await?;
    Ok(Json(subcategory))
}

/// List all subcategories.
async fn list(State(state): State<AppState>) -> Result<Json<Vec<Subcategory>>> {
    let subcategories = SubcategoryRepository::new(state.pool()).list().await?;
    Ok(Json(subcategories))
}

/// Paginated products belonging to a subcategory.
async fn products_in(
    State(state): State<AppState>,
    Path(id): Path<SubcategoryId>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Product>>> {
    SubcategoryRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Subcategory with id {id} does not exist")))?;

    let products = ProductRepository::new(state.pool())
        .list_by_subcategory(id, page.offset(), page.limit())
        .await?;
    Ok(Json(products))
}

/// Delete a subcategory and its products. Staff only.
async fn remove(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<SubcategoryId>,
) -> Result<Json<Value>> {
    SubcategoryRepository::new(state.pool()).delete(id).await?;
    Ok(Json(json!({ "detail": format!("Subcategory {id} has been deleted") })))
}
