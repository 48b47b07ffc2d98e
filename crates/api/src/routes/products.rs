//! Product route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};

use northloom_core::{CategoryId, Price, ProductId, SubcategoryId};

use super::Pagination;
use crate::db::products::{InventoryEntry, NewProduct, ProductChanges, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireStaff;
use crate::models::Product;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/update", put(update))
        .route("/", get(list))
        .route("/{id}", get(fetch).delete(remove))
}

/// A size/quantity pair as sent by clients.
#[derive(Debug, Deserialize)]
pub struct InventoryPayload {
    pub size: String,
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct CreateProduct {
    #[serde(default = "default_name")]
    pub name: String,
    pub article: String,
    pub base_price: Price,
    pub sale_price: Option<Price>,
    pub description: Option<String>,
    pub weight: Option<Decimal>,
    pub product_origin: Option<String>,
    pub category_id: CategoryId,
    pub subcategory_id: SubcategoryId,
    #[serde(default)]
    pub inventory: Vec<InventoryPayload>,
    #[serde(default)]
    pub images: Vec<String>,
}

fn default_name() -> String {
    "Unnamed product".to_owned()
}

/// Partial update; omitted fields keep their current value. Inventory
/// entries are upserted by size.
#[derive(Debug, Deserialize)]
pub struct UpdateProduct {
    pub id: ProductId,
    pub name: Option<String>,
    pub article: Option<String>,
    pub base_price: Option<Price>,
    pub sale_price: Option<Price>,
    pub description: Option<String>,
    pub weight: Option<Decimal>,
    pub product_origin: Option<String>,
    pub category_id: Option<CategoryId>,
    pub subcategory_id: Option<SubcategoryId>,
    #[serde(default)]
    pub inventory: Vec<InventoryPayload>,
}

fn to_entries(inventory: Vec<InventoryPayload>) -> Result<Vec<InventoryEntry>> {
    inventory
        .into_iter()
        .map(|entry| {
            if entry.quantity < 0 {
                return Err(AppError::BadRequest(format!(
                    "Inventory quantity for size {} cannot be negative",
                    entry.size
                )));
            }
            Ok(InventoryEntry {
                size: entry.size,
                quantity: entry.quantity,
            })
        })
        .collect()
}

/// Create a product with its inventory and image URLs. Staff only.
async fn create(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Json(payload): Json<CreateProduct>,
) -> Result<(StatusCode, Json<Product>)> {
    if !payload.base_price.is_positive() {
        return Err(AppError::BadRequest(
            "Base price must be positive".to_owned(),
        ));
    }

    let product = ProductRepository::new(state.pool())
        .create(NewProduct {
            name: payload.name,
            article: payload.article,
            base_price: payload.base_price,
            sale_price: payload.sale_price,
            description: payload.description,
            weight: payload.weight,
            product_origin: payload.product_origin,
            category_id: payload.category_id,
            subcategory_id: payload.subcategory_id,
            inventory: to_entries(payload.inventory)?,
            images: payload.images,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// Apply a partial update to a product. Staff only.
async fn update(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Json(payload): Json<UpdateProduct>,
) -> Result<Json<Product>> {
    if payload.base_price.is_some_and(|p| !p.is_positive()) {
        return Err(AppError::BadRequest(
            "Base price must be positive".to_owned(),
        ));
    }

    let product = ProductRepository::new(state.pool())
        .update(ProductChanges {
            id: payload.id,
            name: payload.name,
            article: payload.article,
            base_price: payload.base_price,
            sale_price: payload.sale_price,
            description: payload.description,
            weight: payload.weight,
            product_origin: payload.product_origin,
            category_id: payload.category_id,
            subcategory_id: payload.subcategory_id,
            inventory: to_entries(payload.inventory)?,
        })
        .await?;

    Ok(Json(product))
}

/// Paginated product listing.
async fn list(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool())
        .list(page.offset(), page.limit())
        .await?;
    Ok(Json(products))
}

/// Fetch a single product with inventory and images.
async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product with id {id} does not exist")))?;
    Ok(Json(product))
}

/// Delete a product. Staff only.
async fn remove(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<ProductId>,
) -> Result<Json<Value>> {
    ProductRepository::new(state.pool()).delete(id).await?;
    Ok(Json(json!({ "detail": format!("Product {id} has been deleted") })))
}
