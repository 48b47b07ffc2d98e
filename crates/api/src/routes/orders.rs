//! Order route handlers.
//!
//! Placing an order is public (checkout does not require an account);
//! everything else is back-office and staff gated.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use serde::Deserialize;

use northloom_core::{OrderId, Price, ProductId};

use super::Pagination;
use crate::db::orders::{
    NewOrder, NewOrderItem, OrderChanges, OrderItemChanges, OrderRepository,
};
use crate::error::{AppError, Result};
use crate::middleware::RequireStaff;
use crate::models::Order;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/update", put(update))
        .route("/", get(list))
        .route("/{id}", get(fetch))
        .route("/{id}/return", put(mark_returned))
        .route("/customer/{telephone}", get(by_telephone))
}

#[derive(Debug, Deserialize)]
pub struct OrderItemPayload {
    pub product_id: ProductId,
    pub size: String,
    pub quantity: i32,
    pub price: Price,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrder {
    pub full_name: String,
    pub telephone: String,
    pub items: Vec<OrderItemPayload>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderItem {
    pub size: String,
    pub quantity: Option<i32>,
    pub price: Option<Price>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrder {
    pub id: OrderId,
    pub full_name: Option<String>,
    pub telephone: Option<String>,
    pub paid: Option<bool>,
    pub delivered: Option<bool>,
    #[serde(default)]
    pub items: Vec<UpdateOrderItem>,
}

/// Place an order. Decrements inventory for every line; any line that
/// cannot be covered rolls the whole order back.
async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrder>,
) -> Result<(StatusCode, Json<Order>)> {
    if payload.items.is_empty() {
        return Err(AppError::BadRequest(
            "An order must contain at least one item".to_owned(),
        ));
    }
    if payload.items.iter().any(|item| item.quantity <= 0) {
        return Err(AppError::BadRequest(
            "Item quantity must be positive".to_owned(),
        ));
    }
    if payload
        .items
        .iter()
        .any(|item| item.price.amount().is_sign_negative())
    {
        return Err(AppError::BadRequest(
            "Item price cannot be negative".to_owned(),
        ));
    }

    let order = OrderRepository::new(state.pool())
        .create(NewOrder {
            full_name: payload.full_name,
            telephone: payload.telephone,
            items: payload
                .items
                .into_iter()
                .map(|item| NewOrderItem {
                    product_id: item.product_id,
                    size: item.size,
                    quantity: item.quantity,
                    price: item.price,
                })
                .collect(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// Update contact info, payment/delivery flags, and line items. Staff only.
async fn update(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Json(payload): Json<UpdateOrder>,
) -> Result<Json<Order>> {
    let order = OrderRepository::new(state.pool())
        .update_info(OrderChanges {
            id: payload.id,
            full_name: payload.full_name,
            telephone: payload.telephone,
            paid: payload.paid,
            delivered: payload.delivered,
            items: payload
                .items
                .into_iter()
                .map(|item| OrderItemChanges {
                    size: item.size,
                    quantity: item.quantity,
                    price: item.price,
                })
                .collect(),
        })
        .await?;

    Ok(Json(order))
}

/// Paginated order listing. Staff only.
async fn list(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool())
        .list(page.offset(), page.limit())
        .await?;
    Ok(Json(orders))
}

/// Fetch a single order with its items. Staff only.
async fn fetch(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    let order = OrderRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order with id {id} does not exist")))?;
    Ok(Json(order))
}

/// Orders placed under a telephone number. Staff only.
async fn by_telephone(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(telephone): Path<String>,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool())
        .list_by_telephone(&telephone)
        .await?;
    Ok(Json(orders))
}

/// Return an order: restock every line and mark it returned. A second
/// return attempt is rejected with a conflict. Staff only.
async fn mark_returned(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    let order = OrderRepository::new(state.pool()).mark_returned(id).await?;
    Ok(Json(order))
}
