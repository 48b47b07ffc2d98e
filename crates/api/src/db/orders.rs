//! Order repository for database operations.
//!
//! Order placement is the one genuinely transactional flow in the system:
//! the order row, its line items, and the matching inventory decrements all
//! commit or roll back together.

use std::collections::HashMap;

use sqlx::PgPool;

use northloom_core::{OrderId, Price, ProductId};

use super::{RepositoryError, map_constraint_violation};
use crate::models::{Order, OrderItem};

const COLUMNS: &str = "id, full_name, telephone, paid, delivered, returned, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, order_id, product_id, size, quantity, price, created_at, updated_at";

/// Input for placing an order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub full_name: String,
    pub telephone: String,
    pub items: Vec<NewOrderItem>,
}

/// One requested line of a new order.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub size: String,
    pub quantity: i32,
    pub price: Price,
}

/// Partial update for an order. Item changes are matched by size.
#[derive(Debug, Clone)]
pub struct OrderChanges {
    pub id: OrderId,
    pub full_name: Option<String>,
    pub telephone: Option<String>,
    pub paid: Option<bool>,
    pub delivered: Option<bool>,
    pub items: Vec<OrderItemChanges>,
}

/// Partial update for one order line, matched by `(order_id, size)`.
#[derive(Debug, Clone)]
pub struct OrderItemChanges {
    pub size: String,
    pub quantity: Option<i32>,
    pub price: Option<Price>,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order: insert the order and its items, decrement inventory.
    ///
    /// The decrement is guarded (`quantity >= requested`), so concurrent
    /// orders cannot drive stock negative. Any failing line rolls back the
    /// whole order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if a line references a
    /// product/size pair with no inventory row,
    /// `RepositoryError::InsufficientStock` when stock cannot cover a line,
    /// `RepositoryError::InvalidReference` for an unknown product.
    pub async fn create(&self, new: NewOrder) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            "INSERT INTO orders (full_name, telephone) VALUES ($1, $2) RETURNING {COLUMNS}"
        ))
        .bind(&new.full_name)
        .bind(&new.telephone)
        .fetch_one(&mut *tx)
        .await?;

        for item in &new.items {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, size, quantity, price)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(order.id)
            .bind(item.product_id)
            .bind(&item.size)
            .bind(item.quantity)
            .bind(item.price)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_constraint_violation(e, "duplicate order line", "unknown product"))?;

            let decremented = sqlx::query(
                "UPDATE inventory SET quantity = quantity - $3, updated_at = now()
                 WHERE product_id = $1 AND size = $2 AND quantity >= $3",
            )
            .bind(item.product_id)
            .bind(&item.size)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;

            if decremented.rows_affected() == 0 {
                // Distinguish "no such size" from "not enough left"
                let existing: Option<i32> = sqlx::query_scalar(
                    "SELECT quantity FROM inventory WHERE product_id = $1 AND size = $2",
                )
                .bind(item.product_id)
                .bind(&item.size)
                .fetch_optional(&mut *tx)
                .await?;

                return Err(match existing {
                    Some(_) => RepositoryError::InsufficientStock {
                        product_id: item.product_id,
                        size: item.size.clone(),
                    },
                    None => RepositoryError::NotFound,
                });
            }
        }

        tx.commit().await?;

        self.get(order.id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Get an order by ID with its items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, Order>(&format!("SELECT {COLUMNS} FROM orders WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        match row {
            Some(order) => {
                let mut loaded = self.load_items(vec![order]).await?;
                Ok(loaded.pop())
            }
            None => Ok(None),
        }
    }

    /// Paginated order listing with items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, Order>(&format!(
            "SELECT {COLUMNS} FROM orders ORDER BY id OFFSET $1 LIMIT $2"
        ))
        .bind(offset)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        self.load_items(rows).await
    }

    /// All orders placed under one telephone number, with items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_by_telephone(&self, telephone: &str) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, Order>(&format!(
            "SELECT {COLUMNS} FROM orders WHERE telephone = $1 ORDER BY id"
        ))
        .bind(telephone)
        .fetch_all(self.pool)
        .await?;

        self.load_items(rows).await
    }

    /// Update order flags/contact info and line items matched by size.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn update_info(&self, changes: OrderChanges) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        for item in &changes.items {
            sqlx::query(
                "UPDATE order_items SET
                    quantity = COALESCE($3, quantity),
                    price = COALESCE($4, price),
                    updated_at = now()
                 WHERE order_id = $1 AND size = $2",
            )
            .bind(changes.id)
            .bind(&item.size)
            .bind(item.quantity)
            .bind(item.price)
            .execute(&mut *tx)
            .await?;
        }

        let updated = sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders SET
                full_name = COALESCE($2, full_name),
                telephone = COALESCE($3, telephone),
                paid = COALESCE($4, paid),
                delivered = COALESCE($5, delivered),
                updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        ))
        .bind(changes.id)
        .bind(&changes.full_name)
        .bind(&changes.telephone)
        .bind(changes.paid)
        .bind(changes.delivered)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        tx.commit().await?;

        self.get(updated.id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Return an order: restock every line and mark the order returned.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist,
    /// `RepositoryError::Conflict` if it was already returned (restocking
    /// twice would fabricate inventory).
    pub async fn mark_returned(&self, id: OrderId) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {COLUMNS} FROM orders WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        if order.returned {
            return Err(RepositoryError::Conflict(
                "order has already been returned".to_owned(),
            ));
        }

        let items = sqlx::query_as::<_, OrderItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = $1"
        ))
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        for item in &items {
            let restocked = sqlx::query(
                "UPDATE inventory SET quantity = quantity + $3, updated_at = now()
                 WHERE product_id = $1 AND size = $2",
            )
            .bind(item.product_id)
            .bind(&item.size)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;

            if restocked.rows_affected() == 0 {
                // Order lines block product deletion, so this only fires on
                // hand-edited data. The return still goes through.
                tracing::warn!(
                    order_id = %id,
                    product_id = %item.product_id,
                    size = %item.size,
                    "no inventory row to restock on return"
                );
            }
        }

        sqlx::query("UPDATE orders SET returned = true, updated_at = now() WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.get(id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Attach line items to a batch of flat orders.
    async fn load_items(&self, mut orders: Vec<Order>) -> Result<Vec<Order>, RepositoryError> {
        if orders.is_empty() {
            return Ok(orders);
        }

        let ids: Vec<i32> = orders.iter().map(|o| o.id.as_i32()).collect();

        let items = sqlx::query_as::<_, OrderItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = ANY($1) ORDER BY id"
        ))
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut items_by_order: HashMap<i32, Vec<OrderItem>> = HashMap::new();
        for item in items {
            items_by_order
                .entry(item.order_id.as_i32())
                .or_default()
                .push(item);
        }

        for order in &mut orders {
            order.items = items_by_order
                .remove(&order.id.as_i32())
                .unwrap_or_default();
        }

        Ok(orders)
    }
}
