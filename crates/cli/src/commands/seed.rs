//! Seed the database with a small demo catalog.
//!
//! Intended for local development: a couple of categories, a handful of
//! products with per-size stock, and one editorial block. Skips seeding if
//! the catalog already has data so it is safe to run twice.

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use northloom_api::db::RepositoryError;
use northloom_api::db::categories::CategoryRepository;
use northloom_api::db::content::ContentRepository;
use northloom_api::db::products::{InventoryEntry, NewProduct, ProductRepository};
use northloom_api::db::subcategories::SubcategoryRepository;
use northloom_core::Price;

use super::migrate::MigrationError;

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Required environment variable is missing.
    #[error(transparent)]
    Environment(#[from] MigrationError),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Repository error.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Seed the demo catalog.
///
/// # Errors
///
/// Returns `SeedError` if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url = super::migrate::database_url()?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    let categories = CategoryRepository::new(&pool);

    if !categories.list().await?.is_empty() {
        tracing::info!("Catalog already has data, nothing to do");
        return Ok(());
    }

    tracing::info!("Seeding demo catalog...");

    let outerwear = categories.create("Outerwear").await?;
    let knitwear = categories.create("Knitwear").await?;

    let subcategories = SubcategoryRepository::new(&pool);
    let jackets = subcategories.create("Jackets").await?;
    let sweaters = subcategories.create("Sweaters").await?;

    let products = ProductRepository::new(&pool);

    products
        .create(NewProduct {
            name: "Fjord parka".to_owned(),
            article: "NL-0001".to_owned(),
            base_price: Price::new(Decimal::new(18_900, 2)),
            sale_price: None,
            description: Some("Waterproof shell with a wool liner.".to_owned()),
            weight: Some(Decimal::from(1_200)),
            product_origin: Some("Norway".to_owned()),
            category_id: outerwear.id,
            subcategory_id: jackets.id,
            inventory: vec![
                InventoryEntry {
                    size: "S".to_owned(),
                    quantity: 5,
                },
                InventoryEntry {
                    size: "M".to_owned(),
                    quantity: 8,
                },
                InventoryEntry {
                    size: "L".to_owned(),
                    quantity: 3,
                },
            ],
            images: vec!["https://cdn.example.com/fjord-parka.jpg".to_owned()],
        })
        .await?;

    products
        .create(NewProduct {
            name: "Harbour sweater".to_owned(),
            article: "NL-0002".to_owned(),
            base_price: Price::new(Decimal::new(9_900, 2)),
            sale_price: Some(Price::new(Decimal::new(7_900, 2))),
            description: Some("Heavy-gauge merino crew neck.".to_owned()),
            weight: Some(Decimal::from(600)),
            product_origin: Some("Iceland".to_owned()),
            category_id: knitwear.id,
            subcategory_id: sweaters.id,
            inventory: vec![
                InventoryEntry {
                    size: "M".to_owned(),
                    quantity: 12,
                },
                InventoryEntry {
                    size: "L".to_owned(),
                    quantity: 7,
                },
            ],
            images: vec!["https://cdn.example.com/harbour-sweater.jpg".to_owned()],
        })
        .await?;

    ContentRepository::new(&pool)
        .create(
            "About us",
            "Northloom makes cold-weather clothing built to last.",
        )
        .await?;

    tracing::info!("Demo catalog seeded!");
    Ok(())
}
