//! Domain types serialized directly into API responses.
//!
//! Flat rows derive `sqlx::FromRow`; aggregate types (product with its
//! inventory and images, order with its items) are assembled by the
//! repositories.

pub mod category;
pub mod content;
pub mod order;
pub mod product;
pub mod user;

pub use category::{Category, Subcategory};
pub use content::Content;
pub use order::{Order, OrderItem};
pub use product::{InventoryLevel, Product, ProductImage};
pub use user::User;
