//! Editorial content blocks (banners, about pages, announcements).

use chrono::{DateTime, Utc};
use serde::Serialize;

use northloom_core::ContentId;

/// A titled block of free-form text.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Content {
    pub id: ContentId,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
