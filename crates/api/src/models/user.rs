//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use northloom_core::{Email, UserId};

/// A backend user.
///
/// `is_staff` unlocks catalog/order management; `is_superuser` additionally
/// unlocks user management. The password hash is deliberately not part of
/// this type so it can never end up in a response body - the repository
/// exposes it only through [`crate::db::users::UserRepository::get_password_hash`].
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Whether this user may manage catalog, content, and orders.
    #[must_use]
    pub const fn is_staff_member(&self) -> bool {
        self.is_staff || self.is_superuser
    }
}
