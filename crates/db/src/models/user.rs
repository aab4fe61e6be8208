//! User rows. Users are managed by the authentication layer; this crate
//! only reads them and creates them for seeding.

use cookie_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub nickname: String,
    pub profile_image: Option<String>,
    pub main_badge_image: Option<String>,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub nickname: String,
    pub profile_image: Option<String>,
    pub main_badge_image: Option<String>,
    pub role: String,
}
