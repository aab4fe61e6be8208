//! Movie catalog rows.

use cookie_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `movies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Movie {
    pub id: DbId,
    pub title: String,
    pub poster: Option<String>,
    pub score: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a catalog movie.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMovie {
    pub title: String,
    pub poster: Option<String>,
    pub score: f64,
}
