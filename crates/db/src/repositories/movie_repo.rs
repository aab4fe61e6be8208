//! Repository for the `movies` catalog table.

use cookie_core::types::DbId;
use sqlx::PgPool;

use crate::models::movie::{CreateMovie, Movie};

/// Column list for movies queries.
const COLUMNS: &str = "id, title, poster, score, created_at, updated_at";

/// Catalog lookups. Catalog curation itself happens elsewhere.
pub struct MovieRepo;

impl MovieRepo {
    /// Insert a catalog movie, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateMovie) -> Result<Movie, sqlx::Error> {
        let query = format!(
            "INSERT INTO movies (title, poster, score)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(&input.title)
            .bind(&input.poster)
            .bind(input.score)
            .fetch_one(pool)
            .await
    }

    /// Find a movie by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM movies WHERE id = $1");
        sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
