//! PostgreSQL persistence for the matchup and review backend.
//!
//! Repositories are zero-sized structs with async methods taking `&PgPool`.
//! [`PgVoteStore`] adapts them to the tally engine's
//! [`VoteStore`](cookie_core::vote::VoteStore) seam.

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;
pub mod vote_store;

pub use vote_store::PgVoteStore;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
