//! Repository for `matchups`, `matchup_movies`, and their score sets.

use cookie_core::matchup::{MatchupStatus, NewMatchup};
use cookie_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::matchup::{MatchupMovieRow, MatchupRow, StatusAdvance};

/// Matchup columns joined with both entry ids (aliases `m`, `m1`, `m2`).
const MATCHUP_SELECT: &str = "SELECT m.id, m.title, m.matchup_type, m.start_at, m.end_at, \
        m.status, m1.id AS movie1_id, m2.id AS movie2_id, m.created_at, m.updated_at \
     FROM matchups m \
     JOIN matchup_movies m1 ON m1.matchup_id = m.id AND m1.slot = 1 \
     JOIN matchup_movies m2 ON m2.matchup_id = m.id AND m2.slot = 2";

/// Matchup movie columns joined with both score sets (aliases `mm`, `c`, `e`).
const MOVIE_SELECT: &str = "SELECT mm.id, mm.matchup_id, mm.slot, mm.movie_id, \
        mm.movie_title, mm.movie_poster, mm.vote_count, \
        c.ost, c.directing, c.story, c.dialogue, c.visual, c.acting, c.special_effects, \
        e.touching, e.angry, e.joy, e.immersion, e.excited, e.empathy, e.tension \
     FROM matchup_movies mm \
     JOIN charm_points c ON c.matchup_movie_id = mm.id \
     JOIN emotion_points e ON e.matchup_movie_id = mm.id";

/// Provides matchup creation, lookup, and status maintenance.
pub struct MatchupRepo;

impl MatchupRepo {
    /// Create a matchup with two zero-scored entries in one transaction.
    ///
    /// `status` is the initial status, normally derived from the window.
    pub async fn create(
        pool: &PgPool,
        input: &NewMatchup,
        status: MatchupStatus,
    ) -> Result<MatchupRow, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (matchup_id,): (DbId,) = sqlx::query_as(
            "INSERT INTO matchups (title, matchup_type, start_at, end_at, status)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(input.title.trim())
        .bind(input.matchup_type.trim())
        .bind(input.start_at)
        .bind(input.end_at)
        .bind(status.as_str())
        .fetch_one(&mut *tx)
        .await?;

        for (slot, side) in [(1i16, &input.movie1), (2i16, &input.movie2)] {
            let (matchup_movie_id,): (DbId,) = sqlx::query_as(
                "INSERT INTO matchup_movies (matchup_id, slot, movie_id, movie_title, movie_poster)
                 VALUES ($1, $2, $3, $4, $5)
                 RETURNING id",
            )
            .bind(matchup_id)
            .bind(slot)
            .bind(side.movie_id)
            .bind(&side.movie_title)
            .bind(&side.movie_poster)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query("INSERT INTO charm_points (matchup_movie_id) VALUES ($1)")
                .bind(matchup_movie_id)
                .execute(&mut *tx)
                .await?;
            sqlx::query("INSERT INTO emotion_points (matchup_movie_id) VALUES ($1)")
                .bind(matchup_movie_id)
                .execute(&mut *tx)
                .await?;
        }

        let query = format!("{MATCHUP_SELECT} WHERE m.id = $1");
        let row = sqlx::query_as::<_, MatchupRow>(&query)
            .bind(matchup_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row)
    }

    /// Find a matchup by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MatchupRow>, sqlx::Error> {
        let query = format!("{MATCHUP_SELECT} WHERE m.id = $1");
        sqlx::query_as::<_, MatchupRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List matchups in a status, most recently ended first.
    pub async fn list_by_status(
        pool: &PgPool,
        status: MatchupStatus,
    ) -> Result<Vec<MatchupRow>, sqlx::Error> {
        let query = format!("{MATCHUP_SELECT} WHERE m.status = $1 ORDER BY m.end_at DESC, m.id DESC");
        sqlx::query_as::<_, MatchupRow>(&query)
            .bind(status.as_str())
            .fetch_all(pool)
            .await
    }

    /// Find a matchup movie with its score sets.
    pub async fn find_movie(
        pool: &PgPool,
        matchup_movie_id: DbId,
    ) -> Result<Option<MatchupMovieRow>, sqlx::Error> {
        let query = format!("{MOVIE_SELECT} WHERE mm.id = $1");
        sqlx::query_as::<_, MatchupMovieRow>(&query)
            .bind(matchup_movie_id)
            .fetch_optional(pool)
            .await
    }

    /// Move matchups forward to the status their window implies at `now`.
    ///
    /// Never moves a matchup backwards: only `SCHEDULED -> ACTIVE` and
    /// `* -> EXPIRED` updates are issued.
    pub async fn advance_statuses(
        pool: &PgPool,
        now: Timestamp,
    ) -> Result<StatusAdvance, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let expired = sqlx::query(
            "UPDATE matchups SET status = $2, updated_at = NOW()
             WHERE status <> $2 AND end_at <= $1",
        )
        .bind(now)
        .bind(MatchupStatus::Expired.as_str())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let activated = sqlx::query(
            "UPDATE matchups SET status = $2, updated_at = NOW()
             WHERE status = $3 AND start_at <= $1 AND end_at > $1",
        )
        .bind(now)
        .bind(MatchupStatus::Active.as_str())
        .bind(MatchupStatus::Scheduled.as_str())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;
        Ok(StatusAdvance { activated, expired })
    }
}
