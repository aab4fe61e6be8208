//! Repository for the `reviews` table and the feed summary join.

use cookie_core::types::DbId;
use sqlx::PgPool;

use crate::models::review::{CreateReview, Review, ReviewSummaryRow};

/// Column list for reviews queries.
const COLUMNS: &str = "id, user_id, movie_id, content, movie_score, is_hide, is_spoiler, \
    review_like, created_at, updated_at";

/// Provides review creation and lookups.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Insert a review authored by `user_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateReview,
    ) -> Result<Review, sqlx::Error> {
        let query = format!(
            "INSERT INTO reviews (user_id, movie_id, content, movie_score, is_spoiler)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(user_id)
            .bind(input.movie_id)
            .bind(input.content.trim())
            .bind(input.movie_score)
            .bind(input.is_spoiler)
            .fetch_one(pool)
            .await
    }

    /// Find the review a user wrote for a movie, if any.
    pub async fn find_by_user_and_movie(
        pool: &PgPool,
        user_id: DbId,
        movie_id: DbId,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reviews WHERE user_id = $1 AND movie_id = $2");
        sqlx::query_as::<_, Review>(&query)
            .bind(user_id)
            .bind(movie_id)
            .fetch_optional(pool)
            .await
    }

    /// Load the feed summary for one review.
    ///
    /// `viewer_id` decides `liked_by_user`; pass `None` for anonymous views.
    pub async fn find_summary(
        pool: &PgPool,
        review_id: DbId,
        viewer_id: Option<DbId>,
    ) -> Result<Option<ReviewSummaryRow>, sqlx::Error> {
        sqlx::query_as::<_, ReviewSummaryRow>(
            "SELECT
                r.id AS review_id, r.content, r.movie_score, r.is_hide, r.is_spoiler,
                r.review_like, r.created_at, r.updated_at,
                mv.id AS movie_id, mv.title AS movie_title, mv.poster AS movie_poster,
                mv.score AS movie_rating,
                u.id AS user_id, u.nickname, u.profile_image, u.main_badge_image,
                EXISTS(
                    SELECT 1 FROM review_likes rl
                    WHERE rl.review_id = r.id AND rl.user_id = $2
                ) AS liked_by_user,
                (SELECT COUNT(*) FROM review_comments rc WHERE rc.review_id = r.id) AS comments
             FROM reviews r
             JOIN movies mv ON mv.id = r.movie_id
             JOIN users u ON u.id = r.user_id
             WHERE r.id = $1",
        )
        .bind(review_id)
        .bind(viewer_id)
        .fetch_optional(pool)
        .await
    }
}
