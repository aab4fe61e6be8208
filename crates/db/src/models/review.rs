//! Review rows and the joined feed summary.

use cookie_core::review::{ReviewAuthor, ReviewMovie, ReviewSummary};
use cookie_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `reviews` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    pub user_id: DbId,
    pub movie_id: DbId,
    pub content: String,
    pub movie_score: f64,
    pub is_hide: bool,
    pub is_spoiler: bool,
    pub review_like: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for creating a review. The author comes from the token.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReview {
    pub movie_id: DbId,
    pub content: String,
    pub movie_score: f64,
    #[serde(default)]
    pub is_spoiler: bool,
}

/// A review joined with its movie, author, and counters.
#[derive(Debug, Clone, FromRow)]
pub struct ReviewSummaryRow {
    pub review_id: DbId,
    pub content: String,
    pub movie_score: f64,
    pub is_hide: bool,
    pub is_spoiler: bool,
    pub review_like: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub movie_id: DbId,
    pub movie_title: String,
    pub movie_poster: Option<String>,
    pub movie_rating: f64,
    pub user_id: DbId,
    pub nickname: String,
    pub profile_image: Option<String>,
    pub main_badge_image: Option<String>,
    pub liked_by_user: bool,
    pub comments: i64,
}

impl From<ReviewSummaryRow> for ReviewSummary {
    fn from(row: ReviewSummaryRow) -> Self {
        ReviewSummary {
            review_id: row.review_id,
            content: row.content,
            movie_score: row.movie_score,
            is_hide: row.is_hide,
            is_spoiler: row.is_spoiler,
            review_like: row.review_like,
            created_at: row.created_at,
            updated_at: row.updated_at,
            movie: ReviewMovie {
                movie_id: row.movie_id,
                title: row.movie_title,
                poster: row.movie_poster,
                score: row.movie_rating,
            },
            user: ReviewAuthor {
                user_id: row.user_id,
                nickname: row.nickname,
                profile_image: row.profile_image,
                main_badge_image: row.main_badge_image,
            },
            liked_by_user: row.liked_by_user,
            comments: row.comments,
        }
    }
}
