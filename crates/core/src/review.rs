//! Review read model and input validation.
//!
//! [`ReviewSummary`] is the shape broadcast to review-feed subscribers when
//! a review is created.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// Lowest accepted review score.
pub const MIN_MOVIE_SCORE: f64 = 0.0;

/// Highest accepted review score.
pub const MAX_MOVIE_SCORE: f64 = 5.0;

/// Maximum review body length in characters.
pub const MAX_CONTENT_LEN: usize = 2000;

/// Movie fields embedded in a review summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewMovie {
    pub movie_id: DbId,
    pub title: String,
    pub poster: Option<String>,
    pub score: f64,
}

/// Author fields embedded in a review summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewAuthor {
    pub user_id: DbId,
    pub nickname: String,
    pub profile_image: Option<String>,
    pub main_badge_image: Option<String>,
}

/// A review with its movie and author, as shown in the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub review_id: DbId,
    pub content: String,
    pub movie_score: f64,
    pub is_hide: bool,
    pub is_spoiler: bool,
    pub review_like: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub movie: ReviewMovie,
    pub user: ReviewAuthor,
    pub liked_by_user: bool,
    pub comments: i64,
}

/// Validate review content and score.
pub fn validate_review(content: &str, movie_score: f64) -> Result<(), String> {
    if content.trim().is_empty() {
        return Err("Review content must not be empty".to_string());
    }
    if content.chars().count() > MAX_CONTENT_LEN {
        return Err(format!(
            "Review content must be at most {MAX_CONTENT_LEN} characters"
        ));
    }
    if !(MIN_MOVIE_SCORE..=MAX_MOVIE_SCORE).contains(&movie_score) {
        return Err(format!(
            "Movie score must be between {MIN_MOVIE_SCORE} and {MAX_MOVIE_SCORE}, got {movie_score}"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_scores_on_the_boundaries() {
        assert!(validate_review("great", 0.0).is_ok());
        assert!(validate_review("great", 5.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range_score() {
        assert!(validate_review("great", 5.5).is_err());
        assert!(validate_review("great", -0.5).is_err());
        assert!(validate_review("great", f64::NAN).is_err());
    }

    #[test]
    fn rejects_blank_content() {
        let err = validate_review("  \n", 3.0).unwrap_err();
        assert!(err.contains("empty"));
    }
}
