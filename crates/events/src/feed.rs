//! Event shapes streamed to review-feed and push-notification subscribers.

use cookie_core::review::ReviewSummary;
use cookie_core::types::DbId;
use serde::Serialize;

/// SSE event name sent once when a subscriber connects.
pub const EVENT_CONNECTED: &str = "connected";

/// SSE event name for a newly created review.
pub const EVENT_REVIEW_CREATED: &str = "review-created";

/// SSE event name for a push notification about a posted review.
pub const EVENT_REVIEW_POSTED: &str = "review-posted";

/// An event that knows its wire name and can greet a new subscriber.
pub trait NamedEvent: Clone + Send + Sync + Serialize + 'static {
    /// Name written to the SSE `event:` field.
    fn event_name(&self) -> &'static str;

    /// The greeting queued for a freshly registered subscriber.
    fn connected(message: impl Into<String>) -> Self;

    /// JSON payload written to the SSE `data:` field.
    fn data(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Events on the review feed stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReviewFeedEvent {
    Connected(String),
    ReviewCreated(Box<ReviewSummary>),
}

impl NamedEvent for ReviewFeedEvent {
    fn event_name(&self) -> &'static str {
        match self {
            Self::Connected(_) => EVENT_CONNECTED,
            Self::ReviewCreated(_) => EVENT_REVIEW_CREATED,
        }
    }

    fn connected(message: impl Into<String>) -> Self {
        Self::Connected(message.into())
    }
}

/// Events on the push-notification stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PushEvent {
    Connected(String),
    ReviewPosted {
        review_id: DbId,
        movie_id: DbId,
        movie_title: String,
        nickname: String,
    },
}

impl PushEvent {
    /// Push notification announcing `review`.
    pub fn review_posted(review: &ReviewSummary) -> Self {
        Self::ReviewPosted {
            review_id: review.review_id,
            movie_id: review.movie.movie_id,
            movie_title: review.movie.title.clone(),
            nickname: review.user.nickname.clone(),
        }
    }
}

impl NamedEvent for PushEvent {
    fn event_name(&self) -> &'static str {
        match self {
            Self::Connected(_) => EVENT_CONNECTED,
            Self::ReviewPosted { .. } => EVENT_REVIEW_POSTED,
        }
    }

    fn connected(message: impl Into<String>) -> Self {
        Self::Connected(message.into())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use cookie_core::review::{ReviewAuthor, ReviewMovie};

    use super::*;

    fn summary() -> ReviewSummary {
        let now = Utc::now();
        ReviewSummary {
            review_id: 11,
            content: "Loved the score".to_string(),
            movie_score: 4.5,
            is_hide: false,
            is_spoiler: false,
            review_like: 0,
            created_at: now,
            updated_at: now,
            movie: ReviewMovie {
                movie_id: 3,
                title: "Interstellar".to_string(),
                poster: None,
                score: 4.8,
            },
            user: ReviewAuthor {
                user_id: 5,
                nickname: "popcorn".to_string(),
                profile_image: None,
                main_badge_image: None,
            },
            liked_by_user: false,
            comments: 0,
        }
    }

    #[test]
    fn connected_event_is_a_json_string() {
        let event = ReviewFeedEvent::connected("connected");
        assert_eq!(event.event_name(), "connected");
        assert_eq!(event.data().unwrap(), "\"connected\"");
    }

    #[test]
    fn review_created_carries_the_summary() {
        let event = ReviewFeedEvent::ReviewCreated(Box::new(summary()));
        assert_eq!(event.event_name(), "review-created");

        let data: serde_json::Value = serde_json::from_str(&event.data().unwrap()).unwrap();
        assert_eq!(data["review_id"], 11);
        assert_eq!(data["movie"]["title"], "Interstellar");
        assert_eq!(data["user"]["nickname"], "popcorn");
    }

    #[test]
    fn review_posted_summarizes_author_and_movie() {
        let event = PushEvent::review_posted(&summary());
        assert_eq!(event.event_name(), "review-posted");

        let data: serde_json::Value = serde_json::from_str(&event.data().unwrap()).unwrap();
        assert_eq!(
            data,
            serde_json::json!({
                "review_id": 11,
                "movie_id": 3,
                "movie_title": "Interstellar",
                "nickname": "popcorn",
            })
        );
    }
}
