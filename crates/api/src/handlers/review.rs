//! Review creation and fan-out to the live streams.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use cookie_core::error::CoreError;
use cookie_core::review::{validate_review, ReviewSummary};
use cookie_db::models::review::CreateReview;
use cookie_db::repositories::{MovieRepo, ReviewRepo, UserRepo};
use cookie_events::{PushEvent, ReviewFeedEvent};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/reviews
///
/// Create the caller's review of a movie and broadcast it to the review
/// feed and push-notification subscribers. One review per user per movie.
pub async fn create_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateReview>,
) -> AppResult<impl IntoResponse> {
    validate_review(&input.content, input.movie_score).map_err(AppError::BadRequest)?;

    if !UserRepo::exists(&state.pool, auth.user_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }));
    }
    if MovieRepo::find_by_id(&state.pool, input.movie_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Movie",
            id: input.movie_id,
        }));
    }
    if ReviewRepo::find_by_user_and_movie(&state.pool, auth.user_id, input.movie_id)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "User {} has already reviewed movie {}",
            auth.user_id, input.movie_id
        ))));
    }

    let review = ReviewRepo::create(&state.pool, auth.user_id, &input).await?;
    let summary: ReviewSummary =
        ReviewRepo::find_summary(&state.pool, review.id, Some(auth.user_id))
            .await?
            .ok_or_else(|| {
                AppError::InternalError(format!("Review {} missing after insert", review.id))
            })?
            .into();

    broadcast_review(&state, &summary).await;

    tracing::info!(
        review_id = review.id,
        movie_id = input.movie_id,
        user_id = auth.user_id,
        "Review created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: summary })))
}

/// Publish a new review to both live streams. Delivery is best-effort.
async fn broadcast_review(state: &AppState, summary: &ReviewSummary) {
    let feed = state
        .review_feed
        .publish(ReviewFeedEvent::ReviewCreated(Box::new(summary.clone())))
        .await;
    let push = state
        .push_feed
        .publish(PushEvent::review_posted(summary))
        .await;
    tracing::debug!(review_id = summary.review_id, feed, push, "Review broadcast");
}
