//! HTTP-level integration tests for matchup creation, voting, and reads.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{body_json, get, post_json, post_json_auth, seed_movie, seed_user, token_for};
use cookie_api::router::build_app_router;
use cookie_api::state::AppState;
use cookie_core::matchup::{MatchupStatus, NewMatchup, NewMatchupMovie, VotePolicy};
use cookie_core::points::MAX_AXIS_DELTA;
use cookie_core::roles::{ROLE_ADMIN, ROLE_USER};
use cookie_core::types::DbId;
use cookie_db::repositories::MatchupRepo;
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Request body for a matchup between two freshly seeded movies.
async fn matchup_body(pool: &PgPool, title: &str, starts_in: Duration) -> serde_json::Value {
    let first = seed_movie(pool, &format!("{title} One")).await;
    let second = seed_movie(pool, &format!("{title} Two")).await;
    let start_at = Utc::now() + starts_in;
    json!({
        "title": title,
        "matchup_type": "GENRE",
        "start_at": start_at.to_rfc3339(),
        "end_at": (start_at + Duration::days(7)).to_rfc3339(),
        "movie1": { "movie_id": first, "movie_title": format!("{title} One"), "movie_poster": null },
        "movie2": { "movie_id": second, "movie_title": format!("{title} Two"), "movie_poster": "two.jpg" },
    })
}

/// Create an open matchup through the admin endpoint; returns
/// `(matchup_id, [matchup_movie_id; 2])`.
async fn create_open_matchup(pool: &PgPool, title: &str) -> (DbId, [DbId; 2]) {
    let admin = seed_user(pool, &format!("{title}-admin"), ROLE_ADMIN).await;
    let body = matchup_body(pool, title, -Duration::hours(1)).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/matchups",
        body,
        &token_for(admin, ROLE_ADMIN),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let ids = &json["data"]["movie_ids"];
    (
        json["data"]["id"].as_i64().unwrap(),
        [ids[0].as_i64().unwrap(), ids[1].as_i64().unwrap()],
    )
}

fn vote_uri(matchup_id: DbId, matchup_movie_id: DbId) -> String {
    format!("/api/v1/matchups/{matchup_id}/movies/{matchup_movie_id}/vote")
}

// ---------------------------------------------------------------------------
// Admin creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_creates_matchup_with_status_from_window(pool: PgPool) {
    let admin = seed_user(&pool, "curator", ROLE_ADMIN).await;
    let body = matchup_body(&pool, "Upcoming", Duration::days(1)).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/matchups",
        body,
        &token_for(admin, ROLE_ADMIN),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "Upcoming");
    assert_eq!(json["data"]["status"], "SCHEDULED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_admin_cannot_create_matchups(pool: PgPool) {
    let user = seed_user(&pool, "viewer", ROLE_USER).await;
    let body = matchup_body(&pool, "Forbidden", Duration::zero()).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/matchups",
        body.clone(),
        &token_for(user, ROLE_USER),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json(common::build_test_app(pool), "/api/v1/admin/matchups", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn matchup_needs_two_distinct_existing_movies(pool: PgPool) {
    let admin = seed_user(&pool, "strict", ROLE_ADMIN).await;
    let token = token_for(admin, ROLE_ADMIN);

    let mut same_movie = matchup_body(&pool, "Mirror", Duration::zero()).await;
    same_movie["movie2"]["movie_id"] = same_movie["movie1"]["movie_id"].clone();
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/matchups",
        same_movie,
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut missing_movie = matchup_body(&pool, "Ghost", Duration::zero()).await;
    missing_movie["movie2"]["movie_id"] = json!(987654);
    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/admin/matchups",
        missing_movie,
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Voting
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn vote_returns_participation_and_updates_detail(pool: PgPool) {
    let (matchup_id, movies) = create_open_matchup(&pool, "Vote").await;
    let voter = seed_user(&pool, "voter", ROLE_USER).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &vote_uri(matchup_id, movies[0]),
        json!({
            "charm_point": { "ost": 3 },
            "emotion_point": { "joy": 1, "tension": 1 },
        }),
        &token_for(voter, ROLE_USER),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["user_id"], voter);
    assert_eq!(json["data"]["matchup_movie_id"], movies[0]);

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/matchups/{matchup_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let detail = body_json(response).await["data"].clone();
    assert_eq!(detail["movie1"]["vote_count"], 1);
    assert_eq!(detail["movie1"]["charm_point"]["ost"], 100);
    assert_eq!(detail["movie1"]["charm_point"]["story"], 0);
    assert_eq!(detail["movie1"]["emotion_point"]["joy"], 50);
    assert_eq!(detail["movie2"]["vote_count"], 0);
    assert_eq!(detail["movie2"]["charm_point"]["ost"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_vote_in_same_matchup_is_rejected(pool: PgPool) {
    let (matchup_id, movies) = create_open_matchup(&pool, "Twice").await;
    let voter = seed_user(&pool, "eager", ROLE_USER).await;
    let token = token_for(voter, ROLE_USER);

    let first = post_json_auth(
        common::build_test_app(pool.clone()),
        &vote_uri(matchup_id, movies[0]),
        json!({ "charm_point": { "acting": 2 } }),
        &token,
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = post_json_auth(
        common::build_test_app(pool),
        &vote_uri(matchup_id, movies[1]),
        json!({ "charm_point": { "acting": 2 } }),
        &token,
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(second).await["code"], "DUPLICATE_PARTICIPATION");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn vote_for_movie_of_another_matchup_is_invalid_reference(pool: PgPool) {
    let (first_id, _) = create_open_matchup(&pool, "Left").await;
    let (_, other_movies) = create_open_matchup(&pool, "Right").await;
    let voter = seed_user(&pool, "confused", ROLE_USER).await;

    let response = post_json_auth(
        common::build_test_app(pool),
        &vote_uri(first_id, other_movies[0]),
        json!({ "charm_point": { "ost": 1 } }),
        &token_for(voter, ROLE_USER),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "INVALID_REFERENCE");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn vote_rejections_for_bad_input(pool: PgPool) {
    let (matchup_id, movies) = create_open_matchup(&pool, "Bad").await;
    let voter = seed_user(&pool, "careless", ROLE_USER).await;
    let token = token_for(voter, ROLE_USER);

    let negative = post_json_auth(
        common::build_test_app(pool.clone()),
        &vote_uri(matchup_id, movies[0]),
        json!({ "emotion_point": { "angry": -4 } }),
        &token,
    )
    .await;
    assert_eq!(negative.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(negative).await["code"], "VALIDATION_ERROR");

    let missing = post_json_auth(
        common::build_test_app(pool.clone()),
        &vote_uri(999_999, movies[0]),
        json!({}),
        &token,
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let anonymous = post_json(
        common::build_test_app(pool.clone()),
        &vote_uri(matchup_id, movies[0]),
        json!({}),
    )
    .await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    // None of the rejected attempts consumed the user's vote.
    let accepted = post_json_auth(
        common::build_test_app(pool),
        &vote_uri(matchup_id, movies[1]),
        json!({}),
        &token,
    )
    .await;
    assert_eq!(accepted.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn oversized_deltas_are_rejected_before_touching_points(pool: PgPool) {
    let (matchup_id, movies) = create_open_matchup(&pool, "Huge").await;
    let first = seed_user(&pool, "greedy", ROLE_USER).await;
    let second = seed_user(&pool, "modest", ROLE_USER).await;

    for ost in [i64::MAX, MAX_AXIS_DELTA + 1] {
        let response = post_json_auth(
            common::build_test_app(pool.clone()),
            &vote_uri(matchup_id, movies[0]),
            json!({ "charm_point": { "ost": ost } }),
            &token_for(first, ROLE_USER),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }

    for (voter, ost) in [(first, MAX_AXIS_DELTA), (second, 5)] {
        let response = post_json_auth(
            common::build_test_app(pool.clone()),
            &vote_uri(matchup_id, movies[0]),
            json!({ "charm_point": { "ost": ost } }),
            &token_for(voter, ROLE_USER),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let movie = MatchupRepo::find_movie(&pool, movies[0])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(movie.ost, MAX_AXIS_DELTA + 5);
    assert_eq!(movie.vote_count, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn active_only_policy_rejects_votes_on_scheduled_matchups(pool: PgPool) {
    let admin = seed_user(&pool, "planner", ROLE_ADMIN).await;
    let voter = seed_user(&pool, "early", ROLE_USER).await;

    let mut config = common::test_config();
    config.vote_policy = VotePolicy::ActiveOnly;
    let state = AppState::new(pool.clone(), config);

    let body = matchup_body(&pool, "Later", Duration::days(2)).await;
    let response = post_json_auth(
        build_app_router(state.clone()),
        "/api/v1/admin/matchups",
        body,
        &token_for(admin, ROLE_ADMIN),
    )
    .await;
    let json = body_json(response).await;
    let matchup_id = json["data"]["id"].as_i64().unwrap();
    let movie_id = json["data"]["movie_ids"][0].as_i64().unwrap();

    let response = post_json_auth(
        build_app_router(state),
        &vote_uri(matchup_id, movie_id),
        json!({ "charm_point": { "visual": 1 } }),
        &token_for(voter, ROLE_USER),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_matchup_detail_is_404(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/api/v1/matchups/424242").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn history_lists_finished_matchups_only(pool: PgPool) {
    create_open_matchup(&pool, "Running").await;

    let first = seed_movie(&pool, "Old One").await;
    let second = seed_movie(&pool, "Old Two").await;
    let start_at = Utc::now() - Duration::days(30);
    let finished = NewMatchup {
        title: "Finished".to_string(),
        matchup_type: "DIRECTOR".to_string(),
        start_at,
        end_at: start_at + Duration::days(7),
        movie1: NewMatchupMovie {
            movie_id: first,
            movie_title: "Old One".to_string(),
            movie_poster: None,
        },
        movie2: NewMatchupMovie {
            movie_id: second,
            movie_title: "Old Two".to_string(),
            movie_poster: None,
        },
    };
    let row = MatchupRepo::create(&pool, &finished, MatchupStatus::Expired)
        .await
        .unwrap();

    let response = get(common::build_test_app(pool), "/api/v1/matchups/history").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], row.id);
    assert_eq!(items[0]["title"], "Finished");
    assert!(items[0].get("movie1").is_none());
}
