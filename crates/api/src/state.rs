use std::sync::Arc;

use cookie_core::vote::VoteTallyEngine;
use cookie_db::PgVoteStore;
use cookie_events::{BroadcastRegistry, PushEvent, ReviewFeedEvent};

use crate::config::ServerConfig;

/// Vote engine wired to PostgreSQL.
pub type VoteEngine = VoteTallyEngine<PgVoteStore>;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: cookie_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Matchup vote tally engine.
    pub votes: Arc<VoteEngine>,
    /// Subscribers to the review feed stream.
    pub review_feed: Arc<BroadcastRegistry<ReviewFeedEvent>>,
    /// Subscribers to the push-notification stream.
    pub push_feed: Arc<BroadcastRegistry<PushEvent>>,
}

impl AppState {
    /// Build state around `pool`, creating the engine and both registries
    /// from `config`.
    pub fn new(pool: cookie_db::DbPool, config: ServerConfig) -> Self {
        let votes = VoteTallyEngine::new(PgVoteStore::new(pool.clone()), config.vote_policy);
        let buffer = config.sse_subscriber_buffer;
        Self {
            pool,
            config: Arc::new(config),
            votes: Arc::new(votes),
            review_feed: Arc::new(BroadcastRegistry::new("review_feed", buffer)),
            push_feed: Arc::new(BroadcastRegistry::new("push_feed", buffer)),
        }
    }
}
