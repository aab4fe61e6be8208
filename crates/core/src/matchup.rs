//! Matchup domain types: status machine, vote policy, entities, and read models.
//!
//! A matchup is a timed contest between exactly two movie entries. The
//! matchup owns its entries as a fixed pair of ids; entries point back to
//! their matchup by id only.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::points::{CharmPoints, EmotionPoints, ScoreSet};
use crate::types::{DbId, Timestamp};

/// Maximum length of a matchup title.
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum length of a matchup type label.
pub const MAX_TYPE_LEN: usize = 50;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle of a matchup. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchupStatus {
    Scheduled,
    Active,
    Expired,
}

impl MatchupStatus {
    /// Storage representation (`matchups.status`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "SCHEDULED",
            Self::Active => "ACTIVE",
            Self::Expired => "EXPIRED",
        }
    }

    /// Parse the storage representation.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "SCHEDULED" => Ok(Self::Scheduled),
            "ACTIVE" => Ok(Self::Active),
            "EXPIRED" => Ok(Self::Expired),
            other => Err(CoreError::Internal(format!(
                "Unknown matchup status '{other}'"
            ))),
        }
    }

    /// Whether moving from `self` to `next` is a forward step.
    pub fn can_transition_to(self, next: Self) -> bool {
        self < next
    }

    /// The status a matchup spanning `[start_at, end_at)` holds at `now`.
    pub fn status_for(start_at: Timestamp, end_at: Timestamp, now: Timestamp) -> Self {
        if now >= end_at {
            Self::Expired
        } else if now >= start_at {
            Self::Active
        } else {
            Self::Scheduled
        }
    }
}

impl std::fmt::Display for MatchupStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Vote policy
// ---------------------------------------------------------------------------

/// Which matchup statuses accept votes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VotePolicy {
    /// Votes are accepted regardless of status.
    #[default]
    AnyStatus,
    /// Only `ACTIVE` matchups accept votes.
    ActiveOnly,
}

impl VotePolicy {
    /// Parse a config value (`any_status` / `active_only`).
    pub fn parse(value: &str) -> Result<Self, String> {
        match value.trim() {
            "any_status" => Ok(Self::AnyStatus),
            "active_only" => Ok(Self::ActiveOnly),
            other => Err(format!(
                "Invalid vote policy '{other}'. Must be one of: any_status, active_only"
            )),
        }
    }

    /// Reject the vote if `matchup` is closed under this policy.
    pub fn check(self, matchup: &Matchup) -> Result<(), CoreError> {
        match self {
            Self::AnyStatus => Ok(()),
            Self::ActiveOnly if matchup.status == MatchupStatus::Active => Ok(()),
            Self::ActiveOnly => Err(CoreError::Conflict(format!(
                "Matchup {} is not accepting votes (status {})",
                matchup.id, matchup.status
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A timed contest between exactly two matchup movies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Matchup {
    pub id: DbId,
    pub title: String,
    pub matchup_type: String,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
    pub status: MatchupStatus,
    /// Ids of the two competing entries, in slot order.
    pub movie_ids: [DbId; 2],
}

impl Matchup {
    /// Whether `matchup_movie_id` is one of this matchup's two entries.
    pub fn contains(&self, matchup_movie_id: DbId) -> bool {
        self.movie_ids.contains(&matchup_movie_id)
    }
}

/// One of the two competing entries in a matchup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupMovie {
    pub id: DbId,
    pub matchup_id: DbId,
    pub movie_id: DbId,
    pub movie_title: String,
    pub movie_poster: Option<String>,
    pub vote_count: i64,
    pub charm: CharmPoints,
    pub emotion: EmotionPoints,
}

/// Record that a user spent their one vote in a matchup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Participation {
    pub id: DbId,
    pub user_id: DbId,
    pub matchup_id: DbId,
    pub matchup_movie_id: DbId,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Creation input
// ---------------------------------------------------------------------------

/// One side of a matchup being created.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMatchupMovie {
    pub movie_id: DbId,
    pub movie_title: String,
    pub movie_poster: Option<String>,
}

/// Input for administratively creating a matchup.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMatchup {
    pub title: String,
    pub matchup_type: String,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
    pub movie1: NewMatchupMovie,
    pub movie2: NewMatchupMovie,
}

/// Validate a matchup creation request.
pub fn validate_new_matchup(input: &NewMatchup) -> Result<(), String> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err("Matchup title must not be empty".to_string());
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(format!(
            "Matchup title must be at most {MAX_TITLE_LEN} characters"
        ));
    }
    let matchup_type = input.matchup_type.trim();
    if matchup_type.is_empty() || matchup_type.chars().count() > MAX_TYPE_LEN {
        return Err(format!(
            "Matchup type must be between 1 and {MAX_TYPE_LEN} characters"
        ));
    }
    if input.end_at <= input.start_at {
        return Err("Matchup end_at must be after start_at".to_string());
    }
    if input.movie1.movie_id == input.movie2.movie_id {
        return Err("A matchup needs two different movies".to_string());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read models
// ---------------------------------------------------------------------------

/// A matchup movie with its score sets reported as percentages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupMovieDetail {
    pub id: DbId,
    pub movie_id: DbId,
    pub movie_title: String,
    pub movie_poster: Option<String>,
    pub vote_count: i64,
    pub charm_point: CharmPoints,
    pub emotion_point: EmotionPoints,
}

impl From<&MatchupMovie> for MatchupMovieDetail {
    fn from(movie: &MatchupMovie) -> Self {
        Self {
            id: movie.id,
            movie_id: movie.movie_id,
            movie_title: movie.movie_title.clone(),
            movie_poster: movie.movie_poster.clone(),
            vote_count: movie.vote_count,
            charm_point: movie.charm.proportions(),
            emotion_point: movie.emotion.proportions(),
        }
    }
}

/// Full matchup view with both entries' breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupDetail {
    pub id: DbId,
    pub title: String,
    pub matchup_type: String,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
    pub status: MatchupStatus,
    pub movie1: MatchupMovieDetail,
    pub movie2: MatchupMovieDetail,
}

impl MatchupDetail {
    /// Build the detail view; each movie's breakdown comes from its own sets.
    pub fn new(matchup: &Matchup, movie1: &MatchupMovie, movie2: &MatchupMovie) -> Self {
        Self {
            id: matchup.id,
            title: matchup.title.clone(),
            matchup_type: matchup.matchup_type.clone(),
            start_at: matchup.start_at,
            end_at: matchup.end_at,
            status: matchup.status,
            movie1: MatchupMovieDetail::from(movie1),
            movie2: MatchupMovieDetail::from(movie2),
        }
    }
}

/// Summary row for the finished-matchup history list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupHistoryItem {
    pub id: DbId,
    pub title: String,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
}

impl From<&Matchup> for MatchupHistoryItem {
    fn from(matchup: &Matchup) -> Self {
        Self {
            id: matchup.id,
            title: matchup.title.clone(),
            start_at: matchup.start_at,
            end_at: matchup.end_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
