//! Matchup, matchup movie, and participation rows.

use cookie_core::error::CoreError;
use cookie_core::matchup::{Matchup, MatchupMovie, MatchupStatus, Participation};
use cookie_core::points::{CharmPoints, EmotionPoints};
use cookie_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A `matchups` row joined with the ids of its two entries.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MatchupRow {
    pub id: DbId,
    pub title: String,
    pub matchup_type: String,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
    pub status: String,
    pub movie1_id: DbId,
    pub movie2_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<MatchupRow> for Matchup {
    type Error = CoreError;

    fn try_from(row: MatchupRow) -> Result<Self, Self::Error> {
        Ok(Matchup {
            id: row.id,
            title: row.title,
            matchup_type: row.matchup_type,
            start_at: row.start_at,
            end_at: row.end_at,
            status: MatchupStatus::parse(&row.status)?,
            movie_ids: [row.movie1_id, row.movie2_id],
        })
    }
}

/// A `matchup_movies` row joined with its charm and emotion score sets.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MatchupMovieRow {
    pub id: DbId,
    pub matchup_id: DbId,
    pub slot: i16,
    pub movie_id: DbId,
    pub movie_title: String,
    pub movie_poster: Option<String>,
    pub vote_count: i64,
    pub ost: i64,
    pub directing: i64,
    pub story: i64,
    pub dialogue: i64,
    pub visual: i64,
    pub acting: i64,
    pub special_effects: i64,
    pub touching: i64,
    pub angry: i64,
    pub joy: i64,
    pub immersion: i64,
    pub excited: i64,
    pub empathy: i64,
    pub tension: i64,
}

impl From<MatchupMovieRow> for MatchupMovie {
    fn from(row: MatchupMovieRow) -> Self {
        MatchupMovie {
            id: row.id,
            matchup_id: row.matchup_id,
            movie_id: row.movie_id,
            movie_title: row.movie_title,
            movie_poster: row.movie_poster,
            vote_count: row.vote_count,
            charm: CharmPoints {
                ost: row.ost,
                directing: row.directing,
                story: row.story,
                dialogue: row.dialogue,
                visual: row.visual,
                acting: row.acting,
                special_effects: row.special_effects,
            },
            emotion: EmotionPoints {
                touching: row.touching,
                angry: row.angry,
                joy: row.joy,
                immersion: row.immersion,
                excited: row.excited,
                empathy: row.empathy,
                tension: row.tension,
            },
        }
    }
}

/// A row from the `matchup_participations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ParticipationRow {
    pub id: DbId,
    pub user_id: DbId,
    pub matchup_id: DbId,
    pub matchup_movie_id: DbId,
    pub created_at: Timestamp,
}

impl From<ParticipationRow> for Participation {
    fn from(row: ParticipationRow) -> Self {
        Participation {
            id: row.id,
            user_id: row.user_id,
            matchup_id: row.matchup_id,
            matchup_movie_id: row.matchup_movie_id,
            created_at: row.created_at,
        }
    }
}

/// Counts returned by a status-advance pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusAdvance {
    pub activated: u64,
    pub expired: u64,
}
