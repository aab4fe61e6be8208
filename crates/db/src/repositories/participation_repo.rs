//! Repository for `matchup_participations` and the transactional vote commit.

use cookie_core::types::DbId;
use cookie_core::vote::VoteCommit;
use sqlx::PgPool;

use crate::models::matchup::ParticipationRow;

/// Column list for matchup_participations queries.
const COLUMNS: &str = "id, user_id, matchup_id, matchup_movie_id, created_at";

/// Participation checks and vote recording.
pub struct ParticipationRepo;

impl ParticipationRepo {
    /// Whether the user participated through either entry of the matchup.
    pub async fn exists_for_matchup(
        pool: &PgPool,
        user_id: DbId,
        matchup_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(
                SELECT 1 FROM matchup_participations p
                JOIN matchup_movies mm ON mm.id = p.matchup_movie_id
                WHERE p.user_id = $1 AND mm.matchup_id = $2
             )",
        )
        .bind(user_id)
        .bind(matchup_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// List participations recorded against one matchup movie.
    pub async fn list_for_matchup_movie(
        pool: &PgPool,
        matchup_movie_id: DbId,
    ) -> Result<Vec<ParticipationRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM matchup_participations
             WHERE matchup_movie_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, ParticipationRow>(&query)
            .bind(matchup_movie_id)
            .fetch_all(pool)
            .await
    }

    /// Record a vote: participation, point deltas, and vote count together.
    ///
    /// Locks the matchup row first so concurrent commits for the same
    /// matchup serialize across server instances. Returns `Ok(None)` and
    /// rolls back if the user already holds a participation in the matchup.
    pub async fn commit_vote(
        pool: &PgPool,
        vote: &VoteCommit,
    ) -> Result<Option<ParticipationRow>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT id FROM matchups WHERE id = $1 FOR UPDATE")
            .bind(vote.matchup_id)
            .fetch_optional(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO matchup_participations (user_id, matchup_id, matchup_movie_id)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_matchup_participations_user_matchup DO NOTHING
             RETURNING {COLUMNS}"
        );
        let Some(participation) = sqlx::query_as::<_, ParticipationRow>(&query)
            .bind(vote.user_id)
            .bind(vote.matchup_id)
            .bind(vote.matchup_movie_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            // Dropping the transaction rolls it back.
            return Ok(None);
        };

        if let Some(charm) = &vote.charm {
            sqlx::query(
                "UPDATE charm_points SET
                    ost = ost + $2,
                    directing = directing + $3,
                    story = story + $4,
                    dialogue = dialogue + $5,
                    visual = visual + $6,
                    acting = acting + $7,
                    special_effects = special_effects + $8
                 WHERE matchup_movie_id = $1",
            )
            .bind(vote.matchup_movie_id)
            .bind(charm.ost)
            .bind(charm.directing)
            .bind(charm.story)
            .bind(charm.dialogue)
            .bind(charm.visual)
            .bind(charm.acting)
            .bind(charm.special_effects)
            .execute(&mut *tx)
            .await?;
        }

        if let Some(emotion) = &vote.emotion {
            sqlx::query(
                "UPDATE emotion_points SET
                    touching = touching + $2,
                    angry = angry + $3,
                    joy = joy + $4,
                    immersion = immersion + $5,
                    excited = excited + $6,
                    empathy = empathy + $7,
                    tension = tension + $8
                 WHERE matchup_movie_id = $1",
            )
            .bind(vote.matchup_movie_id)
            .bind(emotion.touching)
            .bind(emotion.angry)
            .bind(emotion.joy)
            .bind(emotion.immersion)
            .bind(emotion.excited)
            .bind(emotion.empathy)
            .bind(emotion.tension)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            "UPDATE matchup_movies SET vote_count = vote_count + 1, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(vote.matchup_movie_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(participation))
    }
}
