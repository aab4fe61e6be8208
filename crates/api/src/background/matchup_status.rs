//! Periodic matchup status maintenance.
//!
//! Moves matchups forward as their windows open and close:
//! `SCHEDULED -> ACTIVE` once `start_at` passes, anything not yet expired
//! to `EXPIRED` once `end_at` passes.

use std::time::Duration;

use chrono::Utc;
use cookie_db::repositories::MatchupRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// Run the status advancer until `cancel` is triggered.
pub async fn run(pool: PgPool, interval_secs: u64, cancel: CancellationToken) {
    tracing::info!(interval_secs, "Matchup status job started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Matchup status job stopping");
                break;
            }
            _ = interval.tick() => {
                match MatchupRepo::advance_statuses(&pool, Utc::now()).await {
                    Ok(advance) if advance.activated > 0 || advance.expired > 0 => {
                        tracing::info!(
                            activated = advance.activated,
                            expired = advance.expired,
                            "Matchup statuses advanced"
                        );
                    }
                    Ok(_) => tracing::debug!("Matchup status job: nothing to advance"),
                    Err(e) => {
                        tracing::error!(error = %e, "Matchup status job: update failed");
                    }
                }
            }
        }
    }
}
