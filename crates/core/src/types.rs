//! Shared id and time aliases.

/// Primary keys of every table (PostgreSQL `BIGSERIAL`), including
/// matchup, matchup movie, user, and review ids.
pub type DbId = i64;

/// Stored and serialized timestamps, always UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
