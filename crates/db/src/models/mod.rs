//! Row structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` struct matching the
//! database row, plus `Deserialize` create DTOs where rows are inserted
//! through the API. Rows convert into `cookie_core` domain types where the
//! engine consumes them.

pub mod matchup;
pub mod movie;
pub mod review;
pub mod user;
