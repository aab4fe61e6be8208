//! Live broadcast infrastructure for streaming endpoints.
//!
//! - [`BroadcastRegistry`]: process-wide set of live subscribers with
//!   fan-out publish and prune-on-failure membership.
//! - [`ReviewFeedEvent`] and [`PushEvent`]: the two event shapes streamed
//!   to clients.

pub mod feed;
pub mod registry;

pub use feed::{NamedEvent, PushEvent, ReviewFeedEvent};
pub use registry::{BroadcastRegistry, SubscriberId, DEFAULT_SUBSCRIBER_BUFFER};
