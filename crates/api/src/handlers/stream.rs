//! Server-sent event streams backed by the broadcast registries.
//!
//! Each request registers one subscriber. The stream yields that
//! subscriber's queued events and unregisters it when the client goes away.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use cookie_events::{BroadcastRegistry, NamedEvent, SubscriberId};
use futures::future;
use futures::stream::{Stream, StreamExt};
use tokio_stream::wrappers::ReceiverStream;

use crate::state::AppState;

/// Greeting payload sent as the first event of every stream.
const CONNECTED_MESSAGE: &str = "connected";

/// GET /api/v1/reviews/subscribe/feed
pub async fn review_feed(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    subscribe(
        Arc::clone(&state.review_feed),
        state.config.sse_keep_alive_secs,
    )
    .await
}

/// GET /api/v1/reviews/subscribe/push-notification
pub async fn push_notifications(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    subscribe(
        Arc::clone(&state.push_feed),
        state.config.sse_keep_alive_secs,
    )
    .await
}

async fn subscribe<E: NamedEvent>(
    registry: Arc<BroadcastRegistry<E>>,
    keep_alive_secs: u64,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (id, rx) = registry.subscribe().await;
    if !registry.send_to(id, E::connected(CONNECTED_MESSAGE)).await {
        tracing::debug!(registry = registry.name(), subscriber_id = id, "Greeting not delivered");
    }

    let subscription = Subscription { registry, id };
    let stream = ReceiverStream::new(rx).filter_map(move |event| {
        // Owned by the stream so the subscriber is removed when it drops.
        let _subscription = &subscription;
        future::ready(to_sse_event(&event).map(Ok))
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(keep_alive_secs))
            .text("keep-alive"),
    )
}

fn to_sse_event<E: NamedEvent>(event: &E) -> Option<Event> {
    match event.data() {
        Ok(json) => Some(Event::default().event(event.event_name()).data(json)),
        Err(e) => {
            tracing::warn!(error = %e, event = event.event_name(), "Failed to serialize stream event");
            None
        }
    }
}

/// Unregisters a subscriber when its response stream is dropped.
struct Subscription<E: NamedEvent> {
    registry: Arc<BroadcastRegistry<E>>,
    id: SubscriberId,
}

impl<E: NamedEvent> Drop for Subscription<E> {
    fn drop(&mut self) {
        let registry = Arc::clone(&self.registry);
        let id = self.id;
        // No runtime means the process is exiting and the registry with it.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                registry.unsubscribe(id).await;
            });
        }
    }
}
