//! Concurrent subscriber registry with fan-out publish.
//!
//! Each subscriber owns a bounded mpsc queue. Publishing never waits on a
//! subscriber: a full or closed queue removes that subscriber instead.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use cookie_core::types::Timestamp;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, RwLock};

/// Default per-subscriber queue capacity.
pub const DEFAULT_SUBSCRIBER_BUFFER: usize = 64;

/// Opaque handle identifying one registered subscriber.
pub type SubscriberId = u64;

/// A single live output channel.
struct Subscriber<E> {
    sender: mpsc::Sender<E>,
    subscribed_at: Timestamp,
}

/// Registry of live subscribers for one event shape.
///
/// Thread-safe via interior `RwLock`; wrap in `Arc` and share across
/// handlers. Delivery is at-most-once with no replay: subscribers only see
/// events published while they are registered.
pub struct BroadcastRegistry<E> {
    name: &'static str,
    buffer: usize,
    next_id: AtomicU64,
    subscribers: RwLock<HashMap<SubscriberId, Subscriber<E>>>,
}

impl<E: Clone + Send + 'static> BroadcastRegistry<E> {
    /// Create an empty registry whose subscribers each buffer up to
    /// `buffer` undelivered events.
    pub fn new(name: &'static str, buffer: usize) -> Self {
        Self {
            name,
            buffer: buffer.max(1),
            next_id: AtomicU64::new(1),
            subscribers: RwLock::new(HashMap::new()),
        }
    }

    /// Registry name used in log fields.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Register a new subscriber.
    ///
    /// Returns the handle and the receiving half of its queue. Nothing is
    /// sent here; callers queue their own greeting afterwards.
    pub async fn subscribe(&self) -> (SubscriberId, mpsc::Receiver<E>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::channel(self.buffer);
        let subscriber = Subscriber {
            sender,
            subscribed_at: chrono::Utc::now(),
        };
        self.subscribers.write().await.insert(id, subscriber);
        tracing::debug!(registry = self.name, subscriber_id = id, "Subscriber registered");
        (id, receiver)
    }

    /// Queue `event` for a single subscriber.
    ///
    /// Returns `false` (and prunes the subscriber) if it cannot accept it.
    pub async fn send_to(&self, id: SubscriberId, event: E) -> bool {
        let outcome = {
            let subscribers = self.subscribers.read().await;
            match subscribers.get(&id) {
                Some(subscriber) => subscriber.sender.try_send(event),
                None => return false,
            }
        };
        match outcome {
            Ok(()) => true,
            Err(err) => {
                self.prune(&[(id, reason(&err))]).await;
                false
            }
        }
    }

    /// Deliver `event` to every currently registered subscriber.
    ///
    /// Subscribers whose queue is full or closed are removed. Returns the
    /// number of subscribers the event was queued for.
    pub async fn publish(&self, event: E) -> usize {
        let mut failed = Vec::new();
        let mut delivered = 0;
        {
            let subscribers = self.subscribers.read().await;
            for (id, subscriber) in subscribers.iter() {
                match subscriber.sender.try_send(event.clone()) {
                    Ok(()) => delivered += 1,
                    Err(err) => failed.push((*id, reason(&err))),
                }
            }
        }
        if !failed.is_empty() {
            self.prune(&failed).await;
        }
        delivered
    }

    /// Remove a subscriber. Removing an absent handle is a no-op.
    pub async fn unsubscribe(&self, id: SubscriberId) {
        if let Some(subscriber) = self.subscribers.write().await.remove(&id) {
            let connected_secs = (chrono::Utc::now() - subscriber.subscribed_at).num_seconds();
            tracing::debug!(
                registry = self.name,
                subscriber_id = id,
                connected_secs,
                "Subscriber unregistered",
            );
        }
    }

    /// Whether `id` is currently registered.
    pub async fn contains(&self, id: SubscriberId) -> bool {
        self.subscribers.read().await.contains_key(&id)
    }

    /// Number of registered subscribers.
    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.read().await.len()
    }

    /// Drop every subscriber, ending their streams.
    ///
    /// Used during graceful shutdown.
    pub async fn close_all(&self) -> usize {
        let mut subscribers = self.subscribers.write().await;
        let count = subscribers.len();
        subscribers.clear();
        tracing::info!(registry = self.name, count, "Closed all subscribers");
        count
    }

    async fn prune(&self, failed: &[(SubscriberId, &'static str)]) {
        let mut subscribers = self.subscribers.write().await;
        for (id, reason) in failed {
            if subscribers.remove(id).is_some() {
                tracing::debug!(
                    registry = self.name,
                    subscriber_id = *id,
                    reason,
                    "Pruned subscriber after failed delivery",
                );
            }
        }
    }
}

impl<E: Clone + Send + 'static> Default for BroadcastRegistry<E> {
    fn default() -> Self {
        Self::new("default", DEFAULT_SUBSCRIBER_BUFFER)
    }
}

fn reason<T>(err: &TrySendError<T>) -> &'static str {
    match err {
        TrySendError::Full(_) => "full",
        TrySendError::Closed(_) => "closed",
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn subscriber_receives_published_event_once() {
        let registry = BroadcastRegistry::<String>::default();
        let (_, mut rx) = registry.subscribe().await;

        assert_eq!(registry.publish("hello".to_string()).await, 1);

        assert_eq!(rx.recv().await.as_deref(), Some("hello"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn unsubscribed_handle_receives_nothing() {
        let registry = BroadcastRegistry::<String>::default();
        let (id, mut rx) = registry.subscribe().await;
        registry.publish("first".to_string()).await;
        assert_eq!(rx.recv().await.as_deref(), Some("first"));

        registry.unsubscribe(id).await;
        assert_eq!(registry.publish("second".to_string()).await, 0);

        // The sender was dropped with the entry, so the stream ends.
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn unsubscribe_is_idempotent() {
        let registry = BroadcastRegistry::<u32>::default();
        let (id, _rx) = registry.subscribe().await;

        registry.unsubscribe(id).await;
        registry.unsubscribe(id).await;
        registry.unsubscribe(9999).await;

        assert_eq!(registry.subscriber_count().await, 0);
    }

    #[tokio::test]
    async fn disconnected_subscriber_is_pruned_on_publish() {
        let registry = BroadcastRegistry::<u32>::default();
        let (_, mut rx1) = registry.subscribe().await;
        let (_, rx2) = registry.subscribe().await;
        let (_, mut rx3) = registry.subscribe().await;
        drop(rx2);

        assert_eq!(registry.publish(7).await, 2);

        assert_eq!(rx1.recv().await, Some(7));
        assert_eq!(rx3.recv().await, Some(7));
        assert_eq!(registry.subscriber_count().await, 2);
    }

    #[tokio::test]
    async fn full_subscriber_is_pruned_without_blocking() {
        let registry = BroadcastRegistry::<u32>::new("test", 1);
        let (slow, _slow_rx) = registry.subscribe().await;
        let (_, mut fast_rx) = registry.subscribe().await;

        assert_eq!(registry.publish(1).await, 2);
        assert_eq!(fast_rx.recv().await, Some(1));

        // The slow subscriber never drained its single slot.
        assert_eq!(registry.publish(2).await, 1);
        assert!(!registry.contains(slow).await);
        assert_eq!(fast_rx.recv().await, Some(2));
    }

    #[tokio::test]
    async fn late_subscriber_sees_no_history() {
        let registry = BroadcastRegistry::<u32>::default();
        registry.publish(1).await;

        let (_, mut rx) = registry.subscribe().await;
        registry.publish(2).await;

        assert_eq!(rx.recv().await, Some(2));
    }

    #[tokio::test]
    async fn send_to_targets_one_subscriber() {
        let registry = BroadcastRegistry::<u32>::default();
        let (a, mut rx_a) = registry.subscribe().await;
        let (_, mut rx_b) = registry.subscribe().await;

        assert!(registry.send_to(a, 5).await);
        assert!(!registry.send_to(12345, 5).await);

        assert_eq!(rx_a.recv().await, Some(5));
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn close_all_ends_every_stream() {
        let registry = BroadcastRegistry::<u32>::default();
        let (_, mut rx1) = registry.subscribe().await;
        let (_, mut rx2) = registry.subscribe().await;

        assert_eq!(registry.close_all().await, 2);

        assert_eq!(rx1.recv().await, None);
        assert_eq!(rx2.recv().await, None);
        assert_eq!(registry.subscriber_count().await, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_subscribe_and_publish_keeps_membership_consistent() {
        let registry = Arc::new(BroadcastRegistry::<u32>::default());

        let mut handles = Vec::new();
        for i in 0..16 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                let (id, rx) = registry.subscribe().await;
                registry.publish(i).await;
                if i % 2 == 0 {
                    registry.unsubscribe(id).await;
                }
                rx
            }));
        }

        let mut receivers = Vec::new();
        for handle in handles {
            receivers.push(handle.await.unwrap());
        }

        assert_eq!(registry.subscriber_count().await, 8);
    }
}
