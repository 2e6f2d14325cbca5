//! Notification Hub - live fan-out of change events
//!
//! Every subscriber owns a bounded queue. Broadcasting pushes into each
//! queue with `try_send`, so a slow or dead subscriber can never stall the
//! writer or the other subscribers.
//!
//! ## Features
//! - Connection-established marker queued before `subscribe` returns
//! - Lazy pruning of subscribers whose receiving side has gone away
//! - Lag accounting for subscribers whose queue overflowed
//! - Sequence counter for observability

mod subscription;

pub use subscription::{SubscriberId, SubscriberState, Subscription};

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::types::{HubMessage, Notice, ReloadEvent};

/// Default per-subscriber queue depth
pub const DEFAULT_SUBSCRIBER_BUFFER: usize = 1024;

/// Largest per-subscriber queue depth accepted
pub const MAX_SUBSCRIBER_BUFFER: usize = 1 << 20;

struct Slot {
    tx: mpsc::Sender<HubMessage>,
    /// Events dropped since the last lag notice was queued
    missed: u64,
}

/// Outcome of offering one event to one slot
enum Offer {
    Queued,
    Dropped,
    Closed,
}

impl Slot {
    /// Queue `msg`, preceded by a lag notice when earlier events were dropped.
    ///
    /// If the notice itself does not fit, `msg` is dropped as well so the
    /// subscriber never sees an event past a gap it has not been told about.
    fn offer(&mut self, msg: &HubMessage) -> Offer {
        if self.missed > 0 {
            let notice = Notice::Lagged {
                missed: self.missed,
            };
            match self.tx.try_send(notice.into()) {
                Ok(()) => self.missed = 0,
                Err(TrySendError::Full(_)) => {
                    self.missed += 1;
                    return Offer::Dropped;
                }
                Err(TrySendError::Closed(_)) => return Offer::Closed,
            }
        }

        match self.tx.try_send(msg.clone()) {
            Ok(()) => Offer::Queued,
            Err(TrySendError::Full(_)) => {
                self.missed += 1;
                Offer::Dropped
            }
            Err(TrySendError::Closed(_)) => Offer::Closed,
        }
    }
}

/// State shared between the hub and its subscriptions
pub(crate) struct Shared {
    subscribers: Mutex<HashMap<SubscriberId, Slot>>,
    next_id: AtomicU64,
    closed: AtomicBool,
}

impl Shared {
    pub(crate) fn remove(&self, id: SubscriberId) -> bool {
        self.subscribers.lock().remove(&id).is_some()
    }
}

/// Registry of live subscribers
pub struct NotificationHub {
    shared: Arc<Shared>,
    capacity: usize,
    sequence_counter: AtomicU64,
}

impl NotificationHub {
    /// Create a hub whose subscribers buffer up to `capacity` messages each.
    ///
    /// `capacity` is clamped to `1..=MAX_SUBSCRIBER_BUFFER`.
    pub fn new(capacity: usize) -> Self {
        Self {
            shared: Arc::new(Shared {
                subscribers: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                closed: AtomicBool::new(false),
            }),
            capacity: capacity.clamp(1, MAX_SUBSCRIBER_BUFFER),
            sequence_counter: AtomicU64::new(0),
        }
    }

    /// Register a new subscriber.
    ///
    /// The returned subscription already holds the `connected` marker, so
    /// its first `recv` completes immediately.
    pub fn subscribe(&self) -> Subscription {
        let id = self.shared.next_id.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::channel(self.capacity);
        let mut subscription = Subscription::connecting(id, rx, Arc::downgrade(&self.shared));

        // Fresh channel with capacity >= 1, cannot be full
        let _ = tx.try_send(Notice::Connected.into());

        {
            let mut subscribers = self.shared.subscribers.lock();
            if self.shared.closed.load(Ordering::SeqCst) {
                // Dropping `tx` ends the stream right after the marker
                drop(tx);
            } else {
                subscribers.insert(id, Slot { tx, missed: 0 });
            }
        }
        subscription.mark_connected();

        tracing::debug!(subscriber = id, "subscriber connected");
        subscription
    }

    /// Remove a subscriber. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let removed = self.shared.remove(id);
        if removed {
            tracing::debug!(subscriber = id, "subscriber removed");
        }
        removed
    }

    /// Deliver `event` to every registered subscriber without waiting.
    ///
    /// Returns the number of subscribers the event was queued for.
    pub fn broadcast(&self, event: ReloadEvent) -> usize {
        let seq = self.sequence_counter.fetch_add(1, Ordering::SeqCst);
        let msg = HubMessage::from(event);
        let mut delivered = 0;

        self.shared.subscribers.lock().retain(|id, slot| {
            match slot.offer(&msg) {
                Offer::Queued => {
                    delivered += 1;
                    true
                }
                Offer::Dropped => {
                    tracing::warn!(
                        subscriber = *id,
                        sequence_id = seq,
                        missed = slot.missed,
                        "subscriber lagging, event dropped"
                    );
                    true
                }
                Offer::Closed => {
                    tracing::debug!(subscriber = *id, "pruned disconnected subscriber");
                    false
                }
            }
        });

        delivered
    }

    /// Number of currently registered subscribers
    pub fn count(&self) -> usize {
        self.shared.subscribers.lock().len()
    }

    /// Number of broadcasts issued so far
    pub fn current_sequence_id(&self) -> u64 {
        self.sequence_counter.load(Ordering::SeqCst)
    }

    /// Disconnect every subscriber and refuse new registrations.
    ///
    /// Streams end once their already-queued messages are drained.
    pub fn close(&self) {
        self.shared.closed.store(true, Ordering::SeqCst);
        let dropped = {
            let mut subscribers = self.shared.subscribers.lock();
            let n = subscribers.len();
            subscribers.clear();
            n
        };
        tracing::info!(subscribers = dropped, "notification hub closed");
    }

    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::SeqCst)
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new(DEFAULT_SUBSCRIBER_BUFFER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(key: &str, version: u64) -> ReloadEvent {
        ReloadEvent {
            key: key.to_string(),
            environment: "production".to_string(),
            version,
        }
    }

    #[test]
    fn test_connected_marker_is_first() {
        let hub = NotificationHub::default();
        let mut sub = hub.subscribe();
        assert_eq!(sub.try_recv(), Some(HubMessage::Notice(Notice::Connected)));
        assert_eq!(sub.try_recv(), None);
        assert_eq!(sub.state(), SubscriberState::Connected);
    }

    #[test]
    fn test_broadcast_reaches_all_subscribers() {
        let hub = NotificationHub::default();
        let mut a = hub.subscribe();
        let mut b = hub.subscribe();
        a.try_recv();
        b.try_recv();

        assert_eq!(hub.broadcast(event("k", 1)), 2);
        assert_eq!(a.try_recv(), Some(HubMessage::Reload(event("k", 1))));
        assert_eq!(b.try_recv(), Some(HubMessage::Reload(event("k", 1))));
        assert_eq!(hub.current_sequence_id(), 1);
    }

    #[test]
    fn test_broadcast_without_subscribers() {
        let hub = NotificationHub::default();
        assert_eq!(hub.broadcast(event("k", 1)), 0);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let hub = NotificationHub::default();
        let sub = hub.subscribe();
        assert_eq!(hub.count(), 1);
        assert!(hub.unsubscribe(sub.id()));
        assert!(!hub.unsubscribe(sub.id()));
        assert_eq!(hub.count(), 0);
    }

    #[test]
    fn test_dropped_subscription_is_removed() {
        let hub = NotificationHub::default();
        let keep = hub.subscribe();
        let gone = hub.subscribe();
        assert_eq!(hub.count(), 2);

        drop(gone);
        assert_eq!(hub.count(), 1);
        assert_eq!(hub.broadcast(event("k", 1)), 1);
        drop(keep);
    }

    #[test]
    fn test_full_queue_counts_missed_events() {
        let hub = NotificationHub::new(2);
        let mut sub = hub.subscribe();

        // Marker occupies one slot, so only one event fits
        assert_eq!(hub.broadcast(event("k", 1)), 1);
        assert_eq!(hub.broadcast(event("k", 2)), 0);
        assert_eq!(hub.count(), 1);

        assert_eq!(sub.try_recv(), Some(HubMessage::Notice(Notice::Connected)));
        assert_eq!(sub.try_recv(), Some(HubMessage::Reload(event("k", 1))));
        assert_eq!(sub.try_recv(), None);

        // Room again: the notice is queued ahead of the next event
        assert_eq!(hub.broadcast(event("k", 3)), 1);
        assert_eq!(sub.try_recv(), Some(HubMessage::Notice(Notice::Lagged { missed: 1 })));
        assert_eq!(sub.try_recv(), Some(HubMessage::Reload(event("k", 3))));
        assert_eq!(sub.try_recv(), None);
    }

    #[tokio::test]
    async fn test_lag_notice_precedes_later_events() {
        let hub = NotificationHub::new(2);
        let mut sub = hub.subscribe();

        hub.broadcast(event("k", 1));
        hub.broadcast(event("k", 2));
        assert_eq!(sub.recv().await, Some(HubMessage::Notice(Notice::Connected)));

        // One free slot: the notice fits, event 3 does not
        assert_eq!(hub.broadcast(event("k", 3)), 0);
        assert_eq!(sub.recv().await, Some(HubMessage::Reload(event("k", 1))));
        assert_eq!(sub.recv().await, Some(HubMessage::Notice(Notice::Lagged { missed: 1 })));
        assert_eq!(sub.try_recv(), None);

        assert_eq!(hub.broadcast(event("k", 4)), 1);
        assert_eq!(sub.recv().await, Some(HubMessage::Notice(Notice::Lagged { missed: 1 })));
        assert_eq!(sub.recv().await, Some(HubMessage::Reload(event("k", 4))));
    }

    #[test]
    fn test_unfit_notice_drops_event_too() {
        let hub = NotificationHub::new(1);
        let mut sub = hub.subscribe();

        assert_eq!(hub.broadcast(event("k", 1)), 0);
        assert_eq!(hub.broadcast(event("k", 2)), 0);
        assert_eq!(sub.try_recv(), Some(HubMessage::Notice(Notice::Connected)));

        // Notice takes the only slot; event 3 is counted as missed
        assert_eq!(hub.broadcast(event("k", 3)), 0);
        assert_eq!(sub.try_recv(), Some(HubMessage::Notice(Notice::Lagged { missed: 2 })));
        assert_eq!(hub.broadcast(event("k", 4)), 0);
        assert_eq!(sub.try_recv(), Some(HubMessage::Notice(Notice::Lagged { missed: 1 })));
        assert_eq!(hub.broadcast(event("k", 5)), 0);
    }

    #[test]
    fn test_capacity_is_clamped() {
        let hub = NotificationHub::new(usize::MAX);
        let mut sub = hub.subscribe();
        assert_eq!(sub.try_recv(), Some(HubMessage::Notice(Notice::Connected)));
    }

    #[tokio::test]
    async fn test_close_ends_streams() {
        let hub = NotificationHub::default();
        let mut sub = hub.subscribe();

        hub.close();
        assert!(hub.is_closed());
        assert_eq!(hub.count(), 0);

        assert_eq!(sub.recv().await, Some(HubMessage::Notice(Notice::Connected)));
        assert_eq!(sub.recv().await, None);
        assert_eq!(sub.state(), SubscriberState::Disconnected);
    }

    #[tokio::test]
    async fn test_subscribe_after_close_gets_marker_then_ends() {
        let hub = NotificationHub::default();
        hub.close();

        let mut sub = hub.subscribe();
        assert_eq!(hub.count(), 0);
        assert_eq!(sub.recv().await, Some(HubMessage::Notice(Notice::Connected)));
        assert_eq!(sub.recv().await, None);
    }
}
