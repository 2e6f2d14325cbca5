//! Subscriber handles

use std::sync::Weak;

use futures::Stream;
use tokio::sync::mpsc::{self, error::TryRecvError};

use super::Shared;
use crate::types::HubMessage;

/// Identifier of one subscription, unique for the hub's lifetime
pub type SubscriberId = u64;

/// Lifecycle of a subscriber; `Disconnected` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriberState {
    Connecting,
    Connected,
    Disconnected,
}

/// Receiving side of one subscriber.
///
/// Dropping the subscription unregisters it from the hub.
pub struct Subscription {
    id: SubscriberId,
    rx: mpsc::Receiver<HubMessage>,
    state: SubscriberState,
    hub: Weak<Shared>,
}

impl Subscription {
    pub(super) fn connecting(
        id: SubscriberId,
        rx: mpsc::Receiver<HubMessage>,
        hub: Weak<Shared>,
    ) -> Self {
        Self {
            id,
            rx,
            state: SubscriberState::Connecting,
            hub,
        }
    }

    pub(super) fn mark_connected(&mut self) {
        if self.state == SubscriberState::Connecting {
            self.state = SubscriberState::Connected;
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn state(&self) -> SubscriberState {
        self.state
    }

    /// Wait for the next message. `None` once the subscriber is disconnected
    /// and its queue is drained.
    pub async fn recv(&mut self) -> Option<HubMessage> {
        match self.rx.recv().await {
            Some(msg) => Some(msg),
            None => self.finish(),
        }
    }

    /// Non-blocking variant of [`Subscription::recv`]; `None` when nothing is queued
    pub fn try_recv(&mut self) -> Option<HubMessage> {
        match self.rx.try_recv() {
            Ok(msg) => Some(msg),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => self.finish(),
        }
    }

    /// Unregister from the hub. Messages already queued can still be drained.
    pub fn close(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.remove(self.id);
        }
        self.rx.close();
    }

    /// Turn the subscription into a stream that ends on disconnect
    pub fn into_stream(self) -> impl Stream<Item = HubMessage> {
        let mut subscription = self;
        async_stream::stream! {
            while let Some(msg) = subscription.recv().await {
                yield msg;
            }
        }
    }

    fn finish(&mut self) -> Option<HubMessage> {
        if self.state != SubscriberState::Disconnected {
            self.state = SubscriberState::Disconnected;
            tracing::debug!(subscriber = self.id, "subscriber disconnected");
        }
        None
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.remove(self.id);
        }
    }
}
