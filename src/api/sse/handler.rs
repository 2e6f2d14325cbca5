//! Live reload stream handler

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::{Stream, StreamExt};

use crate::registry::ConfigRegistry;
use crate::types::HubMessage;

/// Render one hub message as an SSE frame
pub fn to_event(msg: &HubMessage) -> Event {
    Event::default().data(serde_json::to_string(msg).unwrap_or_default())
}

/// GET /reload - SSE stream of reload events
pub async fn reload_handler(
    State(registry): State<Arc<ConfigRegistry>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let subscription = registry.subscribe();
    tracing::info!(
        subscriber = subscription.id(),
        subscribers = registry.hub().count(),
        "reload stream opened"
    );

    // Dropping the stream (client gone) drops the subscription, which unregisters it
    let stream = subscription
        .into_stream()
        .map(|msg| Ok::<_, Infallible>(to_event(&msg)));

    Sse::new(stream).keep_alive(KeepAlive::default().interval(registry.settings().keepalive))
}

