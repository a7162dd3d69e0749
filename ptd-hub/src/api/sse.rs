//! Server-Sent Events (SSE) snapshot feed.
//!
//! Streams full-collection snapshots to connected clients: both current
//! snapshots on connect, then every push from the store feed. Clients
//! re-render from whole snapshots, so a lagged subscriber loses nothing it
//! cannot recover from the next event.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use ptd_common::events::TrackerEvent;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::AppState;

/// GET /api/events - SSE snapshot stream
pub async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("New SSE client connected");

    let store = state.store.clone();
    let mut rx = store.subscribe();

    let stream = async_stream::stream! {
        // Initial state on connection, like any fresh subscriber expects.
        for event in store.initial_events().await {
            match to_sse_event(&event) {
                Ok(sse_event) => yield Ok(sse_event),
                Err(e) => warn!("failed to serialize initial snapshot: {}", e),
            }
        }

        loop {
            match rx.recv().await {
                Ok(event) => {
                    debug!("Broadcasting SSE event: {}", event.event_type());
                    match to_sse_event(&event) {
                        Ok(sse_event) => yield Ok(sse_event),
                        Err(e) => warn!("failed to serialize event: {}", e),
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // The next snapshot supersedes everything missed.
                    warn!("SSE subscriber lagged, skipped {} events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("heartbeat"),
    )
}

fn to_sse_event(event: &TrackerEvent) -> serde_json::Result<Event> {
    Ok(Event::default()
        .event(event.event_type())
        .data(serde_json::to_string(event)?))
}
