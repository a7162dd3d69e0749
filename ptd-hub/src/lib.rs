//! ptd-hub library - Program tracking store hub
//!
//! The concrete Program Store collaborator: document persistence, the
//! audit-diff write path and the snapshot push feed, behind an HTTP API.

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::store::ProgramStore;

pub mod api;
pub mod db;
pub mod store;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The document store and its subscriber feed
    pub store: Arc<ProgramStore>,
}

impl AppState {
    /// Create new application state
    pub fn new(store: ProgramStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Build application router
///
/// Read endpoints are open; mutating endpoints require a coordinator session
/// (identity headers are injected by an upstream credential service).
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, put};

    let api = Router::new()
        .route(
            "/api/programs",
            get(api::list_programs).post(api::create_program),
        )
        .route("/api/programs/:id", put(api::update_program))
        .route("/api/history", get(api::list_history))
        .route("/api/overview", get(api::overview))
        .route("/api/events", get(api::event_stream))
        .layer(middleware::from_fn(api::session_middleware));

    Router::new()
        .merge(api)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
