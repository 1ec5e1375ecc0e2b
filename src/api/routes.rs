use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;

use crate::api::handlers::session::AppState;
use crate::api::handlers::{chat, session};
use crate::config::Config;
use crate::services::database::ConnectionFactory;
use crate::services::{ConnectionCache, SessionStore};

/// Create the application router with its state.
pub fn create_router_with_state(config: Config) -> Router {
    let factory = ConnectionFactory::new(&config.database.local_path);
    let cache = Arc::new(ConnectionCache::with_ttl(
        factory,
        Duration::from_secs(config.database.handle_ttl_secs),
    ));

    let state = AppState {
        store: Arc::new(SessionStore::new()),
        cache,
        config,
    };

    Router::new()
        .route("/health", get(health_check))
        .route("/api/sessions", post(session::create_session))
        .route(
            "/api/sessions/{id}",
            get(session::get_session).delete(session::delete_session),
        )
        .route("/api/sessions/{id}/ask", post(chat::ask))
        .route("/api/sessions/{id}/clear", post(session::clear_session))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
