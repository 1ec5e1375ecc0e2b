use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::middleware::AppError;
use crate::config::Config;
use crate::models::{BackendKind, CreateSessionRequest};
use crate::services::{ConnectionCache, SessionStore};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SessionStore>,
    pub cache: Arc<ConnectionCache>,
    pub config: Config,
}

/// Start a chat session against the selected backend.
///
/// Credentials are validated and the connection established before the
/// session exists; failures return an error the caller can re-prompt on and
/// leave no state behind.
pub async fn create_session(
    State(state): State<AppState>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let kind = BackendKind::from_str(&payload.backend)?;

    let session = state
        .store
        .create(kind, payload.credentials, payload.api_key, &state.cache)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "session_id": session.id,
            "backend": session.kind,
            "transcript": session.transcript.turns(),
        })),
    ))
}

/// Read a session's transcript
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let session = state.store.get(&id).await?;

    Ok(Json(serde_json::json!({
        "session_id": session.id,
        "backend": session.kind,
        "transcript": session.transcript.turns(),
    })))
}

/// Reset a session's transcript to the seeded greeting
pub async fn clear_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let turns = state.store.clear(&id).await?;

    Ok(Json(serde_json::json!({
        "session_id": id,
        "transcript": turns,
    })))
}

/// End a session
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.store.remove(&id).await {
        tracing::info!("Session ended: {}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {} not found", id)))
    }
}
