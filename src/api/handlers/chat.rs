use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::handlers::session::AppState;
use crate::api::middleware::AppError;
use crate::models::AskRequest;
use crate::services::GroqExecutor;

/// Answer a natural-language question within a session.
///
/// Executor and connection failures are rendered into the transcript as
/// assistant text; only validation and unknown-session errors surface as
/// HTTP errors.
pub async fn ask(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<AskRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    tracing::info!("Answering question for session: {}", id);

    let session = state.store.get(&id).await?;

    let executor = GroqExecutor::with_endpoint(
        session.api_key.clone(),
        state.config.llm.api_url.clone(),
        state.config.llm.model.clone(),
        state.config.database.query_timeout_secs,
    );

    let turns = state
        .store
        .ask(&id, &payload.question, &state.cache, &executor)
        .await?;

    Ok(Json(serde_json::json!({
        "session_id": id,
        "transcript": turns,
    })))
}
