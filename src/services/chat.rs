// Chat session state and the store that owns every active session
use crate::api::middleware::AppError;
use crate::models::{
    validate_credentials, BackendKind, ChatTranscript, Credentials, Role, Turn,
};
use crate::services::connection_cache::ConnectionCache;
use crate::services::executor::QueryExecutor;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// One user's chat session with a selected backend.
///
/// Credentials and the API key live only here, in memory, for the life of
/// the session.
#[derive(Debug, Clone)]
pub struct ChatSession {
    pub id: String,
    pub kind: BackendKind,
    pub credentials: Credentials,
    pub api_key: String,
    pub transcript: ChatTranscript,
    pub created_at: DateTime<Utc>,
}

impl ChatSession {
    fn new(kind: BackendKind, credentials: Credentials, api_key: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            credentials,
            api_key,
            transcript: ChatTranscript::new(),
            created_at: Utc::now(),
        }
    }
}

/// In-memory store of active sessions.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, ChatSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Create a session: validate credentials, establish the connection
    /// through the cache, then seed the transcript. Bad credentials or an
    /// unreachable backend fail here, before any session exists.
    pub async fn create(
        &self,
        kind: BackendKind,
        credentials: Credentials,
        api_key: String,
        cache: &ConnectionCache,
    ) -> Result<ChatSession, AppError> {
        validate_credentials(kind, &credentials)?;

        if api_key.trim().is_empty() {
            return Err(AppError::Validation(
                "API key cannot be empty".to_string(),
            ));
        }

        cache.get_or_create(kind, &credentials).await?;

        let session = ChatSession::new(kind, credentials, api_key);
        tracing::info!("Created session {} for {} backend", session.id, kind);

        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id.clone(), session.clone());

        Ok(session)
    }

    pub async fn get(&self, id: &str) -> Result<ChatSession, AppError> {
        let sessions = self.sessions.read().await;
        sessions
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Session {} not found", id)))
    }

    /// Answer a question within a session.
    ///
    /// The user turn is appended first; the executor's answer (or, on any
    /// failure past that point, the error text) becomes the assistant turn.
    /// Either way the transcript grows by exactly two turns and the session
    /// stays usable.
    pub async fn ask(
        &self,
        id: &str,
        question: &str,
        cache: &ConnectionCache,
        executor: &dyn QueryExecutor,
    ) -> Result<Vec<Turn>, AppError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AppError::Validation("Question cannot be empty".to_string()));
        }

        let (kind, credentials) = {
            let mut sessions = self.sessions.write().await;
            let session = sessions
                .get_mut(id)
                .ok_or_else(|| AppError::NotFound(format!("Session {} not found", id)))?;
            session.transcript.append(Role::User, question);
            (session.kind, session.credentials.clone())
        };

        // Connection and executor failures both surface as transcript text
        let answer = match cache.get_or_create(kind, &credentials).await {
            Ok(handle) => match executor.answer(question, &handle).await {
                Ok(answer) => answer,
                Err(e) => {
                    tracing::warn!("Executor failed for session {}: {}", id, e);
                    format!("Sorry, I could not answer that: {}", e)
                }
            },
            Err(e) => {
                tracing::warn!("Reconnect failed for session {}: {}", id, e);
                format!("Sorry, I could not answer that: {}", e)
            }
        };

        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Session {} not found", id)))?;
        session.transcript.append(Role::Assistant, answer);

        Ok(session.transcript.turns().to_vec())
    }

    /// Reset the transcript to the seeded greeting.
    pub async fn clear(&self, id: &str) -> Result<Vec<Turn>, AppError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Session {} not found", id)))?;
        session.transcript.clear();
        Ok(session.transcript.turns().to_vec())
    }

    /// End a session, dropping its credentials and transcript.
    pub async fn remove(&self, id: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        sessions.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
