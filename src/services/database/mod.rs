// Database connection layer: one backend per BackendKind behind a shared trait
pub mod backend;
pub mod mysql;
pub mod postgres;
pub mod sqlite;

pub use backend::{ConnectionHandle, DatabaseBackend, QueryResult};
pub use mysql::MySqlBackend;
pub use postgres::PostgresBackend;
pub use sqlite::SqliteBackend;

use crate::api::middleware::AppError;
use crate::models::{connection_url, validate_credentials, BackendKind, Credentials};
use std::path::PathBuf;
use std::sync::Arc;

/// Connection factory: validates credentials, then constructs a live handle
/// for the selected backend.
///
/// Validation happens before any connection attempt, so invalid credentials
/// never reach an engine constructor.
#[derive(Debug, Clone)]
pub struct ConnectionFactory {
    local_db_path: PathBuf,
}

impl ConnectionFactory {
    pub fn new(local_db_path: impl Into<PathBuf>) -> Self {
        Self {
            local_db_path: local_db_path.into(),
        }
    }

    pub async fn connect(
        &self,
        kind: BackendKind,
        credentials: &Credentials,
    ) -> Result<ConnectionHandle, AppError> {
        validate_credentials(kind, credentials)?;

        let handle: ConnectionHandle = match kind {
            BackendKind::Local => Arc::new(SqliteBackend::open(&self.local_db_path)?),
            BackendKind::MySql => {
                let url = connection_url(kind, credentials)
                    .ok_or_else(|| AppError::Internal("mysql requires a URL".to_string()))?;
                Arc::new(MySqlBackend::connect(&url)?)
            }
            BackendKind::Postgres => {
                let url = connection_url(kind, credentials)
                    .ok_or_else(|| AppError::Internal("postgres requires a URL".to_string()))?;
                Arc::new(PostgresBackend::connect(&url)?)
            }
        };

        // Pool construction is lazy for the remote backends; probe now so
        // auth or network failures surface at connect time, not first query.
        handle.test_connection().await.map_err(|e| match e {
            AppError::Connection(msg) => {
                AppError::Connection(format!("Failed to connect to {} database: {}", kind, msg))
            }
            other => other,
        })?;

        tracing::info!("Connected to {} database", kind);

        Ok(handle)
    }
}
