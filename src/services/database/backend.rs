// Backend trait shared by the sqlite, mysql and postgres connections
use crate::api::middleware::AppError;
use crate::models::{BackendKind, SchemaSnapshot};
use serde_json::Value;
use std::sync::Arc;

/// Result of running a query against a backend
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub rows: Vec<Value>,
    pub row_count: usize,
    pub execution_time_ms: u64,
}

/// Abstraction over a live database connection.
///
/// The connection cache owns handles; the query executor borrows one per
/// call. A handle is only ever constructed after credential validation has
/// succeeded.
#[async_trait::async_trait]
pub trait DatabaseBackend: Send + Sync {
    /// Retrieve a snapshot of the schema for LLM prompt context
    async fn schema(&self) -> Result<SchemaSnapshot, AppError>;

    /// Run a SQL statement and return the rows as JSON values
    async fn run_query(&self, sql: &str, timeout_secs: u64) -> Result<QueryResult, AppError>;

    /// Verify the connection is alive
    async fn test_connection(&self) -> Result<(), AppError>;

    fn kind(&self) -> BackendKind;
}

/// Shared, cache-owned database handle. Identity is Arc pointer identity.
pub type ConnectionHandle = Arc<dyn DatabaseBackend>;
