// Read-only SQLite backend for the bundled student database
use crate::api::middleware::AppError;
use crate::models::{BackendKind, Column, SchemaSnapshot, Table};
use crate::services::database::backend::{DatabaseBackend, QueryResult};
use rusqlite::{types::ValueRef, Connection, OpenFlags};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

/// SQLite backend opened read-only so the chat agent can never mutate the
/// demo dataset. Uses tokio::Mutex for async-friendly locking.
pub struct SqliteBackend {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteBackend {
    /// Open the database file read-only. Fails if the file does not exist
    /// or is not a SQLite database; nothing is left open on failure.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self, AppError> {
        let path = db_path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| {
            AppError::Connection(format!(
                "Failed to open local database {}: {}",
                path.display(),
                e
            ))
        })?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn sqlite_value_to_json(value: ValueRef<'_>) -> Value {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => json!(i),
            ValueRef::Real(f) => json!(f),
            ValueRef::Text(bytes) => json!(String::from_utf8_lossy(bytes)),
            ValueRef::Blob(bytes) => json!(format!("<blob {} bytes>", bytes.len())),
        }
    }
}

#[async_trait::async_trait]
impl DatabaseBackend for SqliteBackend {
    async fn schema(&self) -> Result<SchemaSnapshot, AppError> {
        let conn = self.conn.lock().await;

        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )?;
        let table_names: Vec<String> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<_, _>>()?;

        let mut tables = Vec::new();
        for name in table_names {
            let mut col_stmt = conn.prepare(&format!("PRAGMA table_info(\"{}\")", name))?;
            let columns: Vec<Column> = col_stmt
                .query_map([], |row| {
                    Ok(Column {
                        name: row.get::<_, String>(1)?,
                        data_type: row.get::<_, String>(2)?,
                        is_nullable: row.get::<_, i64>(3)? == 0,
                        is_primary_key: row.get::<_, i64>(5)? > 0,
                    })
                })?
                .collect::<Result<_, _>>()?;

            tables.push(Table { name, columns });
        }

        Ok(SchemaSnapshot::new(tables))
    }

    async fn run_query(&self, sql: &str, _timeout_secs: u64) -> Result<QueryResult, AppError> {
        let conn = self.conn.lock().await;
        let start_time = Instant::now();

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| AppError::Database(format!("Query preparation failed: {}", e)))?;

        let column_names: Vec<String> =
            stmt.column_names().iter().map(|s| s.to_string()).collect();

        let mut rows = stmt
            .query([])
            .map_err(|e| AppError::Database(format!("Query execution failed: {}", e)))?;

        let mut json_rows = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(|e| AppError::Database(format!("Query execution failed: {}", e)))?
        {
            let mut row_obj = serde_json::Map::new();
            for (idx, column_name) in column_names.iter().enumerate() {
                let value = row
                    .get_ref(idx)
                    .map(Self::sqlite_value_to_json)
                    .unwrap_or(Value::Null);
                row_obj.insert(column_name.clone(), value);
            }
            json_rows.push(Value::Object(row_obj));
        }

        let row_count = json_rows.len();
        let execution_time_ms = start_time.elapsed().as_millis() as u64;

        Ok(QueryResult {
            rows: json_rows,
            row_count,
            execution_time_ms,
        })
    }

    async fn test_connection(&self) -> Result<(), AppError> {
        let conn = self.conn.lock().await;
        conn.query_row("SELECT 1", [], |_| Ok(()))
            .map_err(|e| AppError::Connection(format!("Connection test failed: {}", e)))
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::seed_student_db;
    use tempfile::NamedTempFile;

    async fn seeded_backend() -> (NamedTempFile, SqliteBackend) {
        let file = NamedTempFile::new().unwrap();
        seed_student_db(file.path()).unwrap();
        let backend = SqliteBackend::open(file.path()).unwrap();
        (file, backend)
    }

    #[tokio::test]
    async fn test_open_missing_file_fails() {
        let result = SqliteBackend::open("/nonexistent/student.db");
        assert!(matches!(result, Err(AppError::Connection(_))));
    }

    #[tokio::test]
    async fn test_schema_lists_student_table() {
        let (_file, backend) = seeded_backend().await;
        let schema = backend.schema().await.unwrap();

        assert_eq!(schema.tables.len(), 1);
        assert_eq!(schema.tables[0].name, "STUDENT");
        let column_names: Vec<_> = schema.tables[0]
            .columns
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(column_names, vec!["NAME", "CLASS", "SECTION", "MARKS"]);
    }

    #[tokio::test]
    async fn test_count_query() {
        let (_file, backend) = seeded_backend().await;
        let result = backend
            .run_query(
                "SELECT COUNT(*) AS n FROM STUDENT WHERE CLASS = 'Data Science'",
                30,
            )
            .await
            .unwrap();

        assert_eq!(result.row_count, 1);
        assert_eq!(result.rows[0]["n"], serde_json::json!(13));
    }

    #[tokio::test]
    async fn test_writes_are_rejected() {
        let (_file, backend) = seeded_backend().await;
        let result = backend
            .run_query("INSERT INTO STUDENT VALUES ('Eve', 'AI', 'A', 100)", 30)
            .await;
        assert!(matches!(result, Err(AppError::Database(_))));

        // Dataset unchanged
        let count = backend
            .run_query("SELECT COUNT(*) AS n FROM STUDENT", 30)
            .await
            .unwrap();
        assert_eq!(count.rows[0]["n"], serde_json::json!(51));
    }

    #[tokio::test]
    async fn test_connection_test() {
        let (_file, backend) = seeded_backend().await;
        assert!(backend.test_connection().await.is_ok());
    }
}
