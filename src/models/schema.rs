use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of the connected database's schema, retrieved once per handle
/// and rendered into the LLM prompt as context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    pub tables: Vec<Table>,
    pub retrieved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data_type: String,
    pub is_nullable: bool,
    pub is_primary_key: bool,
}

impl SchemaSnapshot {
    pub fn new(tables: Vec<Table>) -> Self {
        Self {
            tables,
            retrieved_at: Utc::now(),
        }
    }

    /// Render the snapshot as plain-text context for the LLM prompt.
    pub fn context_string(&self) -> String {
        let mut context = String::from("Database Schema:\n\n");

        if self.tables.is_empty() {
            context.push_str("(no tables)\n");
            return context;
        }

        context.push_str("Tables:\n");
        for table in &self.tables {
            context.push_str(&format!("  - {}\n", table.name));
            context.push_str("    Columns:\n");
            for column in &table.columns {
                context.push_str(&format!("      * {} ({})", column.name, column.data_type));
                if column.is_primary_key {
                    context.push_str(" [PRIMARY KEY]");
                }
                if !column.is_nullable {
                    context.push_str(" [NOT NULL]");
                }
                context.push('\n');
            }
        }

        context
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student_snapshot() -> SchemaSnapshot {
        SchemaSnapshot::new(vec![Table {
            name: "STUDENT".to_string(),
            columns: vec![
                Column {
                    name: "NAME".to_string(),
                    data_type: "TEXT".to_string(),
                    is_nullable: true,
                    is_primary_key: false,
                },
                Column {
                    name: "MARKS".to_string(),
                    data_type: "INT".to_string(),
                    is_nullable: false,
                    is_primary_key: false,
                },
            ],
        }])
    }

    #[test]
    fn test_context_string_lists_tables_and_columns() {
        let context = student_snapshot().context_string();
        assert!(context.contains("- STUDENT"));
        assert!(context.contains("NAME (TEXT)"));
        assert!(context.contains("MARKS (INT) [NOT NULL]"));
    }

    #[test]
    fn test_context_string_empty_schema() {
        let context = SchemaSnapshot::new(vec![]).context_string();
        assert!(context.contains("(no tables)"));
    }
}
