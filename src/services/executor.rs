// Query executor: turns a natural-language question into a SQL query via a
// remote inference API, runs it against the handle, and renders a text
// answer for the transcript.
use crate::api::middleware::AppError;
use crate::models::BackendKind;
use crate::services::database::{ConnectionHandle, QueryResult};
use reqwest::Client as HttpClient;
use serde_json::json;

/// Groq OpenAI-compatible chat-completions endpoint.
pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";

const SYSTEM_PROMPT: &str = "You are a SQL expert. Given a database schema and a \
natural language question, respond with exactly one valid SELECT query and \
nothing else. No explanations, no markdown formatting.";

/// Answers a natural-language question using a borrowed connection handle.
///
/// Failures are converted by the session layer into displayable transcript
/// text, never propagated to the caller as a fatal error.
#[async_trait::async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn answer(
        &self,
        question: &str,
        handle: &ConnectionHandle,
    ) -> Result<String, AppError>;
}

/// Executor backed by the Groq inference API.
pub struct GroqExecutor {
    api_url: String,
    api_key: String,
    model: String,
    query_timeout_secs: u64,
    http_client: HttpClient,
}

impl GroqExecutor {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_endpoint(api_key, DEFAULT_API_URL, DEFAULT_MODEL, 30)
    }

    pub fn with_endpoint(
        api_key: impl Into<String>,
        api_url: impl Into<String>,
        model: impl Into<String>,
        query_timeout_secs: u64,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            query_timeout_secs,
            http_client: HttpClient::new(),
        }
    }

    /// Build the SQL-generation prompt from the schema context.
    fn build_prompt(question: &str, schema_context: &str, kind: BackendKind) -> String {
        let dialect_hints = match kind {
            BackendKind::Local => {
                "- Use SQLite syntax and functions\n\
                 - Use LIMIT syntax\n\
                 - Use double quotes for identifier quoting if needed"
            }
            BackendKind::MySql => {
                "- Use MySQL syntax and functions\n\
                 - Use LIMIT syntax (not TOP or FETCH FIRST)\n\
                 - String concatenation uses CONCAT()\n\
                 - Use backticks for identifier quoting if needed"
            }
            BackendKind::Postgres => {
                "- Use PostgreSQL syntax and functions\n\
                 - Use LIMIT syntax (or FETCH FIRST)\n\
                 - String concatenation uses || or CONCAT()\n\
                 - Use double quotes for identifier quoting if needed"
            }
        };

        format!(
            "{schema_context}\n\
             Question: {question}\n\n\
             Instructions:\n\
             1. Generate ONLY a valid SELECT query for the schema above\n\
             2. Do not include any explanations or markdown formatting\n\
             3. Use proper table and column names from the schema above\n\
             4. If the question asks how many, use COUNT(*)\n\
             {dialect_hints}\n\n\
             SQL Query:"
        )
    }

    /// Call the inference API and return the raw completion text.
    async fn call_llm_api(&self, prompt: &str) -> Result<String, AppError> {
        let response = self
            .http_client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&json!({
                "model": self.model,
                "messages": [
                    {"role": "system", "content": SYSTEM_PROMPT},
                    {"role": "user", "content": prompt}
                ],
                "max_tokens": 500,
                "temperature": 0.1,
            }))
            .send()
            .await
            .map_err(|e| AppError::Executor(format!("Failed to call inference API: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Executor(format!(
                "Inference API returned error {}: {}",
                status, error_text
            )));
        }

        let result: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::Executor(format!("Failed to parse API response: {}", e)))?;

        result["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| {
                AppError::Executor("API response does not contain a completion".to_string())
            })
    }

    /// Strip markdown fences and surrounding noise from the completion, then
    /// require a SELECT statement.
    fn clean_sql(completion: &str) -> Result<String, AppError> {
        let cleaned = completion
            .trim()
            .trim_start_matches("```sql")
            .trim_start_matches("```")
            .trim_end_matches("```")
            .trim()
            .trim_end_matches(';')
            .to_string();

        if !cleaned.to_lowercase().starts_with("select") {
            return Err(AppError::Executor(format!(
                "Model did not produce a SELECT query: {}",
                cleaned
            )));
        }

        Ok(cleaned)
    }

    /// Render a query result as transcript text.
    ///
    /// A single scalar (a COUNT, say) renders as the bare value; small
    /// result sets render row by row; larger ones are summarized.
    fn render_answer(result: &QueryResult) -> String {
        if result.rows.is_empty() {
            return "The query returned no rows.".to_string();
        }

        // Single row, single column: the value is the answer
        if result.row_count == 1 {
            if let Some(obj) = result.rows[0].as_object() {
                if obj.len() == 1 {
                    let value = obj.values().next().unwrap();
                    return Self::render_value(value);
                }
            }
        }

        const MAX_LISTED_ROWS: usize = 10;
        let mut answer = format!("The query returned {} rows:\n", result.row_count);
        for row in result.rows.iter().take(MAX_LISTED_ROWS) {
            if let Some(obj) = row.as_object() {
                let fields: Vec<String> = obj
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, Self::render_value(v)))
                    .collect();
                answer.push_str(&format!("- {}\n", fields.join(", ")));
            }
        }
        if result.row_count > MAX_LISTED_ROWS {
            answer.push_str(&format!(
                "... and {} more.\n",
                result.row_count - MAX_LISTED_ROWS
            ));
        }

        answer.trim_end().to_string()
    }

    fn render_value(value: &serde_json::Value) -> String {
        match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl QueryExecutor for GroqExecutor {
    async fn answer(
        &self,
        question: &str,
        handle: &ConnectionHandle,
    ) -> Result<String, AppError> {
        let schema = handle.schema().await?;
        let prompt = Self::build_prompt(question, &schema.context_string(), handle.kind());

        let completion = self.call_llm_api(&prompt).await?;
        let sql = Self::clean_sql(&completion)?;

        tracing::info!("Generated SQL: {}", sql);

        let result = handle.run_query(&sql, self.query_timeout_secs).await?;

        Ok(Self::render_answer(&result))
    }
}
