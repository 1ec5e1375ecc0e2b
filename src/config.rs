use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path of the bundled read-only student database
    pub local_path: String,
    /// Connection cache time-to-live in seconds
    pub handle_ttl_secs: u64,
    /// Per-query timeout in seconds
    pub query_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub api_url: String,
    pub model: String,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        // Load .env before reading overrides
        let _ = dotenv::dotenv();

        let mut builder = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("database.local_path", "./student.db")?
            .set_default("database.handle_ttl_secs", 7200)?
            .set_default("database.query_timeout_secs", 30)?
            .set_default("llm.api_url", crate::services::executor::DEFAULT_API_URL)?
            .set_default("llm.model", crate::services::executor::DEFAULT_MODEL)?;

        if let Ok(host) = env::var("HOST") {
            builder = builder.set_override("server.host", host)?;
        }

        if let Ok(port) = env::var("PORT") {
            builder = builder.set_override("server.port", port.parse::<u16>().unwrap_or(3000))?;
        }

        if let Ok(local_path) = env::var("STUDENT_DB_PATH") {
            builder = builder.set_override("database.local_path", local_path)?;
        }

        if let Ok(ttl) = env::var("HANDLE_TTL_SECS") {
            builder =
                builder.set_override("database.handle_ttl_secs", ttl.parse::<u64>().unwrap_or(7200))?;
        }

        if let Ok(api_url) = env::var("LLM_API_URL") {
            builder = builder.set_override("llm.api_url", api_url)?;
        }

        if let Ok(model) = env::var("LLM_MODEL") {
            builder = builder.set_override("llm.model", model)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        env::remove_var("HOST");
        env::remove_var("PORT");
        env::remove_var("STUDENT_DB_PATH");

        let config = Config::from_env().unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.local_path, "./student.db");
        assert_eq!(config.database.handle_ttl_secs, 7200);
        assert_eq!(config.llm.model, "llama3-8b-8192");
    }

    #[test]
    fn test_server_address() {
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                local_path: "./student.db".to_string(),
                handle_ttl_secs: 7200,
                query_timeout_secs: 30,
            },
            llm: LlmConfig {
                api_url: "http://localhost:9999".to_string(),
                model: "test".to_string(),
            },
        };
        assert_eq!(config.server_address(), "127.0.0.1:8080");
    }
}
