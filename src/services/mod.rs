pub mod chat;
pub mod connection_cache;
pub mod database; // Pluggable backends behind the DatabaseBackend trait
pub mod executor; // Natural-language query executor (Groq)

pub use chat::*;
pub use connection_cache::*;
pub use executor::*;
