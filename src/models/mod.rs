pub mod connection;
pub mod schema;
pub mod transcript;

pub use connection::*;
pub use schema::*;
pub use transcript::*;
