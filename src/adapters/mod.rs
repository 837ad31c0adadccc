// Adapters layer: concrete implementations for external systems.

pub mod http;
pub mod mysql;
pub mod storage;

pub use http::ApiFootballClient;
pub use mysql::MySqlSink;
pub use storage::LocalStorage;
