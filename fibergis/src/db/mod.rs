//! Database access: connection pool and schema introspection

pub mod pool;
pub mod schema;

pub use pool::{create_pool, test_connection, DatabaseConfig, SslMode};
pub use schema::{SchemaCache, TableSchema};
