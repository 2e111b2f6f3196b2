//! # fibergis
//!
//! REST API tracking fiber-optic readiness ("predisposizione") over a
//! municipal cadastre stored in PostgreSQL/PostGIS.
//!
//! ## Features
//!
//! - Bounding-box queries emitting building polygons and centroids as a
//!   GeoJSON FeatureCollection
//! - Live schema introspection of the building table (attribute columns
//!   are discovered, never hard-coded)
//! - Predisposition and termination-point (TFO) CRUD with transactional
//!   cascade semantics
//!
//! ## Usage
//!
//! ```bash
//! # Serve on the default port with env-configured PostgreSQL
//! fibergis
//!
//! # Override listener and database
//! fibergis --port 8080 --host db.example.org --database aquila_gis
//! ```

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod features;
pub mod models;
pub mod store;

pub use config::ServerConfig;
pub use db::{create_pool, DatabaseConfig, SchemaCache};
pub use error::{Error, Result};
