//! HTTP surface: router, shared state, CORS

pub mod handlers;

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;
use deadpool_postgres::Pool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::db::SchemaCache;

/// Shared request state: connection pool and cached schema descriptor
#[derive(Clone)]
pub struct AppState {
    pub pool: Pool,
    pub schema: Arc<SchemaCache>,
}

/// Builds the service router
///
/// CORS is wide open: the map front end may be served from any origin,
/// including a local `file://` page.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/geojson/bbox", get(handlers::bbox))
        .route(
            "/predisposizioni",
            get(handlers::list_predispositions).post(handlers::create_predisposition),
        )
        .route("/predisposizioni/{id}", delete(handlers::delete_predisposition))
        .route("/tfos/predisposizioni/{id}/tfos", get(handlers::list_tfos))
        .route("/tfos", post(handlers::create_tfo))
        .route("/tfos/{id}", put(handlers::update_tfo).delete(handlers::delete_tfo))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
