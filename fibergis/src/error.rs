//! Error types for the fibergis service

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Errors surfaced by query and mutation paths
#[derive(Debug, Error)]
pub enum Error {
    /// Domain precondition violation (missing building, missing TFO, ...)
    #[error("{0}")]
    NotFound(String),

    /// Schema introspection resolved no columns for the expected table
    #[error("Table '{table}' has no introspectable columns")]
    SchemaDrift { table: String },

    /// Connection pool failure
    #[error("Database connection failed: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    /// Query or statement failure
    #[error("Database error: {0}")]
    Db(#[from] tokio_postgres::Error),
}

impl Error {
    /// Builds a not-found error with context
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::NotFound(detail.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::SchemaDrift { .. } | Error::Pool(_) | Error::Db(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Error body, `{"detail": "..."}` as expected by the map front end
#[derive(Debug, Serialize)]
struct Detail {
    detail: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        (status, Json(Detail { detail: self.to_string() })).into_response()
    }
}

/// Convenience alias used across the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let err = Error::not_found("Edificio 42 non trovato");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Edificio 42 non trovato");
    }

    #[test]
    fn test_schema_drift_is_server_error() {
        let err = Error::SchemaDrift { table: "catasto_abitazioni".into() };
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("catasto_abitazioni"));
    }
}
