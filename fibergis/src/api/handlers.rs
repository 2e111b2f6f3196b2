//! Request handlers, thin delegation to `store` and `features`
//!
//! Every handler acquires one pool connection and releases it on all
//! exit paths when the deadpool object drops. Domain precondition
//! violations surface as 404, everything else as 500 with a diagnostic
//! body.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use geojson::FeatureCollection;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::AppState;
use crate::error::Result;
use crate::features::{self, Bbox};
use crate::models::{Predisposition, PredispositionUpsert, StatusResponse, Tfo, TfoUpsert};
use crate::store::{predispositions, tfo};

/// Liveness banner
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "fibergis API attiva" }))
}

/// Viewport query parameters; `zoom` is accepted for client
/// compatibility but never alters the query
#[derive(Debug, Deserialize)]
pub struct BboxParams {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
    pub zoom: i32,
}

/// `GET /geojson/bbox` — buildings intersecting the viewport, as a
/// FeatureCollection of polygons and centroids
pub async fn bbox(
    State(state): State<AppState>,
    Query(params): Query<BboxParams>,
) -> Result<Json<FeatureCollection>> {
    debug!(
        west = params.west,
        south = params.south,
        east = params.east,
        north = params.north,
        zoom = params.zoom,
        "Viewport query"
    );

    let bbox = Bbox {
        west: params.west,
        south: params.south,
        east: params.east,
        north: params.north,
    };

    let collection = features::bbox_collection(&state.pool, &state.schema, bbox).await?;
    Ok(Json(collection))
}

/// `GET /predisposizioni`
pub async fn list_predispositions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Predisposition>>> {
    let client = state.pool.get().await?;
    let records = predispositions::list_all(&client).await?;
    Ok(Json(records))
}

/// `POST /predisposizioni` — 404 when the building does not exist
pub async fn create_predisposition(
    State(state): State<AppState>,
    Json(payload): Json<PredispositionUpsert>,
) -> Result<(StatusCode, Json<Predisposition>)> {
    let mut client = state.pool.get().await?;
    let record = predispositions::upsert(&mut client, &payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// `DELETE /predisposizioni/{id}` — clears the cluster and cascades
/// over the owned termination points
pub async fn delete_predisposition(
    State(state): State<AppState>,
    Path(building_id): Path<i32>,
) -> Result<Json<StatusResponse>> {
    let mut client = state.pool.get().await?;
    let deleted_tfos = predispositions::delete(&mut client, building_id).await?;
    Ok(Json(StatusResponse::success(format!(
        "Predisposizione ID {building_id} e {deleted_tfos} TFO associate eliminate"
    ))))
}

/// `GET /tfos/predisposizioni/{id}/tfos`
pub async fn list_tfos(
    State(state): State<AppState>,
    Path(building_id): Path<i32>,
) -> Result<Json<Vec<Tfo>>> {
    let client = state.pool.get().await?;
    let records = tfo::list_for_building(&client, building_id).await?;
    Ok(Json(records))
}

/// `POST /tfos` — 404 unless the building exists and is predisposed
pub async fn create_tfo(
    State(state): State<AppState>,
    Json(payload): Json<TfoUpsert>,
) -> Result<(StatusCode, Json<Tfo>)> {
    let mut client = state.pool.get().await?;
    let record = tfo::create(&mut client, &payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// `PUT /tfos/{id}`
pub async fn update_tfo(
    State(state): State<AppState>,
    Path(tfo_id): Path<i32>,
    Json(payload): Json<TfoUpsert>,
) -> Result<Json<Tfo>> {
    let mut client = state.pool.get().await?;
    let record = tfo::update(&mut client, tfo_id, &payload).await?;
    Ok(Json(record))
}

/// `DELETE /tfos/{id}`
pub async fn delete_tfo(
    State(state): State<AppState>,
    Path(tfo_id): Path<i32>,
) -> Result<Json<StatusResponse>> {
    let client = state.pool.get().await?;
    tfo::delete(&client, tfo_id).await?;
    Ok(Json(StatusResponse::success(format!("TFO ID {tfo_id} eliminata"))))
}
