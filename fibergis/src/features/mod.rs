//! GeoJSON feature pipeline: normalization, validation, materialization

pub mod materialize;
pub mod normalize;
pub mod validate;

use deadpool_postgres::Pool;
use geojson::FeatureCollection;
use tracing::debug;

use crate::db::SchemaCache;
use crate::error::Result;
use crate::store::buildings;

pub use materialize::{into_collection, materialize, BuildingRow, MaterializeReport};
pub use validate::validate_geometry;

/// Viewport rectangle in longitude/latitude degrees (WGS84)
#[derive(Debug, Clone, Copy)]
pub struct Bbox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

/// Runs the full bounding-box pipeline: schema lookup, intersection
/// query, per-row materialization, collection assembly
///
/// Store failures abort the whole batch; per-row geometry defects only
/// suppress the affected feature.
pub async fn bbox_collection(
    pool: &Pool,
    schema_cache: &SchemaCache,
    bbox: Bbox,
) -> Result<FeatureCollection> {
    let client = pool.get().await?;
    let schema = schema_cache.get(&client).await?;

    let rows = buildings::query_bbox(&client, &schema, bbox).await?;
    let report = materialize(&rows);

    debug!(
        rows = rows.len(),
        features = report.features.len(),
        skipped = report.skipped.len(),
        "Bounding-box query materialized"
    );

    Ok(into_collection(report.features))
}
