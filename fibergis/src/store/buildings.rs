//! Spatial store adapter for the building table
//!
//! Issues the single parameterized intersection query behind the
//! bounding-box endpoint. The select list is rebuilt from the live
//! schema descriptor so that queries never reference columns dropped by
//! an outside migration.

use deadpool_postgres::Object;
use tracing::trace;

use crate::db::TableSchema;
use crate::error::Result;
use crate::features::normalize::row_to_properties;
use crate::features::{Bbox, BuildingRow};

/// Building table name
pub const BUILDINGS_TABLE: &str = "catasto_abitazioni";

/// Geometry-bearing columns, fetched separately as encoded GeoJSON
pub const GEOMETRY_COLUMNS: [&str; 2] = ["geometry", "centroide"];

/// Hard cap on rows considered per call; protects response size. Callers
/// suspecting truncation must re-query with a tighter rectangle.
pub const ROW_CAP: i64 = 3000;

/// Decimal digits kept by ST_AsGeoJSON
pub const GEOJSON_PRECISION: i32 = 20;

/// Quotes a column identifier for interpolation into the select list
fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Builds the intersection query against the live schema
///
/// The viewport is always WGS84; when the table stores another SRID the
/// envelope is transformed table-side before the intersection test.
fn bbox_sql(schema: &TableSchema) -> String {
    let mut excluded: Vec<&str> = GEOMETRY_COLUMNS.to_vec();
    excluded.push("predisposto_fibra");

    let attrs: Vec<String> = schema
        .attribute_columns(&excluded)
        .into_iter()
        .map(|c| format!("c.{}", quote_ident(c)))
        .collect();

    let select_cols = if attrs.is_empty() {
        String::new()
    } else {
        format!("{}, ", attrs.join(", "))
    };

    let envelope = if schema.srid == 4326 {
        "ST_MakeEnvelope($1, $2, $3, $4, 4326)".to_string()
    } else {
        format!(
            "ST_Transform(ST_MakeEnvelope($1, $2, $3, $4, 4326), {})",
            schema.srid
        )
    };

    format!(
        "SELECT {select_cols}\
         COALESCE(c.predisposto_fibra, false) AS predisposto_fibra, \
         ST_AsGeoJSON(c.geometry, {precision}) AS geometry_geojson, \
         ST_AsGeoJSON(c.centroide, {precision}) AS centroide_geojson \
         FROM {table} c \
         WHERE ST_Intersects(c.geometry, {envelope}) \
         LIMIT {cap}",
        table = schema.table,
        precision = GEOJSON_PRECISION,
        cap = ROW_CAP,
    )
}

/// Fetches all buildings whose polygon intersects the viewport
///
/// One query round-trip; the connection is released by the caller when
/// the pool object drops. Returns at most [`ROW_CAP`] rows.
pub async fn query_bbox(
    client: &Object,
    schema: &TableSchema,
    bbox: Bbox,
) -> Result<Vec<BuildingRow>> {
    let sql = bbox_sql(schema);
    trace!(sql = %sql, "Bounding-box query");

    let rows = client
        .query(&sql, &[&bbox.west, &bbox.south, &bbox.east, &bbox.north])
        .await?;

    let mut buildings = Vec::with_capacity(rows.len());
    for row in &rows {
        let properties = row_to_properties(row, &["geometry_geojson", "centroide_geojson"]);
        let polygon: Option<String> = row.try_get("geometry_geojson")?;
        let centroid: Option<String> = row.try_get("centroide_geojson")?;
        buildings.push(BuildingRow { properties, polygon, centroid });
    }

    Ok(buildings)
}
