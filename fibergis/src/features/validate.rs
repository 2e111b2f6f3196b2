//! Structural validation of GeoJSON geometry payloads
//!
//! Validation is structural only: the payload must parse as GeoJSON and
//! carry a non-empty geometry kind and non-empty coordinates. Geometric
//! validity (self-intersection, winding order) stays with PostGIS.

use geojson::{Geometry, Value};

/// Parses and validates an encoded geometry payload
///
/// A missing, null or empty payload is a validation failure, never a
/// panic. On success the parsed geometry is returned; on failure, a
/// diagnostic string.
pub fn validate_geometry(raw: Option<&str>) -> Result<Geometry, String> {
    let raw = match raw {
        Some(s) if !s.trim().is_empty() && s.trim() != "null" => s,
        _ => return Err("empty geometry payload".to_string()),
    };

    let geometry: Geometry =
        serde_json::from_str(raw).map_err(|e| format!("invalid geometry payload: {e}"))?;

    if !has_coordinates(&geometry.value) {
        return Err("geometry has empty coordinates".to_string());
    }

    Ok(geometry)
}

/// True when the geometry carries at least one coordinate (or member)
fn has_coordinates(value: &Value) -> bool {
    match value {
        Value::Point(position) => !position.is_empty(),
        Value::MultiPoint(positions) => !positions.is_empty(),
        Value::LineString(positions) => !positions.is_empty(),
        Value::MultiLineString(lines) => !lines.is_empty(),
        Value::Polygon(rings) => !rings.is_empty(),
        Value::MultiPolygon(polygons) => !polygons.is_empty(),
        Value::GeometryCollection(geometries) => !geometries.is_empty(),
    }
}
