//! Feature materialization for the bounding-box query
//!
//! Each building row contributes up to two independent features: the
//! polygon itself with the full normalized property map, and a synthetic
//! centroid point carrying only a marker, the parent id and the
//! fiber-readiness flag. A geometry that fails validation suppresses
//! only its own feature and is recorded as a diagnostic; the batch never
//! aborts.

use geojson::{Feature, FeatureCollection};
use serde_json::{Map, Value};
use tracing::warn;

use super::validate::validate_geometry;

/// One building row, already normalized, ready for materialization
#[derive(Debug, Clone)]
pub struct BuildingRow {
    /// Normalized attribute map (geometry columns excluded,
    /// `predisposto_fibra` coalesced to a boolean)
    pub properties: Map<String, Value>,
    /// Polygon encoded as GeoJSON text, when present
    pub polygon: Option<String>,
    /// Centroid encoded as GeoJSON text, when present
    pub centroid: Option<String>,
}

impl BuildingRow {
    /// Parent identifier: primary `id` column, falling back to `objectid`
    fn parent_id(&self) -> Value {
        self.properties
            .get("id")
            .filter(|v| !v.is_null())
            .or_else(|| self.properties.get("objectid"))
            .cloned()
            .unwrap_or(Value::Null)
    }

    /// Fiber-readiness flag; absent or null reads as false
    fn predisposto_fibra(&self) -> bool {
        self.properties
            .get("predisposto_fibra")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

/// Outcome of materializing a batch of rows
#[derive(Debug, Default)]
pub struct MaterializeReport {
    /// Emitted features, polygon before centroid, row order preserved
    pub features: Vec<Feature>,
    /// Diagnostics for geometries excluded from the output
    pub skipped: Vec<String>,
}

impl MaterializeReport {
    fn record_skip(&mut self, parent_id: &Value, kind: &str, reason: String) {
        warn!(parent_id = %parent_id, kind, reason = %reason, "Geometry excluded from output");
        self.skipped.push(format!("{kind} of {parent_id}: {reason}"));
    }
}

fn feature(geometry: geojson::Geometry, properties: Map<String, Value>) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Materializes one row into zero, one or two features
///
/// The polygon and centroid emissions are independent: either may fail
/// validation without affecting the other.
pub fn materialize_row(row: &BuildingRow, report: &mut MaterializeReport) {
    let parent_id = row.parent_id();

    match validate_geometry(row.polygon.as_deref()) {
        Ok(geometry) => {
            // Private copy: the centroid below builds its own map
            report.features.push(feature(geometry, row.properties.clone()));
        }
        Err(reason) => {
            if row.polygon.is_some() {
                report.record_skip(&parent_id, "polygon", reason);
            }
        }
    }

    match validate_geometry(row.centroid.as_deref()) {
        Ok(geometry) => {
            let mut centroid_props = Map::new();
            centroid_props.insert("is_centroid".to_string(), Value::Bool(true));
            centroid_props.insert("parent_id".to_string(), parent_id.clone());
            centroid_props.insert(
                "predisposto_fibra".to_string(),
                Value::Bool(row.predisposto_fibra()),
            );
            report.features.push(feature(geometry, centroid_props));
        }
        Err(reason) => {
            if row.centroid.is_some() {
                report.record_skip(&parent_id, "centroid", reason);
            }
        }
    }
}

/// Materializes a batch of rows, folding features and diagnostics
pub fn materialize(rows: &[BuildingRow]) -> MaterializeReport {
    let mut report = MaterializeReport::default();
    for row in rows {
        materialize_row(row, &mut report);
    }
    report
}

/// Wraps a feature list into the output envelope; never fails
pub fn into_collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const POLYGON: &str = r#"{"type":"MultiPolygon","coordinates":[[[[13.0,42.0],[13.5,42.0],[13.5,42.5],[13.0,42.0]]]]}"#;
    const CENTROID: &str = r#"{"type":"Point","coordinates":[13.25,42.16]}"#;

    fn row(polygon: Option<&str>, centroid: Option<&str>) -> BuildingRow {
        let mut properties = Map::new();
        properties.insert("id".to_string(), json!(7));
        properties.insert("edifc_uso".to_string(), json!("abitativo"));
        properties.insert("predisposto_fibra".to_string(), json!(true));
        BuildingRow {
            properties,
            polygon: polygon.map(str::to_string),
            centroid: centroid.map(str::to_string),
        }
    }

    #[test]
    fn test_valid_row_emits_polygon_then_centroid() {
        let report = materialize(&[row(Some(POLYGON), Some(CENTROID))]);
        assert_eq!(report.features.len(), 2);
        assert!(report.skipped.is_empty());

        let polygon = &report.features[0];
        let props = polygon.properties.as_ref().unwrap();
        assert_eq!(props.get("edifc_uso"), Some(&json!("abitativo")));
        assert_eq!(props.get("predisposto_fibra"), Some(&json!(true)));

        let centroid = &report.features[1];
        let props = centroid.properties.as_ref().unwrap();
        assert_eq!(props.get("is_centroid"), Some(&json!(true)));
        assert_eq!(props.get("parent_id"), Some(&json!(7)));
        assert_eq!(props.get("predisposto_fibra"), Some(&json!(true)));
        // Centroid features carry nothing beyond the fixed set
        assert_eq!(props.len(), 3);
    }

    #[test]
    fn test_null_polygon_still_emits_centroid() {
        let report = materialize(&[row(None, Some(CENTROID))]);
        assert_eq!(report.features.len(), 1);
        let props = report.features[0].properties.as_ref().unwrap();
        assert_eq!(props.get("is_centroid"), Some(&json!(true)));
        // A null payload is an absence, not a defect
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_null_centroid_still_emits_polygon() {
        let report = materialize(&[row(Some(POLYGON), None)]);
        assert_eq!(report.features.len(), 1);
        let props = report.features[0].properties.as_ref().unwrap();
        assert!(props.get("is_centroid").is_none());
    }

    #[test]
    fn test_malformed_polygon_suppresses_only_polygon() {
        let report = materialize(&[row(Some(r#"{"type":"MultiPolygon"}"#), Some(CENTROID))]);
        assert_eq!(report.features.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].contains("polygon of 7"));
    }

    #[test]
    fn test_parent_id_falls_back_to_objectid() {
        let mut r = row(None, Some(CENTROID));
        r.properties.remove("id");
        r.properties.insert("objectid".to_string(), json!(1234));
        let report = materialize(&[r]);
        let props = report.features[0].properties.as_ref().unwrap();
        assert_eq!(props.get("parent_id"), Some(&json!(1234)));
    }

    #[test]
    fn test_missing_flag_defaults_to_false() {
        let mut r = row(None, Some(CENTROID));
        r.properties.remove("predisposto_fibra");
        let report = materialize(&[r]);
        let props = report.features[0].properties.as_ref().unwrap();
        assert_eq!(props.get("predisposto_fibra"), Some(&json!(false)));
    }

    #[test]
    fn test_empty_batch_yields_empty_collection() {
        let report = materialize(&[]);
        let collection = into_collection(report.features);
        assert!(collection.features.is_empty());
    }

    #[test]
    fn test_every_emitted_feature_has_geometry() {
        let rows = vec![
            row(Some(POLYGON), Some(CENTROID)),
            row(None, Some(CENTROID)),
            row(Some(r#"not json"#), None),
        ];
        let report = materialize(&rows);
        assert!(report.features.iter().all(|f| f.geometry.is_some()));
    }
}
