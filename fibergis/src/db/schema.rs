//! Live schema introspection for the building table
//!
//! The attribute set of `catasto_abitazioni` evolves outside the
//! application (columns added or dropped by migrations), so the select
//! list is never hard-coded. The column set and the polygon SRID are
//! introspected once at startup and cached behind an invalidation hook.

use std::sync::Arc;

use deadpool_postgres::Object;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Descriptor of the live building table
#[derive(Debug, Clone)]
pub struct TableSchema {
    /// Table name as introspected
    pub table: String,
    /// Ordered column set, as exposed by the store right now
    pub columns: Vec<String>,
    /// SRID of the polygon column (4326 when unregistered)
    pub srid: i32,
}

impl TableSchema {
    /// Fixed-schema descriptor, used by tests to bypass introspection
    pub fn fixed(table: &str, columns: &[&str], srid: i32) -> Self {
        Self {
            table: table.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            srid,
        }
    }

    /// Columns usable in a plain select list, excluding the ones fetched
    /// separately (encoded geometries, coalesced readiness flag)
    pub fn attribute_columns(&self, excluded: &[&str]) -> Vec<&str> {
        self.columns
            .iter()
            .map(|c| c.as_str())
            .filter(|c| !excluded.contains(c))
            .collect()
    }
}

/// Introspects the live column set and polygon SRID for a table
///
/// # Errors
/// `Error::SchemaDrift` when the table resolves to zero columns; there is
/// no safe default column list.
pub async fn introspect(client: &Object, table: &str) -> Result<TableSchema> {
    let rows = client
        .query(
            "SELECT column_name FROM information_schema.columns \
             WHERE table_name = $1 ORDER BY ordinal_position",
            &[&table],
        )
        .await?;

    if rows.is_empty() {
        return Err(Error::SchemaDrift { table: table.to_string() });
    }

    let columns: Vec<String> = rows.iter().map(|r| r.get::<_, String>(0)).collect();

    // Unregistered geometry columns fall back to the loader's declared SRID
    let srid: i32 = client
        .query_one(
            "SELECT COALESCE((SELECT srid FROM geometry_columns \
             WHERE f_table_name = $1 AND f_geometry_column = 'geometry'), 4326)",
            &[&table],
        )
        .await?
        .get(0);

    debug!(table = %table, columns = columns.len(), srid, "Schema introspected");

    Ok(TableSchema { table: table.to_string(), columns, srid })
}

/// Process-wide cached schema descriptor with an invalidation hook
#[derive(Debug)]
pub struct SchemaCache {
    table: String,
    cached: RwLock<Option<Arc<TableSchema>>>,
}

impl SchemaCache {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            cached: RwLock::new(None),
        }
    }

    /// Returns the cached descriptor, introspecting on first use
    pub async fn get(&self, client: &Object) -> Result<Arc<TableSchema>> {
        if let Some(schema) = self.cached.read().await.as_ref() {
            return Ok(Arc::clone(schema));
        }

        let mut guard = self.cached.write().await;
        // Another request may have filled the cache while we waited
        if let Some(schema) = guard.as_ref() {
            return Ok(Arc::clone(schema));
        }

        let schema = Arc::new(introspect(client, &self.table).await?);
        info!(
            table = %schema.table,
            columns = schema.columns.len(),
            srid = schema.srid,
            "Building table schema cached"
        );
        *guard = Some(Arc::clone(&schema));
        Ok(schema)
    }

    /// Drops the cached descriptor; the next `get` re-introspects
    pub async fn invalidate(&self) {
        *self.cached.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_columns_excludes_geometry() {
        let schema = TableSchema::fixed(
            "catasto_abitazioni",
            &["id", "objectid", "geometry", "centroide", "predisposto_fibra", "indirizzo"],
            4326,
        );
        let attrs = schema.attribute_columns(&["geometry", "centroide", "predisposto_fibra"]);
        assert_eq!(attrs, vec!["id", "objectid", "indirizzo"]);
    }

    #[test]
    fn test_attribute_columns_tolerates_missing_exclusions() {
        let schema = TableSchema::fixed("t", &["id", "nome"], 4326);
        let attrs = schema.attribute_columns(&["geometry", "centroide"]);
        assert_eq!(attrs, vec!["id", "nome"]);
    }
}
