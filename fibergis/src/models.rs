//! Wire records for the predisposition and TFO collaborators
//!
//! Field names are the store column names; they double as the JSON
//! contract consumed by the map front end.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// Fiber-readiness cluster of a building, as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Predisposition {
    pub id: i32,
    pub indirizzo: Option<String>,
    pub comune: Option<String>,
    pub codice_catastale: Option<String>,
    pub data_predisposizione: Option<NaiveDate>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub uso_edificio: Option<String>,
    pub codice_belfiore: Option<String>,
    pub predisposto_fibra: Option<bool>,
}

impl Predisposition {
    /// Maps a row selected with the canonical predisposition column list
    pub fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            indirizzo: row.try_get("indirizzo")?,
            comune: row.try_get("comune")?,
            codice_catastale: row.try_get("codice_catastale")?,
            data_predisposizione: row.try_get("data_predisposizione")?,
            lat: row.try_get("lat")?,
            lon: row.try_get("lon")?,
            uso_edificio: row.try_get("uso_edificio")?,
            codice_belfiore: row.try_get("codice_belfiore")?,
            predisposto_fibra: row.try_get("predisposto_fibra")?,
        })
    }
}

/// Create/update payload for a building's fiber-readiness cluster
///
/// `indirizzo`, `comune` and `data_predisposizione` are mandatory: a
/// predisposition write sets the whole cluster in one transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredispositionUpsert {
    pub id: i32,
    pub indirizzo: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub uso_edificio: Option<String>,
    pub comune: String,
    pub codice_belfiore: Option<String>,
    pub codice_catastale: Option<String>,
    pub data_predisposizione: NaiveDate,
}

/// Termination point enriched with its building's address fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tfo {
    pub id: i32,
    pub id_abitazione: i32,
    pub data_predisposizione: Option<NaiveDate>,
    pub scala: Option<String>,
    pub piano: Option<String>,
    pub interno: Option<String>,
    pub id_operatore: Option<String>,
    pub id_tfo: Option<String>,
    pub id_roe: Option<String>,
    pub indirizzo: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub codice_catastale: Option<String>,
}

impl Tfo {
    /// Maps a row carrying both TFO and building columns
    pub fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            id_abitazione: row.try_get("id_abitazione")?,
            data_predisposizione: row.try_get("data_predisposizione")?,
            scala: row.try_get("scala")?,
            piano: row.try_get("piano")?,
            interno: row.try_get("interno")?,
            id_operatore: row.try_get("id_operatore")?,
            id_tfo: row.try_get("id_tfo")?,
            id_roe: row.try_get("id_roe")?,
            indirizzo: row.try_get("indirizzo")?,
            lat: row.try_get("lat")?,
            lon: row.try_get("lon")?,
            codice_catastale: row.try_get("codice_catastale")?,
        })
    }
}

/// Create/update payload for a termination point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfoUpsert {
    pub id_abitazione: i32,
    pub data_predisposizione_tfo: Option<NaiveDate>,
    pub scala: Option<String>,
    pub piano: Option<String>,
    pub interno: Option<String>,
    pub id_operatore: Option<String>,
    pub id_tfo: Option<String>,
    pub id_roe: Option<String>,
}

/// Generic success envelope for delete operations
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: Some(message.into()),
        }
    }
}
