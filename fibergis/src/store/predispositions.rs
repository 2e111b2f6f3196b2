//! Predisposition collaborator: the fiber-readiness cluster of a building
//!
//! The cluster lives on the building row itself. A predisposition write
//! sets every field of the cluster (and the flag) in one transaction; a
//! deletion clears them all and cascades over the owned termination
//! points. Partial states are never left visible.

use deadpool_postgres::Object;
use tracing::info;

use crate::error::{Error, Result};
use crate::models::{Predisposition, PredispositionUpsert};

const PREDISPOSITION_COLUMNS: &str = "id, indirizzo, comune, codice_catastale, \
     data_predisposizione, lat::float8 AS lat, lon::float8 AS lon, \
     uso_edificio, codice_belfiore, predisposto_fibra";

/// Lists every predisposed building, ordered by id
pub async fn list_all(client: &Object) -> Result<Vec<Predisposition>> {
    let rows = client
        .query(
            &format!(
                "SELECT {PREDISPOSITION_COLUMNS} FROM catasto_abitazioni \
                 WHERE predisposto_fibra = true ORDER BY id ASC"
            ),
            &[],
        )
        .await?;

    rows.iter()
        .map(|row| Predisposition::from_row(row).map_err(Error::from))
        .collect()
}

/// Creates or updates the fiber-readiness cluster of an existing building
///
/// # Errors
/// `Error::NotFound` when no building carries the requested id; the
/// transaction rolls back and no row is modified.
pub async fn upsert(client: &mut Object, data: &PredispositionUpsert) -> Result<Predisposition> {
    let tx = client.transaction().await?;

    let exists = tx
        .query_opt("SELECT id FROM catasto_abitazioni WHERE id = $1", &[&data.id])
        .await?;
    if exists.is_none() {
        // Dropping the transaction rolls it back
        return Err(Error::not_found(format!(
            "Edificio con ID {} non trovato",
            data.id
        )));
    }

    let row = tx
        .query_one(
            &format!(
                "UPDATE catasto_abitazioni SET \
                     predisposto_fibra = true, \
                     indirizzo = $1, \
                     lat = $2::float8, \
                     lon = $3::float8, \
                     uso_edificio = $4, \
                     comune = $5, \
                     codice_belfiore = $6, \
                     codice_catastale = $7, \
                     data_predisposizione = $8 \
                 WHERE id = $9 \
                 RETURNING {PREDISPOSITION_COLUMNS}"
            ),
            &[
                &data.indirizzo,
                &data.lat,
                &data.lon,
                &data.uso_edificio,
                &data.comune,
                &data.codice_belfiore,
                &data.codice_catastale,
                &data.data_predisposizione,
                &data.id,
            ],
        )
        .await?;

    let record = Predisposition::from_row(&row)?;
    tx.commit().await?;

    info!(building_id = data.id, "Predisposition stored");
    Ok(record)
}

/// Deletes a building's predisposition: removes its termination points,
/// then clears the whole fiber-readiness cluster, atomically
///
/// Returns the number of termination points removed.
///
/// # Errors
/// `Error::NotFound` when the building id matches no row; everything
/// rolls back, including the termination-point delete.
pub async fn delete(client: &mut Object, building_id: i32) -> Result<u64> {
    let tx = client.transaction().await?;

    let deleted_tfos = tx
        .execute(
            "DELETE FROM verifiche_edifici WHERE id_abitazione = $1",
            &[&building_id],
        )
        .await?;

    let reset = tx
        .execute(
            "UPDATE catasto_abitazioni SET \
                 predisposto_fibra = NULL, \
                 indirizzo = NULL, \
                 comune = NULL, \
                 codice_catastale = NULL, \
                 data_predisposizione = NULL, \
                 lat = NULL, \
                 lon = NULL, \
                 uso_edificio = NULL, \
                 codice_belfiore = NULL \
             WHERE id = $1",
            &[&building_id],
        )
        .await?;

    if reset == 0 {
        return Err(Error::not_found(format!(
            "Nessuna predisposizione trovata per ID edificio {building_id}"
        )));
    }

    tx.commit().await?;

    info!(building_id, deleted_tfos, "Predisposition cleared");
    Ok(deleted_tfos)
}
