//! Termination-point (TFO) collaborator
//!
//! Termination points belong to predisposed buildings. Creation checks
//! the precondition (building exists AND is predisposed) before
//! inserting; the readiness flag is never flipped implicitly here, the
//! predisposition write owns it.

use deadpool_postgres::Object;
use tracing::info;

use crate::error::{Error, Result};
use crate::models::{Tfo, TfoUpsert};

const TFO_RETURNING: &str = "id, id_abitazione, scala, piano, interno, \
     id_operatore, id_tfo, id_roe, data_predisposizione_tfo AS data_predisposizione";

/// Lists the activated termination points of a building, enriched with
/// the building's address fields
pub async fn list_for_building(client: &Object, building_id: i32) -> Result<Vec<Tfo>> {
    let rows = client
        .query(
            "SELECT v.id, v.id_abitazione, \
                 v.data_predisposizione_tfo AS data_predisposizione, \
                 v.scala, v.piano, v.interno, v.id_operatore, v.id_tfo, v.id_roe, \
                 c.indirizzo, c.lat::float8 AS lat, c.lon::float8 AS lon, c.codice_catastale \
             FROM verifiche_edifici v \
             JOIN catasto_abitazioni c ON v.id_abitazione = c.id \
             WHERE v.id_abitazione = $1 AND v.id_tfo IS NOT NULL",
            &[&building_id],
        )
        .await?;

    rows.iter()
        .map(|row| Tfo::from_row(row).map_err(Error::from))
        .collect()
}

/// Creates a termination point under a predisposed building
///
/// # Errors
/// `Error::NotFound` when the building is absent or not predisposed.
pub async fn create(client: &mut Object, data: &TfoUpsert) -> Result<Tfo> {
    let tx = client.transaction().await?;

    let building = tx
        .query_opt(
            "SELECT indirizzo, lat::float8 AS lat, lon::float8 AS lon, codice_catastale \
             FROM catasto_abitazioni WHERE id = $1 AND predisposto_fibra = true",
            &[&data.id_abitazione],
        )
        .await?
        .ok_or_else(|| {
            Error::not_found(format!(
                "Edificio predisposto con ID {} non trovato o non predisposto",
                data.id_abitazione
            ))
        })?;

    let row = tx
        .query_one(
            &format!(
                "INSERT INTO verifiche_edifici ( \
                     id_abitazione, scala, piano, interno, \
                     id_operatore, id_tfo, id_roe, data_predisposizione_tfo \
                 ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
                 RETURNING {TFO_RETURNING}"
            ),
            &[
                &data.id_abitazione,
                &data.scala,
                &data.piano,
                &data.interno,
                &data.id_operatore,
                &data.id_tfo,
                &data.id_roe,
                &data.data_predisposizione_tfo,
            ],
        )
        .await?;

    tx.commit().await?;

    let mut tfo = Tfo::from_row(&row)?;
    tfo.indirizzo = building.try_get("indirizzo")?;
    tfo.lat = building.try_get("lat")?;
    tfo.lon = building.try_get("lon")?;
    tfo.codice_catastale = building.try_get("codice_catastale")?;

    info!(tfo_id = tfo.id, building_id = tfo.id_abitazione, "TFO created");
    Ok(tfo)
}

/// Updates a termination point by id; the TFO may move to another
/// building, which must itself exist
pub async fn update(client: &mut Object, tfo_id: i32, data: &TfoUpsert) -> Result<Tfo> {
    let tx = client.transaction().await?;

    let row = tx
        .query_opt(
            &format!(
                "UPDATE verifiche_edifici SET \
                     data_predisposizione_tfo = $1, scala = $2, piano = $3, interno = $4, \
                     id_operatore = $5, id_tfo = $6, id_roe = $7, id_abitazione = $8 \
                 WHERE id = $9 \
                 RETURNING {TFO_RETURNING}"
            ),
            &[
                &data.data_predisposizione_tfo,
                &data.scala,
                &data.piano,
                &data.interno,
                &data.id_operatore,
                &data.id_tfo,
                &data.id_roe,
                &data.id_abitazione,
                &tfo_id,
            ],
        )
        .await?
        .ok_or_else(|| Error::not_found(format!("TFO ID {tfo_id} non trovata")))?;

    let mut tfo = Tfo::from_row(&row)?;

    let building = tx
        .query_opt(
            "SELECT indirizzo, lat::float8 AS lat, lon::float8 AS lon, codice_catastale \
             FROM catasto_abitazioni WHERE id = $1",
            &[&tfo.id_abitazione],
        )
        .await?
        .ok_or_else(|| {
            Error::not_found(format!(
                "Edificio associato ID {} non trovato",
                tfo.id_abitazione
            ))
        })?;

    tx.commit().await?;

    tfo.indirizzo = building.try_get("indirizzo")?;
    tfo.lat = building.try_get("lat")?;
    tfo.lon = building.try_get("lon")?;
    tfo.codice_catastale = building.try_get("codice_catastale")?;

    Ok(tfo)
}

/// Deletes a termination point by id
pub async fn delete(client: &Object, tfo_id: i32) -> Result<()> {
    let deleted = client
        .execute("DELETE FROM verifiche_edifici WHERE id = $1", &[&tfo_id])
        .await?;

    if deleted == 0 {
        return Err(Error::not_found(format!("TFO ID {tfo_id} non trovata")));
    }

    info!(tfo_id, "TFO deleted");
    Ok(())
}
