use rusqlite::{Connection, OptionalExtension, params};

use super::types::*;
use crate::errors::AppError;

fn row_to_panchayat(row: &rusqlite::Row) -> rusqlite::Result<Panchayat> {
    Ok(Panchayat {
        id: row.get("id")?,
        name: row.get("name")?,
        label: row.get("label")?,
        language: row.get("language")?,
        created_at: row.get("created_at")?,
    })
}

/// Create a new panchayat, returning its id.
pub fn create(conn: &Connection, new: &NewPanchayat) -> Result<i64, AppError> {
    conn.execute(
        "INSERT INTO panchayats (name, label, language) VALUES (?1, ?2, ?3)",
        params![new.name, new.label, new.language],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_all(conn: &Connection) -> Result<Vec<Panchayat>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, label, language, created_at FROM panchayats ORDER BY name",
    )?;
    let rows = stmt
        .query_map([], row_to_panchayat)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Panchayat>, AppError> {
    let row = conn
        .query_row(
            "SELECT id, name, label, language, created_at FROM panchayats WHERE id = ?1",
            params![id],
            row_to_panchayat,
        )
        .optional()?;
    Ok(row)
}
