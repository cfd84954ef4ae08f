use rusqlite::{Connection, OptionalExtension, params};

use super::types::*;
use crate::errors::AppError;
use crate::models::agenda_item::AgendaItem;

struct RawSummary {
    id: i64,
    panchayat_id: i64,
    agenda_items: String,
    issues: String,
    created_at: String,
    updated_at: String,
}

fn row_to_raw(row: &rusqlite::Row) -> rusqlite::Result<RawSummary> {
    Ok(RawSummary {
        id: row.get("id")?,
        panchayat_id: row.get("panchayat_id")?,
        agenda_items: row.get("agenda_items")?,
        issues: row.get("issues")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_summary(raw: RawSummary) -> Result<IssueSummary, AppError> {
    Ok(IssueSummary {
        id: raw.id,
        panchayat_id: raw.panchayat_id,
        agenda_items: serde_json::from_str(&raw.agenda_items)?,
        issues: serde_json::from_str(&raw.issues)?,
        created_at: raw.created_at,
        updated_at: raw.updated_at,
    })
}

pub fn find_by_panchayat(
    conn: &Connection,
    panchayat_id: i64,
) -> Result<Option<IssueSummary>, AppError> {
    let raw = conn
        .query_row(
            "SELECT id, panchayat_id, agenda_items, issues, created_at, updated_at \
             FROM issue_summaries WHERE panchayat_id = ?1",
            params![panchayat_id],
            row_to_raw,
        )
        .optional()?;
    raw.map(parse_summary).transpose()
}

pub fn find_all(conn: &Connection) -> Result<Vec<IssueSummary>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT id, panchayat_id, agenda_items, issues, created_at, updated_at \
         FROM issue_summaries ORDER BY panchayat_id",
    )?;
    let raws = stmt
        .query_map([], row_to_raw)?
        .collect::<Result<Vec<_>, _>>()?;
    raws.into_iter().map(parse_summary).collect()
}

/// Create or replace the aggregate for a panchayat. The summary row is
/// created lazily on first mutation.
pub fn upsert(
    conn: &Connection,
    panchayat_id: i64,
    agenda_items: &[AgendaItem],
    issues: &[i64],
) -> Result<(), AppError> {
    conn.execute(
        "INSERT INTO issue_summaries (panchayat_id, agenda_items, issues) \
         VALUES (?1, ?2, ?3) \
         ON CONFLICT(panchayat_id) DO UPDATE SET \
             agenda_items = excluded.agenda_items, \
             issues = excluded.issues, \
             updated_at = strftime('%Y-%m-%dT%H:%M:%S','now')",
        params![
            panchayat_id,
            serde_json::to_string(agenda_items)?,
            serde_json::to_string(issues)?,
        ],
    )?;
    Ok(())
}

/// Delete the aggregate, returning what was deleted (callers clear the
/// linked issues' flags from it).
pub fn delete_by_panchayat(
    conn: &Connection,
    panchayat_id: i64,
) -> Result<Option<IssueSummary>, AppError> {
    let existing = find_by_panchayat(conn, panchayat_id)?;
    if existing.is_some() {
        conn.execute(
            "DELETE FROM issue_summaries WHERE panchayat_id = ?1",
            params![panchayat_id],
        )?;
    }
    Ok(existing)
}
