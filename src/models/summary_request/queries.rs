use rusqlite::{Connection, OptionalExtension, params};

use super::types::*;
use crate::errors::AppError;

const REQUEST_COLUMNS: &str = "id, request_id, panchayat_id, request_type, status, \
     status_url, result_url, retry_count, last_error, last_retry_at, created_at, updated_at";

fn row_to_request(row: &rusqlite::Row) -> rusqlite::Result<SummaryRequest> {
    let request_type: String = row.get("request_type")?;
    let status: String = row.get("status")?;
    Ok(SummaryRequest {
        id: row.get("id")?,
        request_id: row.get("request_id")?,
        panchayat_id: row.get("panchayat_id")?,
        request_type: RequestType::parse(&request_type).unwrap_or(RequestType::Create),
        status: RequestStatus::parse(&status).unwrap_or(RequestStatus::Failed),
        status_url: row.get("status_url")?,
        result_url: row.get("result_url")?,
        retry_count: row.get("retry_count")?,
        last_error: row.get("last_error")?,
        last_retry_at: row.get("last_retry_at")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Record a freshly initiated request as PROCESSING. The partial unique
/// index on (panchayat_id) WHERE status = 'PROCESSING' is the
/// database-level single-flight guard; a concurrent initiation for the
/// same panchayat fails here instead of double-submitting.
pub fn create(conn: &Connection, new: &NewSummaryRequest) -> Result<i64, AppError> {
    conn.execute(
        "INSERT INTO summary_requests \
             (request_id, panchayat_id, request_type, status, status_url, result_url) \
         VALUES (?1, ?2, ?3, 'PROCESSING', ?4, ?5)",
        params![
            new.request_id,
            new.panchayat_id,
            new.request_type.as_str(),
            new.status_url,
            new.result_url,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<SummaryRequest>, AppError> {
    let row = conn
        .query_row(
            &format!("SELECT {REQUEST_COLUMNS} FROM summary_requests WHERE id = ?1"),
            params![id],
            row_to_request,
        )
        .optional()?;
    Ok(row)
}

/// Is a request already in flight for this panchayat?
pub fn has_processing_for(conn: &Connection, panchayat_id: i64) -> Result<bool, AppError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM summary_requests \
         WHERE panchayat_id = ?1 AND status = 'PROCESSING'",
        params![panchayat_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn find_processing(conn: &Connection) -> Result<Vec<SummaryRequest>, AppError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {REQUEST_COLUMNS} FROM summary_requests \
         WHERE status = 'PROCESSING' ORDER BY id"
    ))?;
    let rows = stmt
        .query_map([], row_to_request)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Failed requests still under the retry cap. Requests at the cap stay
/// FAILED forever and are never selected again.
pub fn find_retryable(conn: &Connection) -> Result<Vec<SummaryRequest>, AppError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {REQUEST_COLUMNS} FROM summary_requests \
         WHERE status = 'FAILED' AND retry_count < ?1 ORDER BY id"
    ))?;
    let rows = stmt
        .query_map(params![MAX_RETRIES], row_to_request)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn mark_completed(conn: &Connection, id: i64) -> Result<(), AppError> {
    conn.execute(
        "UPDATE summary_requests SET status = 'COMPLETED', \
                updated_at = strftime('%Y-%m-%dT%H:%M:%S','now') \
         WHERE id = ?1",
        params![id],
    )?;
    Ok(())
}

pub fn mark_failed(conn: &Connection, id: i64, error: &str) -> Result<(), AppError> {
    conn.execute(
        "UPDATE summary_requests SET status = 'FAILED', last_error = ?1, \
                updated_at = strftime('%Y-%m-%dT%H:%M:%S','now') \
         WHERE id = ?2",
        params![error, id],
    )?;
    Ok(())
}

/// A retry was accepted by the external service: restamp the correlation
/// id and URLs, bump the attempt counter, clear the previous error and go
/// back to PROCESSING.
pub fn record_retry_success(
    conn: &Connection,
    id: i64,
    request_id: &str,
    status_url: &str,
    result_url: &str,
) -> Result<(), AppError> {
    conn.execute(
        "UPDATE summary_requests SET \
             request_id = ?1, status = 'PROCESSING', \
             status_url = ?2, result_url = ?3, \
             retry_count = retry_count + 1, last_error = NULL, \
             last_retry_at = strftime('%Y-%m-%dT%H:%M:%S','now'), \
             updated_at = strftime('%Y-%m-%dT%H:%M:%S','now') \
         WHERE id = ?4",
        params![request_id, status_url, result_url, id],
    )?;
    Ok(())
}

/// Give up on a request entirely: FAILED at the retry cap, so the retry
/// job never selects it again.
pub fn mark_failed_terminal(conn: &Connection, id: i64, error: &str) -> Result<(), AppError> {
    conn.execute(
        "UPDATE summary_requests SET status = 'FAILED', last_error = ?1, \
                retry_count = ?2, \
                updated_at = strftime('%Y-%m-%dT%H:%M:%S','now') \
         WHERE id = ?3",
        params![error, MAX_RETRIES, id],
    )?;
    Ok(())
}

/// A retry submission failed: record why and stay FAILED, to be picked up
/// again on the next tick (still subject to the cap).
pub fn record_retry_failure(conn: &Connection, id: i64, error: &str) -> Result<(), AppError> {
    conn.execute(
        "UPDATE summary_requests SET last_error = ?1, \
                last_retry_at = strftime('%Y-%m-%dT%H:%M:%S','now'), \
                updated_at = strftime('%Y-%m-%dT%H:%M:%S','now') \
         WHERE id = ?2",
        params![error, id],
    )?;
    Ok(())
}
