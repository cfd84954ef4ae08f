//! The three summary reconciliation jobs: initiate, fetch results, retry.
//!
//! Each tick works through its batch sequentially; a single panchayat's
//! or request's failure is recorded and never aborts the batch.

use std::time::Duration;

use crate::agenda;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::panchayat::Panchayat;
use crate::models::summary_request::{NewSummaryRequest, RequestType, SummaryRequest};
use crate::models::{issue, issue_summary, panchayat, summary_request};
use crate::summarizer::{CurrentAgendaItem, SummarizerClient};

const RETRY_PACING: Duration = Duration::from_millis(300);

/// English projection of the aggregate's SYSTEM-only agenda, used as
/// context for UPDATE requests.
fn system_agenda_projection(
    conn: &rusqlite::Connection,
    panchayat_id: i64,
) -> Result<Vec<CurrentAgendaItem>, AppError> {
    let items = issue_summary::find_by_panchayat(conn, panchayat_id)?
        .map(|s| s.agenda_items)
        .unwrap_or_default();
    Ok(items
        .iter()
        .filter(|i| i.is_system())
        .map(CurrentAgendaItem::from_item)
        .collect())
}

/// For every panchayat with unsummarized, transcription-complete issues
/// and no request already in flight, submit a CREATE or UPDATE to the
/// summarizer and persist the returned handle as PROCESSING.
pub async fn initiate_summary_generation(pool: &DbPool, client: &SummarizerClient) {
    let panchayats = {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(e) => {
                log::error!("Initiation job: failed to get DB connection: {e}");
                return;
            }
        };
        match panchayat::find_all(&conn) {
            Ok(p) => p,
            Err(e) => {
                log::error!("Initiation job: failed to list panchayats: {e}");
                return;
            }
        }
    };

    for p in panchayats {
        if let Err(e) = initiate_for_panchayat(pool, client, &p).await {
            log::error!("Initiation job: panchayat {} failed: {e}", p.id);
        }
    }
}

async fn initiate_for_panchayat(
    pool: &DbPool,
    client: &SummarizerClient,
    p: &Panchayat,
) -> Result<(), AppError> {
    let (issues, system_agenda) = {
        let conn = pool.get()?;
        // Single-flight guard: one in-flight request per panchayat.
        if summary_request::has_processing_for(&conn, p.id)? {
            return Ok(());
        }
        let issues = issue::find_unsummarized_completed(&conn, p.id)?;
        if issues.is_empty() {
            return Ok(());
        }
        let system_agenda = system_agenda_projection(&conn, p.id)?;
        (issues, system_agenda)
    };

    let language = p.language.to_lowercase();
    let (request_type, response) = if !system_agenda.is_empty() {
        let response = client
            .initiate_update_summary(&system_agenda, &issues, &language)
            .await?;
        (RequestType::Update, response)
    } else {
        let response = client.initiate_new_summary(&issues, &language).await?;
        (RequestType::Create, response)
    };

    let conn = pool.get()?;
    summary_request::create(
        &conn,
        &NewSummaryRequest {
            request_id: response.request_id,
            panchayat_id: p.id,
            request_type,
            status_url: response.status_url,
            result_url: response.result_url,
        },
    )?;
    log::info!(
        "Initiated {} summary request for panchayat {} ({} issues)",
        request_type.as_str(),
        p.id,
        issues.len()
    );
    Ok(())
}

/// Poll every PROCESSING request; fold completed results into the
/// aggregate, record failures. COMPLETED/FAILED requests are filtered
/// out of the query, which makes a repeated run a no-op.
pub async fn fetch_summary_results(pool: &DbPool, client: &SummarizerClient) {
    let pending = {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(e) => {
                log::error!("Fetch job: failed to get DB connection: {e}");
                return;
            }
        };
        match summary_request::find_processing(&conn) {
            Ok(r) => r,
            Err(e) => {
                log::error!("Fetch job: failed to list processing requests: {e}");
                return;
            }
        }
    };

    for request in pending {
        if let Err(e) = fetch_one(pool, client, &request).await {
            log::error!("Fetch job: request {} failed: {e}", request.request_id);
        }
    }
}

async fn fetch_one(
    pool: &DbPool,
    client: &SummarizerClient,
    request: &SummaryRequest,
) -> Result<(), AppError> {
    let status = client.check_status(&request.status_url).await?;

    if status.status != "completed" {
        if status.status == "failed" {
            let conn = pool.get()?;
            let error = status
                .error
                .unwrap_or_else(|| "Unknown error from summarizer".to_string());
            summary_request::mark_failed(&conn, request.id, &error)?;
        }
        // Anything else is still processing; leave it alone.
        return Ok(());
    }

    let result = client.fetch_result(&request.result_url).await?;
    if result.llm_status != "success" {
        let conn = pool.get()?;
        summary_request::mark_failed(
            &conn,
            request.id,
            &format!("LLM failed with status: {}", result.llm_status),
        )?;
        return Ok(());
    }

    let mut conn = pool.get()?;
    let linked = agenda::fold_summary_result(&mut conn, request.panchayat_id, &result)?;
    summary_request::mark_completed(&conn, request.id)?;
    log::info!(
        "Folded summary result for panchayat {} ({} linked issues)",
        request.panchayat_id,
        linked.len()
    );
    Ok(())
}

/// Resubmit FAILED requests still under the retry cap, rebuilding the
/// submission from current store state.
pub async fn retry_failed_requests(pool: &DbPool, client: &SummarizerClient) {
    let failed = {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(e) => {
                log::error!("Retry job: failed to get DB connection: {e}");
                return;
            }
        };
        match summary_request::find_retryable(&conn) {
            Ok(r) => r,
            Err(e) => {
                log::error!("Retry job: failed to list retryable requests: {e}");
                return;
            }
        }
    };

    for request in failed {
        if let Err(e) = retry_one(pool, client, &request).await {
            log::error!("Retry job: request {} failed: {e}", request.request_id);
        }
        // Pace resubmissions so a batch does not burst the service.
        tokio::time::sleep(RETRY_PACING).await;
    }
}

async fn retry_one(
    pool: &DbPool,
    client: &SummarizerClient,
    request: &SummaryRequest,
) -> Result<(), AppError> {
    let (panchayat, issues, system_agenda) = {
        let conn = pool.get()?;

        let Some(panchayat) = panchayat::find_by_id(&conn, request.panchayat_id)? else {
            summary_request::mark_failed_terminal(&conn, request.id, "Panchayat not found")?;
            return Ok(());
        };

        let issues = issue::find_unsummarized_completed(&conn, request.panchayat_id)?;
        if issues.is_empty() {
            // Nothing left to summarize; the request has nothing to redo.
            summary_request::mark_completed(&conn, request.id)?;
            return Ok(());
        }

        let system_agenda = match request.request_type {
            RequestType::Update => {
                let agenda = system_agenda_projection(&conn, request.panchayat_id)?;
                if agenda.is_empty() {
                    summary_request::mark_failed_terminal(
                        &conn,
                        request.id,
                        "No SYSTEM agenda items found to update",
                    )?;
                    return Ok(());
                }
                agenda
            }
            RequestType::Create => Vec::new(),
        };
        (panchayat, issues, system_agenda)
    };

    let language = panchayat.language.to_lowercase();
    let response = match request.request_type {
        RequestType::Update => {
            client
                .initiate_update_summary(&system_agenda, &issues, &language)
                .await
        }
        RequestType::Create => client.initiate_new_summary(&issues, &language).await,
    };

    let conn = pool.get()?;
    match response {
        Ok(r) => {
            summary_request::record_retry_success(
                &conn,
                request.id,
                &r.request_id,
                &r.status_url,
                &r.result_url,
            )?;
            log::info!(
                "Resubmitted summary request for panchayat {} (attempt {})",
                request.panchayat_id,
                request.retry_count + 1
            );
        }
        Err(e) => {
            summary_request::record_retry_failure(&conn, request.id, &e.to_string())?;
        }
    }
    Ok(())
}
