use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use super::acting_user_id;
use crate::agenda::{self, ReplaceOutcome};
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::agenda_item::AgendaItem;
use crate::models::{issue_summary, panchayat};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaPatch {
    pub agenda_items: Vec<AgendaItem>,
}

/// GET /api/issue-summary/panchayat/{id}
pub async fn get_for_panchayat(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let summary =
        issue_summary::find_by_panchayat(&conn, path.into_inner())?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "summary": {
            "agendaItems": summary.agenda_items,
            "issues": summary.issues,
        },
    })))
}

/// PATCH /api/issue-summary/panchayat/{id}/agenda
///
/// Full replacement of the outstanding agenda. An empty list deletes the
/// aggregate entirely.
pub async fn patch_agenda(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    payload: web::Json<AgendaPatch>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let panchayat_id = path.into_inner();
    let acting_user = acting_user_id(&req)?;

    let mut conn = pool.get()?;
    if panchayat::find_by_id(&conn, panchayat_id)?.is_none() {
        return Err(AppError::NotFound);
    }

    let outcome = agenda::replace_outstanding_agenda(
        &mut conn,
        panchayat_id,
        payload.into_inner().agenda_items,
        &acting_user,
    )?;

    match outcome {
        ReplaceOutcome::Deleted => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "deleted": true,
        }))),
        ReplaceOutcome::Updated(items) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "agendaItems": items,
        }))),
    }
}
