use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::issue::{self, IssueStatus, NewIssue};
use crate::models::panchayat;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueListQuery {
    pub status: Option<String>,
    pub is_summarized: Option<bool>,
}

/// POST /api/panchayats/{id}/issues
pub async fn create(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    payload: web::Json<NewIssue>,
) -> Result<HttpResponse, AppError> {
    let panchayat_id = path.into_inner();
    let conn = pool.get()?;
    if panchayat::find_by_id(&conn, panchayat_id)?.is_none() {
        return Err(AppError::NotFound);
    }

    let id = issue::create(&conn, panchayat_id, &payload)?;
    let created = issue::find_by_id(&conn, id)?;
    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "issue": created,
    })))
}

/// GET /api/panchayats/{id}/issues
pub async fn list(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    query: web::Query<IssueListQuery>,
) -> Result<HttpResponse, AppError> {
    let panchayat_id = path.into_inner();

    let status = match query.status.as_deref() {
        Some(raw) => Some(
            IssueStatus::parse(raw)
                .ok_or_else(|| AppError::Validation(format!("invalid status: {raw}")))?,
        ),
        None => None,
    };

    let conn = pool.get()?;
    if panchayat::find_by_id(&conn, panchayat_id)?.is_none() {
        return Err(AppError::NotFound);
    }

    let issues = issue::find_for_panchayat(&conn, panchayat_id, status, query.is_summarized)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "issues": issues,
    })))
}

/// GET /api/issues/{id}
pub async fn get(pool: web::Data<DbPool>, path: web::Path<i64>) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let issue = issue::find_by_id(&conn, path.into_inner())?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "issue": issue,
    })))
}
