use actix_web::{HttpResponse, web};

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::panchayat::{self, NewPanchayat};

/// GET /api/panchayats
pub async fn list(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let panchayats = panchayat::find_all(&conn)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "panchayats": panchayats,
    })))
}

/// POST /api/panchayats
pub async fn create(
    pool: web::Data<DbPool>,
    payload: web::Json<NewPanchayat>,
) -> Result<HttpResponse, AppError> {
    let new = payload.into_inner();
    if new.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }

    let conn = pool.get()?;
    let id = panchayat::create(&conn, &new)?;
    let created = panchayat::find_by_id(&conn, id)?;
    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "panchayat": created,
    })))
}

/// GET /api/panchayats/{id}
pub async fn get(pool: web::Data<DbPool>, path: web::Path<i64>) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let panchayat = panchayat::find_by_id(&conn, path.into_inner())?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "panchayat": panchayat,
    })))
}
