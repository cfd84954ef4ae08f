use actix_web::{HttpResponse, ResponseError};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Db(rusqlite::Error),
    Pool(r2d2::Error),
    Json(serde_json::Error),
    Http(reqwest::Error),
    Upstream(String),
    Validation(String),
    NotFound,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Pool(e) => write!(f, "Pool error: {e}"),
            AppError::Json(e) => write!(f, "JSON error: {e}"),
            AppError::Http(e) => write!(f, "HTTP error: {e}"),
            AppError::Upstream(e) => write!(f, "Upstream service error: {e}"),
            AppError::Validation(e) => write!(f, "Validation error: {e}"),
            AppError::NotFound => write!(f, "Not found"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound => HttpResponse::NotFound()
                .json(serde_json::json!({ "success": false, "message": "Not found" })),
            AppError::Validation(msg) => HttpResponse::BadRequest()
                .json(serde_json::json!({ "success": false, "message": msg })),
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError()
                    .json(serde_json::json!({ "success": false, "message": "Internal server error" }))
            }
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::Db(e)
    }
}

impl From<r2d2::Error> for AppError {
    fn from(e: r2d2::Error) -> Self {
        AppError::Pool(e)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Json(e)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Http(e)
    }
}
