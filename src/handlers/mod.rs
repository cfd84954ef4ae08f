pub mod gram_sabha_handlers;
pub mod issue_handlers;
pub mod issue_summary_handlers;
pub mod panchayat_handlers;

use actix_web::{HttpRequest, web};

use crate::errors::AppError;

/// Route table under `/api`, shared by the server binary and the tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Panchayat admin CRUD
            .route("/panchayats", web::get().to(panchayat_handlers::list))
            .route("/panchayats", web::post().to(panchayat_handlers::create))
            .route("/panchayats/{id}", web::get().to(panchayat_handlers::get))
            // Issue intake and lookup
            .route("/panchayats/{id}/issues", web::post().to(issue_handlers::create))
            .route("/panchayats/{id}/issues", web::get().to(issue_handlers::list))
            .route("/issues/{id}", web::get().to(issue_handlers::get))
            // Outstanding agenda aggregate
            .route(
                "/issue-summary/panchayat/{id}",
                web::get().to(issue_summary_handlers::get_for_panchayat),
            )
            .route(
                "/issue-summary/panchayat/{id}/agenda",
                web::patch().to(issue_summary_handlers::patch_agenda),
            )
            // Gram Sabha meetings
            .route("/gram-sabhas", web::post().to(gram_sabha_handlers::create))
            .route("/gram-sabhas/{id}", web::get().to(gram_sabha_handlers::get))
            .route(
                "/gram-sabhas/{id}/agenda",
                web::put().to(gram_sabha_handlers::update_agenda),
            )
            .route(
                "/gram-sabhas/{id}/status",
                web::post().to(gram_sabha_handlers::transition_status),
            )
            .route(
                "/panchayats/{id}/gram-sabhas",
                web::get().to(gram_sabha_handlers::list_for_panchayat),
            ),
    );
}

/// Acting user id, injected by the upstream gateway after authentication
/// (auth itself is not this service's concern).
pub fn acting_user_id(req: &HttpRequest) -> Result<String, AppError> {
    req.headers()
        .get("X-User-Id")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .ok_or_else(|| AppError::Validation("X-User-Id header is required".to_string()))
}
