use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use super::acting_user_id;
use crate::agenda;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::agenda_item::{AgendaItem, new_item_id};
use crate::models::gram_sabha::{self, MeetingStatus, NewGramSabha};
use crate::models::panchayat;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMeetingPayload {
    pub panchayat_id: i64,
    pub title: String,
    pub date_time: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub scheduled_duration_hours: Option<f64>,
    #[serde(default)]
    pub agenda: Option<Vec<AgendaItem>>,
    /// Items picked out of the panchayat-wide outstanding agenda; these
    /// get claimed from the pool on creation.
    #[serde(default)]
    pub selected_agenda_items: Option<Vec<AgendaItem>>,
    #[serde(default)]
    pub meeting_link: Option<String>,
    #[serde(default)]
    pub conference_data: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAgendaPayload {
    pub selected_agenda_items: Vec<AgendaItem>,
}

#[derive(Debug, Deserialize)]
pub struct TransitionPayload {
    pub status: String,
}

/// POST /api/gram-sabhas
pub async fn create(
    pool: web::Data<DbPool>,
    payload: web::Json<CreateMeetingPayload>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let payload = payload.into_inner();
    let scheduled_by = acting_user_id(&req)?;

    if payload.title.trim().is_empty() {
        return Err(AppError::Validation("title is required".to_string()));
    }
    if payload.date_time.trim().is_empty() {
        return Err(AppError::Validation("dateTime is required".to_string()));
    }

    let selected = payload.selected_agenda_items.unwrap_or_default();
    let mut agenda_items = payload.agenda.unwrap_or_default();
    if agenda_items.is_empty() && !selected.is_empty() {
        agenda_items = selected.clone();
    }
    if agenda_items.is_empty() {
        return Err(AppError::Validation(
            "Either agenda or selectedAgendaItems must be provided".to_string(),
        ));
    }
    for item in agenda_items.iter_mut() {
        if item.id.is_empty() {
            item.id = new_item_id();
        }
    }

    let mut conn = pool.get()?;
    if panchayat::find_by_id(&conn, payload.panchayat_id)?.is_none() {
        return Err(AppError::NotFound);
    }

    let id = gram_sabha::create(
        &conn,
        payload.panchayat_id,
        &NewGramSabha {
            title: payload.title,
            date_time: payload.date_time,
            location: payload.location,
            scheduled_duration_hours: payload.scheduled_duration_hours.unwrap_or(1.0),
            agenda: agenda_items,
            meeting_link: payload.meeting_link,
            conference_data: payload.conference_data,
            scheduled_by,
        },
    )?;

    // Claim the picked items out of the outstanding agenda. A brand-new
    // meeting has no previous snapshot.
    if !selected.is_empty() {
        agenda::apply_meeting_selection(&mut conn, payload.panchayat_id, &selected, &[])?;
    }

    let meeting = gram_sabha::find_by_id(&conn, id)?;
    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "gramSabha": meeting,
    })))
}

/// PUT /api/gram-sabhas/{id}/agenda
///
/// Replace this meeting's selection. Deselected items return to the
/// outstanding agenda; newly selected items are claimed from it. An
/// empty list returns everything.
pub async fn update_agenda(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    payload: web::Json<UpdateAgendaPayload>,
) -> Result<HttpResponse, AppError> {
    let mut conn = pool.get()?;
    let meeting = gram_sabha::find_by_id(&conn, path.into_inner())?.ok_or(AppError::NotFound)?;

    let selected = payload.into_inner().selected_agenda_items;
    agenda::apply_meeting_selection(&mut conn, meeting.panchayat_id, &selected, &meeting.agenda)?;
    gram_sabha::update_agenda(&conn, meeting.id, &selected)?;

    let updated = gram_sabha::find_by_id(&conn, meeting.id)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "gramSabha": updated,
    })))
}

/// POST /api/gram-sabhas/{id}/status
pub async fn transition_status(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    payload: web::Json<TransitionPayload>,
) -> Result<HttpResponse, AppError> {
    let new_status = MeetingStatus::parse(&payload.status)
        .ok_or_else(|| AppError::Validation(format!("invalid status: {}", payload.status)))?;

    let conn = pool.get()?;
    let meeting = gram_sabha::find_by_id(&conn, path.into_inner())?.ok_or(AppError::NotFound)?;

    if !meeting.status.can_transition_to(new_status) {
        return Err(AppError::Validation(format!(
            "Cannot transition meeting from {} to {}",
            meeting.status.as_str(),
            new_status.as_str()
        )));
    }

    gram_sabha::update_status(&conn, meeting.id, new_status)?;
    let updated = gram_sabha::find_by_id(&conn, meeting.id)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "gramSabha": updated,
    })))
}

/// GET /api/gram-sabhas/{id}
pub async fn get(pool: web::Data<DbPool>, path: web::Path<i64>) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let meeting = gram_sabha::find_by_id(&conn, path.into_inner())?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "gramSabha": meeting,
    })))
}

/// GET /api/panchayats/{id}/gram-sabhas
pub async fn list_for_panchayat(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let panchayat_id = path.into_inner();
    let conn = pool.get()?;
    if panchayat::find_by_id(&conn, panchayat_id)?.is_none() {
        return Err(AppError::NotFound);
    }
    let meetings = gram_sabha::find_for_panchayat(&conn, panchayat_id)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "gramSabhas": meetings,
    })))
}
