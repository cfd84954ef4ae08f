use rusqlite::{Connection, OptionalExtension, params};

use super::types::*;
use crate::errors::AppError;
use crate::models::agenda_item::AgendaItem;

const MEETING_COLUMNS: &str = "id, panchayat_id, title, date_time, location, \
     scheduled_duration_hours, status, agenda, attendances, meeting_link, \
     conference_data, minutes, transcript, conclusion, actual_duration_minutes, \
     scheduled_by, created_at, updated_at";

struct RawMeeting {
    id: i64,
    panchayat_id: i64,
    title: String,
    date_time: String,
    location: String,
    scheduled_duration_hours: f64,
    status: String,
    agenda: String,
    attendances: String,
    meeting_link: Option<String>,
    conference_data: Option<String>,
    minutes: Option<String>,
    transcript: Option<String>,
    conclusion: Option<String>,
    actual_duration_minutes: Option<i64>,
    scheduled_by: String,
    created_at: String,
    updated_at: String,
}

fn row_to_raw(row: &rusqlite::Row) -> rusqlite::Result<RawMeeting> {
    Ok(RawMeeting {
        id: row.get("id")?,
        panchayat_id: row.get("panchayat_id")?,
        title: row.get("title")?,
        date_time: row.get("date_time")?,
        location: row.get("location")?,
        scheduled_duration_hours: row.get("scheduled_duration_hours")?,
        status: row.get("status")?,
        agenda: row.get("agenda")?,
        attendances: row.get("attendances")?,
        meeting_link: row.get("meeting_link")?,
        conference_data: row.get("conference_data")?,
        minutes: row.get("minutes")?,
        transcript: row.get("transcript")?,
        conclusion: row.get("conclusion")?,
        actual_duration_minutes: row.get("actual_duration_minutes")?,
        scheduled_by: row.get("scheduled_by")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_meeting(raw: RawMeeting) -> Result<GramSabha, AppError> {
    Ok(GramSabha {
        id: raw.id,
        panchayat_id: raw.panchayat_id,
        title: raw.title,
        date_time: raw.date_time,
        location: raw.location,
        scheduled_duration_hours: raw.scheduled_duration_hours,
        status: MeetingStatus::parse(&raw.status).unwrap_or(MeetingStatus::Scheduled),
        agenda: serde_json::from_str(&raw.agenda)?,
        attendances: serde_json::from_str(&raw.attendances).unwrap_or_default(),
        meeting_link: raw.meeting_link,
        conference_data: raw
            .conference_data
            .as_deref()
            .and_then(|d| serde_json::from_str(d).ok()),
        minutes: raw.minutes,
        transcript: raw.transcript,
        conclusion: raw.conclusion,
        actual_duration_minutes: raw.actual_duration_minutes,
        scheduled_by: raw.scheduled_by,
        created_at: raw.created_at,
        updated_at: raw.updated_at,
    })
}

/// Create a new meeting, returning its id.
pub fn create(conn: &Connection, panchayat_id: i64, new: &NewGramSabha) -> Result<i64, AppError> {
    let conference_data = new
        .conference_data
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;
    conn.execute(
        "INSERT INTO gram_sabhas \
             (panchayat_id, title, date_time, location, scheduled_duration_hours, \
              agenda, meeting_link, conference_data, scheduled_by) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            panchayat_id,
            new.title,
            new.date_time,
            new.location,
            new.scheduled_duration_hours,
            serde_json::to_string(&new.agenda)?,
            new.meeting_link,
            conference_data,
            new.scheduled_by,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<GramSabha>, AppError> {
    let raw = conn
        .query_row(
            &format!("SELECT {MEETING_COLUMNS} FROM gram_sabhas WHERE id = ?1"),
            params![id],
            row_to_raw,
        )
        .optional()?;
    raw.map(parse_meeting).transpose()
}

pub fn find_for_panchayat(
    conn: &Connection,
    panchayat_id: i64,
) -> Result<Vec<GramSabha>, AppError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {MEETING_COLUMNS} FROM gram_sabhas \
         WHERE panchayat_id = ?1 ORDER BY date_time DESC"
    ))?;
    let raws = stmt
        .query_map(params![panchayat_id], row_to_raw)?
        .collect::<Result<Vec<_>, _>>()?;
    raws.into_iter().map(parse_meeting).collect()
}

/// Meetings with a non-empty agenda that are not concluded or cancelled;
/// the translation job fills their missing language keys.
pub fn find_open_with_agenda(conn: &Connection) -> Result<Vec<GramSabha>, AppError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {MEETING_COLUMNS} FROM gram_sabhas \
         WHERE status NOT IN ('CONCLUDED', 'CANCELLED') AND agenda != '[]' \
         ORDER BY id"
    ))?;
    let raws = stmt
        .query_map([], row_to_raw)?
        .collect::<Result<Vec<_>, _>>()?;
    raws.into_iter().map(parse_meeting).collect()
}

/// Replace the meeting's agenda snapshot.
pub fn update_agenda(conn: &Connection, id: i64, agenda: &[AgendaItem]) -> Result<(), AppError> {
    conn.execute(
        "UPDATE gram_sabhas SET agenda = ?1, \
                updated_at = strftime('%Y-%m-%dT%H:%M:%S','now') \
         WHERE id = ?2",
        params![serde_json::to_string(agenda)?, id],
    )?;
    Ok(())
}

pub fn update_status(conn: &Connection, id: i64, status: MeetingStatus) -> Result<(), AppError> {
    conn.execute(
        "UPDATE gram_sabhas SET status = ?1, \
                updated_at = strftime('%Y-%m-%dT%H:%M:%S','now') \
         WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    Ok(())
}
