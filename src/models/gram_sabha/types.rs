use serde::{Deserialize, Serialize};

use crate::models::agenda_item::AgendaItem;

/// Meeting lifecycle. `SCHEDULED -> IN_PROGRESS -> CONCLUDED` is the main
/// path; cancellation and rescheduling branch off the scheduled states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeetingStatus {
    Scheduled,
    InProgress,
    Concluded,
    Cancelled,
    Rescheduled,
    Unscheduled,
}

impl MeetingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingStatus::Scheduled => "SCHEDULED",
            MeetingStatus::InProgress => "IN_PROGRESS",
            MeetingStatus::Concluded => "CONCLUDED",
            MeetingStatus::Cancelled => "CANCELLED",
            MeetingStatus::Rescheduled => "RESCHEDULED",
            MeetingStatus::Unscheduled => "UNSCHEDULED",
        }
    }

    pub fn parse(s: &str) -> Option<MeetingStatus> {
        match s {
            "SCHEDULED" => Some(MeetingStatus::Scheduled),
            "IN_PROGRESS" => Some(MeetingStatus::InProgress),
            "CONCLUDED" => Some(MeetingStatus::Concluded),
            "CANCELLED" => Some(MeetingStatus::Cancelled),
            "RESCHEDULED" => Some(MeetingStatus::Rescheduled),
            "UNSCHEDULED" => Some(MeetingStatus::Unscheduled),
            _ => None,
        }
    }

    /// Legal lifecycle moves. CONCLUDED is terminal.
    pub fn can_transition_to(&self, next: MeetingStatus) -> bool {
        use MeetingStatus::*;
        matches!(
            (self, next),
            (Scheduled, InProgress | Cancelled | Rescheduled | Unscheduled)
                | (Rescheduled, Scheduled | InProgress | Cancelled | Unscheduled)
                | (InProgress, Concluded | Cancelled)
                | (Cancelled, Rescheduled)
                | (Unscheduled, Scheduled)
        )
    }

}

/// One check-in row embedded in a meeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub user_id: String,
    pub check_in_time: String,
    pub verification_method: String,
    pub status: String,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// A Gram Sabha meeting. `agenda` is the snapshot actually presented at
/// this meeting, distinct from the panchayat-wide outstanding agenda.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GramSabha {
    pub id: i64,
    pub panchayat_id: i64,
    pub title: String,
    pub date_time: String,
    pub location: String,
    pub scheduled_duration_hours: f64,
    pub status: MeetingStatus,
    pub agenda: Vec<AgendaItem>,
    pub attendances: Vec<Attendance>,
    pub meeting_link: Option<String>,
    /// Opaque metadata from the external video-conferencing provider.
    pub conference_data: Option<serde_json::Value>,
    pub minutes: Option<String>,
    pub transcript: Option<String>,
    pub conclusion: Option<String>,
    pub actual_duration_minutes: Option<i64>,
    pub scheduled_by: String,
    pub created_at: String,
    pub updated_at: String,
}

pub struct NewGramSabha {
    pub title: String,
    pub date_time: String,
    pub location: String,
    pub scheduled_duration_hours: f64,
    pub agenda: Vec<AgendaItem>,
    pub meeting_link: Option<String>,
    pub conference_data: Option<serde_json::Value>,
    pub scheduled_by: String,
}
