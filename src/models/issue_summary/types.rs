use serde::Serialize;

use crate::models::agenda_item::AgendaItem;

/// The panchayat-wide outstanding agenda: every item not yet claimed by a
/// specific meeting, plus the flattened set of issue ids those items
/// link. `issues` is always the deduplicated union of the items'
/// `linked_issues`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueSummary {
    pub id: i64,
    pub panchayat_id: i64,
    pub agenda_items: Vec<AgendaItem>,
    pub issues: Vec<i64>,
    pub created_at: String,
    pub updated_at: String,
}
