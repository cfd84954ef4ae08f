use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::agenda_item::AgendaItem;
use crate::models::issue::Issue;

/// One issue as submitted to the agenda-generation endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryIssue {
    pub id: String,
    pub transcription_text: String,
    pub category: String,
    pub subcategory: String,
}

impl SummaryIssue {
    pub fn from_issue(issue: &Issue) -> SummaryIssue {
        SummaryIssue {
            id: issue.id.to_string(),
            transcription_text: issue.transcription_text().to_string(),
            category: issue.category.as_str().to_string(),
            subcategory: issue.subcategory.as_str().to_string(),
        }
    }
}

/// English projection of a SYSTEM agenda item, sent as context with
/// UPDATE requests.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentAgendaItem {
    pub title: String,
    pub description: String,
    pub linked_issues: Vec<String>,
}

impl CurrentAgendaItem {
    pub fn from_item(item: &AgendaItem) -> CurrentAgendaItem {
        CurrentAgendaItem {
            title: item.title_in("en").to_string(),
            description: item.description_in("en").to_string(),
            linked_issues: item.linked_issues.iter().map(|id| id.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratePayload {
    pub issues: Vec<SummaryIssue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdatePayload {
    pub current_agenda: Vec<CurrentAgendaItem>,
    pub new_issues: Vec<SummaryIssue>,
}

/// Accepted-job handle returned by both agenda endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct InitiateResponse {
    pub request_id: String,
    pub status_url: String,
    pub result_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
}

/// Raw result payload. Per-language agendas arrive as sibling fields
/// named `english_agenda`, `hindi_agenda`, `<lang>_agenda`, each either a
/// JSON array or a JSON-encoded string of one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryResultPayload {
    #[serde(default)]
    pub llm_status: String,
    #[serde(default)]
    pub primary_language: Option<String>,
    #[serde(flatten)]
    pub agendas: HashMap<String, Value>,
}

impl SummaryResultPayload {
    /// Lowercased primary language of the run, defaulting to English.
    pub fn primary_lang(&self) -> String {
        self.primary_language
            .as_deref()
            .filter(|l| !l.is_empty())
            .unwrap_or("en")
            .to_lowercase()
    }

    /// The agenda list for a language name key ("english", "hindi",
    /// or the primary language). Malformed payloads parse to empty.
    pub fn agenda_for(&self, key: &str) -> Vec<RawAgendaItem> {
        safe_parse_agenda(self.agendas.get(&format!("{key}_agenda")))
    }
}

/// One agenda entry as produced by the LLM pipeline. `title` and
/// `description` are either plain strings or `{lang: text}` objects;
/// issue references arrive as an `issue_ids` map (id -> short label) or a
/// plain `linked_issues` id list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAgendaItem {
    #[serde(default)]
    pub title: Value,
    #[serde(default)]
    pub description: Value,
    #[serde(default)]
    pub issue_ids: Option<Value>,
    #[serde(default)]
    pub linked_issues: Option<Vec<String>>,
}

impl RawAgendaItem {
    pub fn title_text(&self) -> String {
        text_of(&self.title)
    }

    pub fn description_text(&self) -> String {
        text_of(&self.description)
    }

    /// id -> short label pairs when the payload carries an issue_ids map.
    /// Ids that do not parse as issue ids are dropped.
    pub fn issue_id_labels(&self) -> Option<Vec<(i64, String)>> {
        let map = self.issue_ids.as_ref()?.as_object()?;
        Some(
            map.iter()
                .filter_map(|(id, label)| {
                    let id = id.parse::<i64>().ok()?;
                    Some((id, label.as_str().unwrap_or("").to_string()))
                })
                .collect(),
        )
    }

    /// Linked issue ids from whichever field the payload used.
    pub fn linked_issue_ids(&self) -> Vec<i64> {
        if let Some(labels) = self.issue_id_labels() {
            return labels.into_iter().map(|(id, _)| id).collect();
        }
        self.linked_issues
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter_map(|id| id.parse::<i64>().ok())
            .collect()
    }
}

/// Agenda fields come back as arrays or JSON-encoded strings depending on
/// the pipeline version; anything else parses to an empty list.
fn safe_parse_agenda(value: Option<&Value>) -> Vec<RawAgendaItem> {
    match value {
        Some(Value::String(s)) => serde_json::from_str(s).unwrap_or_default(),
        Some(v @ Value::Array(_)) => serde_json::from_value(v.clone()).unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// A translation field is either a plain string or `{ "en": text }`.
pub fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .get("en")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
        _ => String::new(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TranslateRequest<'a> {
    pub text: &'a str,
    pub target_language: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslateResponse {
    #[serde(default)]
    pub result_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslationResult {
    #[serde(default)]
    pub translated_text: Option<String>,
}
