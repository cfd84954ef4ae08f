use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Language-code keyed text. A missing key means "no translation yet",
/// never an error.
pub type LangMap = HashMap<String, String>;

/// One discussion topic, either in the panchayat-wide outstanding agenda
/// or in a specific meeting's agenda snapshot. Identity is the `id`
/// string, generated once at creation and preserved across merges so
/// clients can diff item lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: LangMap,
    #[serde(default)]
    pub description: LangMap,
    #[serde(default)]
    pub linked_issues: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration_minutes: Option<i64>,
    #[serde(flatten)]
    pub author: Author,
}

/// Who authored an agenda item. Only user-authored items carry a user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "createdByType")]
pub enum Author {
    #[serde(rename = "USER")]
    User {
        #[serde(rename = "createdByUserId", default)]
        user_id: String,
    },
    #[serde(rename = "SYSTEM")]
    System,
}

/// Random 24-hex-char identifier for embedded documents.
pub fn new_item_id() -> String {
    let bytes: [u8; 12] = rand::rng().random();
    hex::encode(bytes)
}

impl AgendaItem {
    pub fn is_user(&self) -> bool {
        matches!(self.author, Author::User { .. })
    }

    pub fn is_system(&self) -> bool {
        matches!(self.author, Author::System)
    }

    pub fn created_by_user_id(&self) -> Option<&str> {
        match &self.author {
            Author::User { user_id } => Some(user_id),
            Author::System => None,
        }
    }

    /// Text for a language, or "" when not yet translated.
    pub fn title_in(&self, lang: &str) -> &str {
        self.title.get(lang).map(String::as_str).unwrap_or("")
    }

    pub fn description_in(&self, lang: &str) -> &str {
        self.description.get(lang).map(String::as_str).unwrap_or("")
    }
}
