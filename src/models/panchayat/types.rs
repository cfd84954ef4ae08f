use serde::{Deserialize, Serialize};

/// A village-level administrative unit. Every other record in the system
/// is scoped to one panchayat.
#[derive(Debug, Clone, Serialize)]
pub struct Panchayat {
    pub id: i64,
    pub name: String,
    pub label: String,
    /// Primary language code used when talking to the summarizer.
    pub language: String,
    pub created_at: String,
}

/// Form input for creating a panchayat.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPanchayat {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en".to_string()
}
