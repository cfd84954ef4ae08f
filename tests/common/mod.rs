//! Shared test infrastructure for model and engine tests.
//!
//! Every test runs against its own temporary SQLite database with the
//! full schema applied.

#![allow(dead_code)]

use rusqlite::Connection;
use tempfile::TempDir;

use gramvani::db::MIGRATIONS;
use gramvani::models::agenda_item::{AgendaItem, Author, LangMap};
use gramvani::models::issue::{
    self, Category, NewIssue, Subcategory, Transcription, TranscriptionStatus,
};
use gramvani::models::panchayat::{self, NewPanchayat};

/// Setup a test database with the schema applied.
///
/// Returns a tuple of (TempDir, Connection) where TempDir must be kept
/// alive for the Connection to remain valid.
pub fn setup_test_db() -> (TempDir, Connection) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("test.db");
    let conn = Connection::open(&db_path).expect("Failed to open test DB");

    conn.execute_batch("PRAGMA foreign_keys=ON; PRAGMA journal_mode=WAL;")
        .expect("Failed to set pragmas");

    conn.execute_batch(MIGRATIONS)
        .expect("Failed to run migrations");

    (dir, conn)
}

/// Create a panchayat with Hindi as its primary language.
pub fn create_test_panchayat(conn: &Connection, name: &str) -> i64 {
    panchayat::create(
        conn,
        &NewPanchayat {
            name: name.to_string(),
            label: name.to_string(),
            language: "hi".to_string(),
        },
    )
    .expect("create panchayat")
}

/// Create an issue whose transcription has completed, making it eligible
/// for summarization.
pub fn create_completed_issue(conn: &Connection, panchayat_id: i64, text: &str) -> i64 {
    issue::create(
        conn,
        panchayat_id,
        &NewIssue {
            text: text.to_string(),
            category: Category::Infrastructure,
            subcategory: Subcategory::Water,
            priority: None,
            creator_id: "citizen1".to_string(),
            created_for_id: "citizen1".to_string(),
            to_be_resolved_before: None,
            remark: None,
            transcription: Transcription {
                status: Some(TranscriptionStatus::Completed),
                text: Some(text.to_string()),
                ..Transcription::default()
            },
        },
    )
    .expect("create issue")
}

fn lang_map(en: &str) -> LangMap {
    let mut map = LangMap::new();
    if !en.is_empty() {
        map.insert("en".to_string(), en.to_string());
    }
    map
}

/// A user-authored agenda item.
pub fn user_item(id: &str, title_en: &str, linked: &[i64], user_id: &str) -> AgendaItem {
    AgendaItem {
        id: id.to_string(),
        title: lang_map(title_en),
        description: lang_map(&format!("About: {title_en}")),
        linked_issues: linked.to_vec(),
        estimated_duration_minutes: None,
        author: Author::User {
            user_id: user_id.to_string(),
        },
    }
}

/// A system-generated agenda item.
pub fn system_item(id: &str, title_en: &str, linked: &[i64]) -> AgendaItem {
    AgendaItem {
        id: id.to_string(),
        title: lang_map(title_en),
        description: lang_map(&format!("Summary: {title_en}")),
        linked_issues: linked.to_vec(),
        estimated_duration_minutes: Some(15),
        author: Author::System,
    }
}
