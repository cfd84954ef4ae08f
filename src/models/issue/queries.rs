use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};

use super::types::*;
use crate::errors::AppError;
use crate::models::agenda_item::LangMap;

const ISSUE_COLUMNS: &str = "id, panchayat_id, gram_sabha_id, text, category, subcategory, \
     priority, status, creator_id, created_for_id, to_be_resolved_before, remark, \
     transcription, is_summarized, created_at, updated_at";

fn row_to_issue(row: &rusqlite::Row) -> rusqlite::Result<Issue> {
    let category: String = row.get("category")?;
    let subcategory: String = row.get("subcategory")?;
    let priority: String = row.get("priority")?;
    let status: String = row.get("status")?;
    let transcription: String = row.get("transcription")?;

    Ok(Issue {
        id: row.get("id")?,
        panchayat_id: row.get("panchayat_id")?,
        gram_sabha_id: row.get("gram_sabha_id")?,
        text: row.get("text")?,
        category: Category::parse(&category).unwrap_or(Category::Other),
        subcategory: Subcategory::parse(&subcategory).unwrap_or(Subcategory::Other),
        priority: Priority::parse(&priority).unwrap_or(Priority::Normal),
        status: IssueStatus::parse(&status).unwrap_or(IssueStatus::Reported),
        creator_id: row.get("creator_id")?,
        created_for_id: row.get("created_for_id")?,
        to_be_resolved_before: row.get("to_be_resolved_before")?,
        remark: row.get("remark")?,
        transcription: serde_json::from_str(&transcription).unwrap_or_default(),
        is_summarized: row.get::<_, i64>("is_summarized")? != 0,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Create a new issue, returning its id.
pub fn create(conn: &Connection, panchayat_id: i64, new: &NewIssue) -> Result<i64, AppError> {
    let transcription = serde_json::to_string(&new.transcription)?;
    conn.execute(
        "INSERT INTO issues (panchayat_id, text, category, subcategory, priority, \
                             creator_id, created_for_id, to_be_resolved_before, remark, transcription) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            panchayat_id,
            new.text,
            new.category.as_str(),
            new.subcategory.as_str(),
            new.priority.unwrap_or(Priority::Normal).as_str(),
            new.creator_id,
            new.created_for_id,
            new.to_be_resolved_before,
            new.remark,
            transcription,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Issue>, AppError> {
    let row = conn
        .query_row(
            &format!("SELECT {ISSUE_COLUMNS} FROM issues WHERE id = ?1"),
            params![id],
            row_to_issue,
        )
        .optional()?;
    Ok(row)
}

/// List a panchayat's issues, optionally filtered by status and/or flag.
pub fn find_for_panchayat(
    conn: &Connection,
    panchayat_id: i64,
    status: Option<IssueStatus>,
    is_summarized: Option<bool>,
) -> Result<Vec<Issue>, AppError> {
    let mut sql = format!("SELECT {ISSUE_COLUMNS} FROM issues WHERE panchayat_id = ?1");
    let mut values: Vec<Value> = vec![Value::from(panchayat_id)];

    if let Some(status) = status {
        values.push(Value::from(status.as_str().to_string()));
        sql.push_str(&format!(" AND status = ?{}", values.len()));
    }
    if let Some(flag) = is_summarized {
        values.push(Value::from(flag as i64));
        sql.push_str(&format!(" AND is_summarized = ?{}", values.len()));
    }
    sql.push_str(" ORDER BY created_at DESC, id DESC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(values), row_to_issue)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Issues eligible for summarization: not yet absorbed into an agenda and
/// with a completed transcription.
pub fn find_unsummarized_completed(
    conn: &Connection,
    panchayat_id: i64,
) -> Result<Vec<Issue>, AppError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ISSUE_COLUMNS} FROM issues \
         WHERE panchayat_id = ?1 \
           AND is_summarized = 0 \
           AND json_extract(transcription, '$.status') = 'COMPLETED' \
         ORDER BY created_at ASC, id ASC"
    ))?;
    let rows = stmt
        .query_map(params![panchayat_id], row_to_issue)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn placeholders(from: usize, count: usize) -> String {
    (from..from + count)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Flip `is_summarized` for a batch of issues.
pub fn set_summarized(conn: &Connection, ids: &[i64], summarized: bool) -> Result<(), AppError> {
    if ids.is_empty() {
        return Ok(());
    }
    let sql = format!(
        "UPDATE issues SET is_summarized = ?1, \
                updated_at = strftime('%Y-%m-%dT%H:%M:%S','now') \
         WHERE id IN ({})",
        placeholders(2, ids.len())
    );
    let values = std::iter::once(Value::from(summarized as i64))
        .chain(ids.iter().map(|&id| Value::from(id)));
    conn.execute(&sql, params_from_iter(values))?;
    Ok(())
}

/// Move a batch of issues to a new lifecycle status.
pub fn set_status(conn: &Connection, ids: &[i64], status: IssueStatus) -> Result<(), AppError> {
    if ids.is_empty() {
        return Ok(());
    }
    let sql = format!(
        "UPDATE issues SET status = ?1, \
                updated_at = strftime('%Y-%m-%dT%H:%M:%S','now') \
         WHERE id IN ({})",
        placeholders(2, ids.len())
    );
    let values = std::iter::once(Value::from(status.as_str().to_string()))
        .chain(ids.iter().map(|&id| Value::from(id)));
    conn.execute(&sql, params_from_iter(values))?;
    Ok(())
}

/// Merge per-language short labels into an issue's transcription
/// description map. Existing keys are overwritten, other keys kept.
pub fn merge_description_langs(
    conn: &Connection,
    issue_id: i64,
    labels: &LangMap,
) -> Result<(), AppError> {
    if labels.is_empty() {
        return Ok(());
    }
    let raw: Option<String> = conn
        .query_row(
            "SELECT transcription FROM issues WHERE id = ?1",
            params![issue_id],
            |row| row.get(0),
        )
        .optional()?;
    let Some(raw) = raw else {
        return Ok(());
    };

    let mut transcription: Transcription = serde_json::from_str(&raw).unwrap_or_default();
    for (lang, label) in labels {
        transcription
            .description
            .insert(lang.clone(), label.clone());
    }

    conn.execute(
        "UPDATE issues SET transcription = ?1, \
                updated_at = strftime('%Y-%m-%dT%H:%M:%S','now') \
         WHERE id = ?2",
        params![serde_json::to_string(&transcription)?, issue_id],
    )?;
    Ok(())
}
