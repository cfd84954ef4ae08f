//! Folds a completed external summary into the panchayat's outstanding
//! agenda.

use std::collections::HashMap;

use rusqlite::Connection;

use super::reconcile::{dedup_linked_issues, linked_issue_union};
use crate::errors::AppError;
use crate::models::agenda_item::{AgendaItem, Author, LangMap, new_item_id};
use crate::models::{issue, issue_summary};
use crate::summarizer::types::{RawAgendaItem, SummaryResultPayload};

const DEFAULT_ESTIMATED_DURATION_MINUTES: i64 = 15;

/// Merge a completed summarizer result into the aggregate.
///
/// Builds SYSTEM agenda items from the per-language agendas (aligned by
/// index), drops those whose English title string-equals an existing
/// USER item's title (an approximate dedup heuristic, kept as-is),
/// merges USER items first, recomputes the flattened issue set, writes
/// per-issue short labels into the issues' transcription descriptions
/// and marks every linked issue summarized.
///
/// Returns the ids of all issues linked by the resulting agenda.
pub fn fold_summary_result(
    conn: &mut Connection,
    panchayat_id: i64,
    result: &SummaryResultPayload,
) -> Result<Vec<i64>, AppError> {
    let lang = result.primary_lang();
    let english = result.agenda_for("english");
    let hindi = result.agenda_for("hindi");
    let local = if lang != "en" && lang != "hi" {
        result.agenda_for(&lang)
    } else {
        Vec::new()
    };

    let mut labels: HashMap<i64, LangMap> = HashMap::new();
    collect_issue_labels(&english, "en", &mut labels);
    collect_issue_labels(&hindi, "hi", &mut labels);
    collect_issue_labels(&local, &lang, &mut labels);

    let mut system_items: Vec<AgendaItem> = english
        .iter()
        .enumerate()
        .map(|(i, en_item)| {
            let mut title = LangMap::new();
            let mut description = LangMap::new();
            insert_lang(&mut title, "en", en_item.title_text());
            insert_lang(&mut description, "en", en_item.description_text());
            if let Some(hi_item) = hindi.get(i) {
                insert_lang(&mut title, "hi", hi_item.title_text());
                insert_lang(&mut description, "hi", hi_item.description_text());
            }
            if let Some(lo_item) = local.get(i) {
                insert_lang(&mut title, &lang, lo_item.title_text());
                insert_lang(&mut description, &lang, lo_item.description_text());
            }
            AgendaItem {
                id: new_item_id(),
                title,
                description,
                linked_issues: en_item.linked_issue_ids(),
                estimated_duration_minutes: Some(DEFAULT_ESTIMATED_DURATION_MINUTES),
                author: Author::System,
            }
        })
        .collect();

    let mut user_items: Vec<AgendaItem> = issue_summary::find_by_panchayat(conn, panchayat_id)?
        .map(|s| {
            s.agenda_items
                .into_iter()
                .filter(|i| i.is_user())
                .collect()
        })
        .unwrap_or_default();

    // A generated item whose English title matches a user-authored one is
    // treated as a duplicate of it and dropped.
    system_items.retain(|sys| {
        let sys_title = sys.title_in("en").trim();
        sys_title.is_empty()
            || !user_items
                .iter()
                .any(|user| user.title_in("en").trim() == sys_title)
    });

    dedup_linked_issues(&mut user_items, &mut system_items);

    let mut merged = user_items;
    merged.append(&mut system_items);
    let unique_ids = linked_issue_union(&merged);

    let tx = conn.transaction()?;
    for (issue_id, langs) in &labels {
        issue::merge_description_langs(&tx, *issue_id, langs)?;
    }
    issue_summary::upsert(&tx, panchayat_id, &merged, &unique_ids)?;
    issue::set_summarized(&tx, &unique_ids, true)?;
    tx.commit()?;

    Ok(unique_ids)
}

fn insert_lang(map: &mut LangMap, lang: &str, text: String) {
    if !text.is_empty() {
        map.insert(lang.to_string(), text);
    }
}

/// Per-issue short labels for one language. Payloads either carry an
/// `issue_ids` id->label map, or a plain id list (the item description
/// serves as the label then).
fn collect_issue_labels(agenda: &[RawAgendaItem], lang: &str, out: &mut HashMap<i64, LangMap>) {
    for item in agenda {
        if let Some(pairs) = item.issue_id_labels() {
            for (id, label) in pairs {
                out.entry(id).or_default().insert(lang.to_string(), label);
            }
        } else {
            let description = item.description_text();
            for id in item.linked_issue_ids() {
                out.entry(id)
                    .or_default()
                    .insert(lang.to_string(), description.clone());
            }
        }
    }
}
