//! Fills missing language keys on agenda item titles/descriptions, for
//! both the panchayat-wide aggregates and open meetings' snapshots.

use std::collections::HashMap;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::agenda_item::{AgendaItem, LangMap};
use crate::models::{gram_sabha, issue_summary, panchayat};
use crate::summarizer::SummarizerClient;

/// Languages every agenda item should carry: English, Hindi, and the
/// panchayat's own language.
fn target_langs(panchayat_language: Option<&String>) -> Vec<String> {
    let mut langs = vec!["en".to_string(), "hi".to_string()];
    if let Some(lang) = panchayat_language {
        if !langs.contains(lang) {
            langs.push(lang.clone());
        }
    }
    langs
}

pub async fn fill_missing_translations(pool: &DbPool, client: &SummarizerClient) {
    let (summaries, meetings, languages) = {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(e) => {
                log::error!("Translation job: failed to get DB connection: {e}");
                return;
            }
        };
        let loaded = issue_summary::find_all(&conn).and_then(|summaries| {
            let meetings = gram_sabha::find_open_with_agenda(&conn)?;
            let languages: HashMap<i64, String> = panchayat::find_all(&conn)?
                .into_iter()
                .map(|p| (p.id, p.language.to_lowercase()))
                .collect();
            Ok((summaries, meetings, languages))
        });
        match loaded {
            Ok(l) => l,
            Err(e) => {
                log::error!("Translation job: failed to load agendas: {e}");
                return;
            }
        }
    };

    for summary in summaries {
        let langs = target_langs(languages.get(&summary.panchayat_id));
        let mut items = summary.agenda_items;
        match fill_items(client, &mut items, &langs).await {
            Ok(true) => {
                let result = pool.get().map_err(AppError::from).and_then(|conn| {
                    issue_summary::upsert(&conn, summary.panchayat_id, &items, &summary.issues)
                });
                if let Err(e) = result {
                    log::error!(
                        "Translation job: failed to save summary for panchayat {}: {e}",
                        summary.panchayat_id
                    );
                }
            }
            Ok(false) => {}
            Err(e) => {
                log::error!(
                    "Translation job: panchayat {} summary failed: {e}",
                    summary.panchayat_id
                );
            }
        }
    }

    for meeting in meetings {
        let langs = target_langs(languages.get(&meeting.panchayat_id));
        let mut items = meeting.agenda;
        match fill_items(client, &mut items, &langs).await {
            Ok(true) => {
                let result = pool.get().map_err(AppError::from).and_then(|conn| {
                    gram_sabha::update_agenda(&conn, meeting.id, &items)
                });
                if let Err(e) = result {
                    log::error!(
                        "Translation job: failed to save agenda for meeting {}: {e}",
                        meeting.id
                    );
                }
            }
            Ok(false) => {}
            Err(e) => {
                log::error!("Translation job: meeting {} agenda failed: {e}", meeting.id);
            }
        }
    }
}

async fn fill_items(
    client: &SummarizerClient,
    items: &mut [AgendaItem],
    langs: &[String],
) -> Result<bool, AppError> {
    let mut changed = false;
    for item in items.iter_mut() {
        changed |= fill_map(client, &mut item.title, langs).await?;
        changed |= fill_map(client, &mut item.description, langs).await?;
    }
    Ok(changed)
}

/// Translate the best available source text into every missing language.
/// No source text means the whole map is left alone.
async fn fill_map(
    client: &SummarizerClient,
    map: &mut LangMap,
    langs: &[String],
) -> Result<bool, AppError> {
    let source = map
        .get("en")
        .filter(|v| !v.trim().is_empty())
        .cloned()
        .or_else(|| map.values().find(|v| !v.trim().is_empty()).cloned());
    let Some(source) = source else {
        return Ok(false);
    };

    let mut changed = false;
    for lang in langs {
        if map.get(lang).is_some_and(|v| !v.trim().is_empty()) {
            continue;
        }
        let translated = client.translate_text(&source, lang).await?;
        if !translated.trim().is_empty() {
            map.insert(lang.clone(), translated);
            changed = true;
        }
    }
    Ok(changed)
}
