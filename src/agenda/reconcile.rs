//! Keeps three views consistent: the panchayat-wide outstanding agenda,
//! each meeting's agenda snapshot, and the issues' summarized/status
//! flags.

use std::collections::HashSet;

use rusqlite::Connection;

use crate::errors::AppError;
use crate::models::agenda_item::{AgendaItem, Author, new_item_id};
use crate::models::issue::IssueStatus;
use crate::models::{issue, issue_summary};

/// Deduplicated union of linked issue ids across items, first occurrence
/// deciding order.
pub fn linked_issue_union(items: &[AgendaItem]) -> Vec<i64> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        for &id in &item.linked_issues {
            if seen.insert(id) {
                out.push(id);
            }
        }
    }
    out
}

/// Enforce that an issue id is claimed by at most one agenda item.
/// USER items are scanned from the end (the most recently submitted item
/// wins a contested issue) and take precedence over SYSTEM items.
pub fn dedup_linked_issues(users: &mut [AgendaItem], systems: &mut [AgendaItem]) {
    let mut seen = HashSet::new();
    for item in users.iter_mut().rev() {
        item.linked_issues.retain(|id| seen.insert(*id));
    }
    for item in systems.iter_mut().rev() {
        item.linked_issues.retain(|id| seen.insert(*id));
    }
}

/// Operation outcome of [`replace_outstanding_agenda`].
#[derive(Debug)]
pub enum ReplaceOutcome {
    /// The submitted list was empty: the aggregate was deleted outright.
    Deleted,
    /// The aggregate was replaced with the merged item list.
    Updated(Vec<AgendaItem>),
}

/// Reconcile a meeting's agenda selection against the panchayat-wide
/// outstanding agenda.
///
/// `selected` is the meeting's new full agenda, `previous` the snapshot
/// it replaces (empty on meeting creation). Items deselected this edit
/// return to the pool, items newly selected are claimed out of it; the
/// pool's flattened issue set is recomputed, claimed issues move to
/// PICKED_IN_AGENDA and returned issues back to REPORTED.
///
/// No-op when the panchayat has no outstanding agenda.
pub fn apply_meeting_selection(
    conn: &mut Connection,
    panchayat_id: i64,
    selected: &[AgendaItem],
    previous: &[AgendaItem],
) -> Result<(), AppError> {
    let Some(summary) = issue_summary::find_by_panchayat(conn, panchayat_id)? else {
        return Ok(());
    };

    let selected_ids: HashSet<&str> = selected.iter().map(|i| i.id.as_str()).collect();
    let previous_ids: HashSet<&str> = previous.iter().map(|i| i.id.as_str()).collect();

    let returned: Vec<AgendaItem> = previous
        .iter()
        .filter(|i| !selected_ids.contains(i.id.as_str()))
        .cloned()
        .collect();
    let claimed: Vec<AgendaItem> = selected
        .iter()
        .filter(|i| !previous_ids.contains(i.id.as_str()))
        .cloned()
        .collect();
    let claimed_ids: HashSet<&str> = claimed.iter().map(|i| i.id.as_str()).collect();

    let mut items: Vec<AgendaItem> = summary
        .agenda_items
        .into_iter()
        .filter(|i| !claimed_ids.contains(i.id.as_str()))
        .collect();
    items.extend(returned.iter().cloned());

    let issues = linked_issue_union(&items);
    let claimed_issue_ids = linked_issue_union(&claimed);
    let returned_issue_ids = linked_issue_union(&returned);

    let tx = conn.transaction()?;
    issue_summary::upsert(&tx, panchayat_id, &items, &issues)?;
    issue::set_status(&tx, &claimed_issue_ids, IssueStatus::PickedInAgenda)?;
    issue::set_status(&tx, &returned_issue_ids, IssueStatus::Reported)?;
    tx.commit()?;

    Ok(())
}

/// Replace the panchayat-wide outstanding agenda with a client-submitted
/// item list, independent of any meeting.
///
/// An empty submission deletes the aggregate outright and clears the
/// summarized flag of every issue it linked. This is a documented
/// destructive reset, not a partial update.
pub fn replace_outstanding_agenda(
    conn: &mut Connection,
    panchayat_id: i64,
    submitted: Vec<AgendaItem>,
    acting_user_id: &str,
) -> Result<ReplaceOutcome, AppError> {
    if submitted.is_empty() {
        let tx = conn.transaction()?;
        if let Some(deleted) = issue_summary::delete_by_panchayat(&tx, panchayat_id)? {
            issue::set_summarized(&tx, &deleted.issues, false)?;
        }
        tx.commit()?;
        return Ok(ReplaceOutcome::Deleted);
    }

    let previously_linked = issue_summary::find_by_panchayat(conn, panchayat_id)?
        .map(|s| s.issues)
        .unwrap_or_default();

    let (mut users, mut systems): (Vec<AgendaItem>, Vec<AgendaItem>) =
        submitted.into_iter().partition(|i| i.is_user());

    for item in users.iter_mut() {
        if item.id.is_empty() {
            item.id = new_item_id();
        }
        if let Author::User { user_id } = &mut item.author {
            if user_id.is_empty() {
                *user_id = acting_user_id.to_string();
            }
        }
    }
    for item in systems.iter_mut() {
        if item.id.is_empty() {
            item.id = new_item_id();
        }
    }

    dedup_linked_issues(&mut users, &mut systems);

    // USER items always sort first.
    let mut merged = users;
    merged.append(&mut systems);

    let unique_ids = linked_issue_union(&merged);
    let unique_set: HashSet<i64> = unique_ids.iter().copied().collect();
    let unlinked: Vec<i64> = previously_linked
        .into_iter()
        .filter(|id| !unique_set.contains(id))
        .collect();

    let tx = conn.transaction()?;
    issue_summary::upsert(&tx, panchayat_id, &merged, &unique_ids)?;
    issue::set_summarized(&tx, &unlinked, false)?;
    issue::set_summarized(&tx, &unique_ids, true)?;
    tx.commit()?;

    Ok(ReplaceOutcome::Updated(merged))
}
