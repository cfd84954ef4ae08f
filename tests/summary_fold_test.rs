//! Integration tests for folding completed summarizer results into the
//! panchayat-wide outstanding agenda.

mod common;

use common::{create_completed_issue, create_test_panchayat, setup_test_db, user_item};
use gramvani::agenda::{fold_summary_result, replace_outstanding_agenda};
use gramvani::models::{issue, issue_summary};
use gramvani::summarizer::SummaryResultPayload;
use serde_json::{Value, json};

fn payload(english_agenda: Value, hindi_agenda: Value) -> SummaryResultPayload {
    serde_json::from_value(json!({
        "llm_status": "success",
        "primary_language": "hi",
        "english_agenda": english_agenda,
        "hindi_agenda": hindi_agenda,
    }))
    .unwrap()
}

fn labelled_item(title: &str, description: &str, labels: &[(i64, &str)]) -> Value {
    let mut ids = serde_json::Map::new();
    for (id, label) in labels {
        ids.insert(id.to_string(), json!(label));
    }
    json!({ "title": title, "description": description, "issue_ids": Value::Object(ids) })
}

#[test]
fn fold_builds_system_items_and_marks_issues_summarized() {
    let (_dir, mut conn) = setup_test_db();
    let pid = create_test_panchayat(&conn, "rampur");
    let i1 = create_completed_issue(&conn, pid, "no water");
    let i2 = create_completed_issue(&conn, pid, "dirty water");

    let result = payload(
        json!([labelled_item(
            "Water problems",
            "Several handpumps are broken",
            &[(i1, "No water"), (i2, "Dirty water")]
        )]),
        json!([labelled_item("पानी की समस्या", "हैंडपंप खराब", &[(i1, "पानी नहीं")])]),
    );

    let linked = fold_summary_result(&mut conn, pid, &result).unwrap();
    assert_eq!(linked.len(), 2);

    let summary = issue_summary::find_by_panchayat(&conn, pid).unwrap().unwrap();
    assert_eq!(summary.agenda_items.len(), 1);
    let item = &summary.agenda_items[0];
    assert!(item.is_system());
    assert_eq!(item.id.len(), 24);
    assert_eq!(item.title_in("en"), "Water problems");
    assert_eq!(item.title_in("hi"), "पानी की समस्या");
    assert_eq!(item.estimated_duration_minutes, Some(15));
    assert_eq!(summary.issues, linked);

    let first = issue::find_by_id(&conn, i1).unwrap().unwrap();
    assert!(first.is_summarized);
    assert_eq!(
        first.transcription.description.get("en").map(String::as_str),
        Some("No water")
    );
    assert_eq!(
        first.transcription.description.get("hi").map(String::as_str),
        Some("पानी नहीं")
    );
}

#[test]
fn json_encoded_agenda_strings_are_parsed() {
    let (_dir, mut conn) = setup_test_db();
    let pid = create_test_panchayat(&conn, "rampur");
    let i1 = create_completed_issue(&conn, pid, "no water");

    let english = json!([labelled_item("Water", "Broken handpumps", &[(i1, "No water")])]);
    let result = payload(Value::String(english.to_string()), json!([]));

    let linked = fold_summary_result(&mut conn, pid, &result).unwrap();
    assert_eq!(linked, vec![i1]);

    let summary = issue_summary::find_by_panchayat(&conn, pid).unwrap().unwrap();
    assert_eq!(summary.agenda_items.len(), 1);
    assert_eq!(summary.agenda_items[0].title_in("en"), "Water");
}

#[test]
fn generated_item_matching_a_user_title_is_dropped() {
    let (_dir, mut conn) = setup_test_db();
    let pid = create_test_panchayat(&conn, "rampur");
    let i1 = create_completed_issue(&conn, pid, "no water");
    let i2 = create_completed_issue(&conn, pid, "dark streets");

    replace_outstanding_agenda(
        &mut conn,
        pid,
        vec![user_item("u1", "Water supply", &[i1], "official1")],
        "official1",
    )
    .unwrap();

    let result = payload(
        json!([labelled_item("Water supply", "Generated duplicate", &[(i2, "x")])]),
        json!([]),
    );
    fold_summary_result(&mut conn, pid, &result).unwrap();

    let summary = issue_summary::find_by_panchayat(&conn, pid).unwrap().unwrap();
    assert_eq!(summary.agenda_items.len(), 1);
    assert!(summary.agenda_items[0].is_user());
    assert_eq!(summary.issues, vec![i1]);
    // The dropped item's issue never entered the aggregate.
    assert!(!issue::find_by_id(&conn, i2).unwrap().unwrap().is_summarized);
}

#[test]
fn user_items_survive_a_fold_and_sort_first() {
    let (_dir, mut conn) = setup_test_db();
    let pid = create_test_panchayat(&conn, "rampur");
    let i1 = create_completed_issue(&conn, pid, "no water");
    let i2 = create_completed_issue(&conn, pid, "dark streets");

    replace_outstanding_agenda(
        &mut conn,
        pid,
        vec![user_item("u1", "Roads", &[i1], "official1")],
        "official1",
    )
    .unwrap();

    let result = payload(
        json!([labelled_item("Street lighting", "No lights", &[(i2, "Dark")])]),
        json!([]),
    );
    fold_summary_result(&mut conn, pid, &result).unwrap();

    let summary = issue_summary::find_by_panchayat(&conn, pid).unwrap().unwrap();
    assert_eq!(summary.agenda_items.len(), 2);
    assert!(summary.agenda_items[0].is_user());
    assert!(summary.agenda_items[1].is_system());
    assert_eq!(summary.issues.len(), 2);
}

#[test]
fn linked_issues_list_falls_back_to_description_labels() {
    let (_dir, mut conn) = setup_test_db();
    let pid = create_test_panchayat(&conn, "rampur");
    let i1 = create_completed_issue(&conn, pid, "no water");

    // linked_issues id list instead of an issue_ids map; junk ids are
    // dropped.
    let english = json!([{
        "title": "Water",
        "description": "Broken handpumps everywhere",
        "linked_issues": [i1.to_string(), "not-an-id"]
    }]);
    let result = payload(english, json!([]));

    let linked = fold_summary_result(&mut conn, pid, &result).unwrap();
    assert_eq!(linked, vec![i1]);

    let first = issue::find_by_id(&conn, i1).unwrap().unwrap();
    assert_eq!(
        first.transcription.description.get("en").map(String::as_str),
        Some("Broken handpumps everywhere")
    );
}

#[test]
fn malformed_agenda_payload_folds_to_nothing() {
    let (_dir, mut conn) = setup_test_db();
    let pid = create_test_panchayat(&conn, "rampur");

    let result = payload(Value::String("not valid json".to_string()), json!(42));
    let linked = fold_summary_result(&mut conn, pid, &result).unwrap();
    assert!(linked.is_empty());

    let summary = issue_summary::find_by_panchayat(&conn, pid).unwrap().unwrap();
    assert!(summary.agenda_items.is_empty());
}
