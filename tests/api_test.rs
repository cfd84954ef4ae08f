//! End-to-end tests of the JSON API surface: route wiring, validation
//! paths, and the agenda reconciliation flows as a client sees them.

mod common;

use actix_web::{App, test, web};
use gramvani::db::{self, DbPool};
use gramvani::handlers;
use serde_json::{Value, json};
use tempfile::TempDir;

fn setup_pool() -> (TempDir, DbPool) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("api.db");
    let pool = db::init_pool(path.to_str().unwrap());
    db::run_migrations(&pool);
    (dir, pool)
}

macro_rules! test_app {
    ($pool:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($pool.clone()))
                .configure(handlers::configure),
        )
        .await
    };
}

macro_rules! create_panchayat {
    ($app:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/panchayats")
            .set_json(json!({ "name": "rampur", "label": "Rampur", "language": "hi" }))
            .to_request();
        let body: Value = test::call_and_read_body_json($app, req).await;
        assert_eq!(body["success"], true);
        body["panchayat"]["id"].as_i64().unwrap()
    }};
}

macro_rules! create_issue {
    ($app:expr, $panchayat_id:expr) => {{
        let req = test::TestRequest::post()
            .uri(&format!("/api/panchayats/{}/issues", $panchayat_id))
            .set_json(json!({
                "text": "no water in ward 3",
                "category": "INFRASTRUCTURE",
                "subcategory": "WATER",
                "creatorId": "citizen1",
                "createdForId": "citizen1",
                "transcription": { "status": "COMPLETED", "text": "no water in ward 3" }
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json($app, req).await;
        assert_eq!(body["success"], true);
        body["issue"]["id"].as_i64().unwrap()
    }};
}

#[actix_web::test]
async fn summary_is_404_before_any_agenda_exists() {
    let (_dir, pool) = setup_pool();
    let app = test_app!(pool);
    let pid = create_panchayat!(&app);

    let req = test::TestRequest::get()
        .uri(&format!("/api/issue-summary/panchayat/{pid}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn patch_agenda_requires_the_acting_user_header() {
    let (_dir, pool) = setup_pool();
    let app = test_app!(pool);
    let pid = create_panchayat!(&app);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/issue-summary/panchayat/{pid}/agenda"))
        .set_json(json!({ "agendaItems": [] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn patch_agenda_rejects_a_non_array_payload() {
    let (_dir, pool) = setup_pool();
    let app = test_app!(pool);
    let pid = create_panchayat!(&app);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/issue-summary/panchayat/{pid}/agenda"))
        .insert_header(("X-User-Id", "official1"))
        .set_json(json!({ "agendaItems": "not an array" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    // Nothing was created by the rejected request.
    let req = test::TestRequest::get()
        .uri(&format!("/api/issue-summary/panchayat/{pid}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn agenda_patch_flow_links_issues_and_serves_the_summary() {
    let (_dir, pool) = setup_pool();
    let app = test_app!(pool);
    let pid = create_panchayat!(&app);
    let issue_id = create_issue!(&app, pid);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/issue-summary/panchayat/{pid}/agenda"))
        .insert_header(("X-User-Id", "official1"))
        .set_json(json!({ "agendaItems": [{
            "title": { "en": "Water supply" },
            "description": { "en": "Handpump repairs" },
            "linkedIssues": [issue_id],
            "createdByType": "USER"
        }]}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    let items = body["agendaItems"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    // The server generated an id and filled in the acting user.
    assert_eq!(items[0]["id"].as_str().unwrap().len(), 24);
    assert_eq!(items[0]["createdByUserId"], "official1");

    let req = test::TestRequest::get()
        .uri(&format!("/api/issue-summary/panchayat/{pid}"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["summary"]["issues"], json!([issue_id]));

    let req = test::TestRequest::get()
        .uri(&format!("/api/issues/{issue_id}"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["issue"]["isSummarized"], true);
}

#[actix_web::test]
async fn meeting_creation_claims_selected_items_from_the_pool() {
    let (_dir, pool) = setup_pool();
    let app = test_app!(pool);
    let pid = create_panchayat!(&app);
    let issue_id = create_issue!(&app, pid);

    // Seed the outstanding agenda.
    let req = test::TestRequest::patch()
        .uri(&format!("/api/issue-summary/panchayat/{pid}/agenda"))
        .insert_header(("X-User-Id", "official1"))
        .set_json(json!({ "agendaItems": [{
            "id": "item00000000000000000001",
            "title": { "en": "Water supply" },
            "description": { "en": "Handpump repairs" },
            "linkedIssues": [issue_id],
            "createdByType": "USER",
            "createdByUserId": "official1"
        }]}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);

    // Create a meeting selecting that item.
    let req = test::TestRequest::post()
        .uri("/api/gram-sabhas")
        .insert_header(("X-User-Id", "official1"))
        .set_json(json!({
            "panchayatId": pid,
            "title": "July assembly",
            "dateTime": "2025-07-01T10:00:00",
            "location": "Panchayat Bhavan",
            "selectedAgendaItems": [{
                "id": "item00000000000000000001",
                "title": { "en": "Water supply" },
                "description": { "en": "Handpump repairs" },
                "linkedIssues": [issue_id],
                "createdByType": "USER",
                "createdByUserId": "official1"
            }]
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    let meeting_id = body["gramSabha"]["id"].as_i64().unwrap();
    assert_eq!(body["gramSabha"]["agenda"].as_array().unwrap().len(), 1);

    // The pool is drained and the issue moved to PICKED_IN_AGENDA.
    let req = test::TestRequest::get()
        .uri(&format!("/api/issue-summary/panchayat/{pid}"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["summary"]["agendaItems"], json!([]));

    let req = test::TestRequest::get()
        .uri(&format!("/api/issues/{issue_id}"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["issue"]["status"], "PICKED_IN_AGENDA");

    // Empty the meeting's agenda; the item returns to the pool.
    let req = test::TestRequest::put()
        .uri(&format!("/api/gram-sabhas/{meeting_id}/agenda"))
        .set_json(json!({ "selectedAgendaItems": [] }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);

    let req = test::TestRequest::get()
        .uri(&format!("/api/issue-summary/panchayat/{pid}"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        body["summary"]["agendaItems"].as_array().unwrap().len(),
        1
    );

    let req = test::TestRequest::get()
        .uri(&format!("/api/issues/{issue_id}"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["issue"]["status"], "REPORTED");
}

#[actix_web::test]
async fn illegal_meeting_transitions_are_rejected() {
    let (_dir, pool) = setup_pool();
    let app = test_app!(pool);
    let pid = create_panchayat!(&app);

    let req = test::TestRequest::post()
        .uri("/api/gram-sabhas")
        .insert_header(("X-User-Id", "official1"))
        .set_json(json!({
            "panchayatId": pid,
            "title": "July assembly",
            "dateTime": "2025-07-01T10:00:00",
            "agenda": [{
                "title": { "en": "Water supply" },
                "description": {},
                "createdByType": "USER",
                "createdByUserId": "official1"
            }]
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let meeting_id = body["gramSabha"]["id"].as_i64().unwrap();

    // SCHEDULED cannot jump straight to CONCLUDED.
    let req = test::TestRequest::post()
        .uri(&format!("/api/gram-sabhas/{meeting_id}/status"))
        .set_json(json!({ "status": "CONCLUDED" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::post()
        .uri(&format!("/api/gram-sabhas/{meeting_id}/status"))
        .set_json(json!({ "status": "IN_PROGRESS" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["gramSabha"]["status"], "IN_PROGRESS");
}

#[actix_web::test]
async fn unknown_panchayats_404() {
    let (_dir, pool) = setup_pool();
    let app = test_app!(pool);

    let req = test::TestRequest::get().uri("/api/panchayats/999").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let req = test::TestRequest::post()
        .uri("/api/panchayats/999/issues")
        .set_json(json!({ "category": "OTHER", "subcategory": "OTHER" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}
