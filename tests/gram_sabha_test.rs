//! Integration tests for the Gram Sabha meeting model.

mod common;

use common::{create_completed_issue, create_test_panchayat, setup_test_db, system_item, user_item};
use gramvani::models::gram_sabha::{self, MeetingStatus, NewGramSabha};

fn new_meeting(title: &str, agenda: Vec<gramvani::models::agenda_item::AgendaItem>) -> NewGramSabha {
    NewGramSabha {
        title: title.to_string(),
        date_time: "2025-07-01T10:00:00".to_string(),
        location: "Panchayat Bhavan".to_string(),
        scheduled_duration_hours: 2.0,
        agenda,
        meeting_link: Some("https://meet.example/abc".to_string()),
        conference_data: None,
        scheduled_by: "official1".to_string(),
    }
}

#[test]
fn meetings_round_trip_with_their_agenda_snapshot() {
    let (_dir, conn) = setup_test_db();
    let pid = create_test_panchayat(&conn, "rampur");
    let i1 = create_completed_issue(&conn, pid, "no water");

    let agenda = vec![
        user_item("a", "Water", &[i1], "official1"),
        system_item("b", "Roads", &[]),
    ];
    let id = gram_sabha::create(&conn, pid, &new_meeting("July assembly", agenda)).unwrap();

    let meeting = gram_sabha::find_by_id(&conn, id).unwrap().unwrap();
    assert_eq!(meeting.title, "July assembly");
    assert_eq!(meeting.status, MeetingStatus::Scheduled);
    assert_eq!(meeting.agenda.len(), 2);
    assert!(meeting.agenda[0].is_user());
    assert_eq!(meeting.agenda[0].created_by_user_id(), Some("official1"));
    assert!(meeting.agenda[1].is_system());
    assert_eq!(meeting.agenda[0].linked_issues, vec![i1]);
    assert_eq!(meeting.scheduled_by, "official1");
}

#[test]
fn update_agenda_replaces_the_snapshot() {
    let (_dir, conn) = setup_test_db();
    let pid = create_test_panchayat(&conn, "rampur");

    let id = gram_sabha::create(
        &conn,
        pid,
        &new_meeting("July assembly", vec![user_item("a", "Water", &[], "official1")]),
    )
    .unwrap();

    gram_sabha::update_agenda(&conn, id, &[system_item("b", "Roads", &[])]).unwrap();

    let meeting = gram_sabha::find_by_id(&conn, id).unwrap().unwrap();
    assert_eq!(meeting.agenda.len(), 1);
    assert_eq!(meeting.agenda[0].id, "b");
}

#[test]
fn lifecycle_follows_the_transition_table() {
    use MeetingStatus::*;

    assert!(Scheduled.can_transition_to(InProgress));
    assert!(Scheduled.can_transition_to(Cancelled));
    assert!(Scheduled.can_transition_to(Rescheduled));
    assert!(InProgress.can_transition_to(Concluded));
    assert!(Cancelled.can_transition_to(Rescheduled));
    assert!(Rescheduled.can_transition_to(InProgress));
    assert!(Unscheduled.can_transition_to(Scheduled));

    // Illegal jumps.
    assert!(!Scheduled.can_transition_to(Concluded));
    assert!(!Concluded.can_transition_to(InProgress));
    assert!(!Concluded.can_transition_to(Scheduled));
    assert!(!Cancelled.can_transition_to(InProgress));
}

#[test]
fn status_updates_persist() {
    let (_dir, conn) = setup_test_db();
    let pid = create_test_panchayat(&conn, "rampur");

    let id = gram_sabha::create(
        &conn,
        pid,
        &new_meeting("July assembly", vec![user_item("a", "Water", &[], "official1")]),
    )
    .unwrap();

    gram_sabha::update_status(&conn, id, MeetingStatus::InProgress).unwrap();
    gram_sabha::update_status(&conn, id, MeetingStatus::Concluded).unwrap();

    let meeting = gram_sabha::find_by_id(&conn, id).unwrap().unwrap();
    assert_eq!(meeting.status, MeetingStatus::Concluded);
}

#[test]
fn open_meetings_with_agendas_are_found_for_translation() {
    let (_dir, conn) = setup_test_db();
    let pid = create_test_panchayat(&conn, "rampur");

    let open = gram_sabha::create(
        &conn,
        pid,
        &new_meeting("Open", vec![user_item("a", "Water", &[], "official1")]),
    )
    .unwrap();
    let concluded = gram_sabha::create(
        &conn,
        pid,
        &new_meeting("Done", vec![user_item("b", "Roads", &[], "official1")]),
    )
    .unwrap();
    gram_sabha::update_status(&conn, concluded, MeetingStatus::InProgress).unwrap();
    gram_sabha::update_status(&conn, concluded, MeetingStatus::Concluded).unwrap();
    // Scheduled but with nothing on the agenda.
    gram_sabha::create(&conn, pid, &new_meeting("Empty", Vec::new())).unwrap();

    let found = gram_sabha::find_open_with_agenda(&conn).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, open);
}

#[test]
fn meetings_list_per_panchayat() {
    let (_dir, conn) = setup_test_db();
    let pid = create_test_panchayat(&conn, "rampur");
    let other = create_test_panchayat(&conn, "sitapur");

    gram_sabha::create(
        &conn,
        pid,
        &new_meeting("July assembly", vec![user_item("a", "Water", &[], "official1")]),
    )
    .unwrap();
    gram_sabha::create(
        &conn,
        other,
        &new_meeting("August assembly", vec![user_item("b", "Roads", &[], "official1")]),
    )
    .unwrap();

    assert_eq!(gram_sabha::find_for_panchayat(&conn, pid).unwrap().len(), 1);
    assert_eq!(gram_sabha::find_for_panchayat(&conn, other).unwrap().len(), 1);
}
