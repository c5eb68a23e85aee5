use std::sync::Arc;

use pretty_assertions::assert_eq;
use schooldesk_core::{
    models::timetable::{NewSlot, SchoolDay},
    teachers::TeacherRoster,
    timetable::{TimetableConfig, TimetableStore},
};

fn lesson(stream_id: Option<&str>, day: SchoolDay, period: u32, subject: &str) -> NewSlot {
    NewSlot {
        class_id: "senior-1".to_string(),
        stream_id: stream_id.map(str::to_string),
        day,
        period,
        subject: subject.to_string(),
        teacher_id: "t1".to_string(),
        start_time: None,
        end_time: None,
    }
}

#[test]
fn test_grid_places_lessons_by_day_and_period() {
    let mut store = TimetableStore::new(TimetableConfig::default(), Arc::new(TeacherRoster::new()));
    store.add_slot(lesson(Some("A"), SchoolDay::Monday, 1, "Math")).unwrap();
    store.add_slot(lesson(Some("A"), SchoolDay::Friday, 8, "Music")).unwrap();
    store.add_slot(lesson(Some("B"), SchoolDay::Monday, 1, "English")).unwrap();
    store.add_slot(lesson(None, SchoolDay::Tuesday, 2, "Assembly")).unwrap();

    let grid = store.grid("senior-1", Some("A"));

    assert_eq!(grid.days, SchoolDay::ALL.to_vec());
    assert_eq!(grid.rows.len(), 8);
    assert_eq!(grid.lesson_count(), 2);
    assert_eq!(grid.cell(SchoolDay::Monday, 1).map(|s| s.subject.as_str()), Some("Math"));
    assert_eq!(grid.cell(SchoolDay::Friday, 8).map(|s| s.subject.as_str()), Some("Music"));
    assert!(grid.cell(SchoolDay::Tuesday, 2).is_none());
    assert_eq!(grid.free_cells().len(), 5 * 8 - 2);
    assert_eq!(grid.free_cells()[0], (SchoolDay::Monday, 2));
}

#[test]
fn test_class_level_grid_ignores_streams() {
    let mut store = TimetableStore::new(TimetableConfig::default(), Arc::new(TeacherRoster::new()));
    store.add_slot(lesson(Some("A"), SchoolDay::Monday, 1, "Math")).unwrap();
    store.add_slot(lesson(None, SchoolDay::Tuesday, 2, "Assembly")).unwrap();

    let grid = store.grid("senior-1", None);

    assert_eq!(grid.lesson_count(), 1);
    assert_eq!(grid.cell(SchoolDay::Tuesday, 2).map(|s| s.subject.as_str()), Some("Assembly"));
}

#[test]
fn test_grid_serializes_times_as_hh_mm() {
    let store = TimetableStore::new(TimetableConfig::default(), Arc::new(TeacherRoster::new()));

    let json = serde_json::to_value(store.grid("senior-1", None)).unwrap();

    assert_eq!(json["rows"][0]["startTime"], "08:00");
    assert_eq!(json["rows"][3]["startTime"], "10:20");
    assert_eq!(json["classId"], "senior-1");
}
