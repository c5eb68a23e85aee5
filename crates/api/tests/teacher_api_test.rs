mod test_utils;

use axum::http::StatusCode;
use mockall::predicate;
use pretty_assertions::assert_eq;
use schooldesk_core::models::{teacher::TeacherRecord, timetable::TimetableSlot};
use serde_json::json;

use test_utils::{TestContext, lesson};

#[tokio::test]
async fn test_list_teachers_from_directory() {
    let server = TestContext::new().server();

    let teachers: Vec<TeacherRecord> = server.get("/api/teachers").await.json();

    assert_eq!(teachers.len(), 1);
    assert_eq!(teachers[0].name, "Okello James");
}

#[tokio::test]
async fn test_create_teacher_persists_and_updates_directory() {
    let mut ctx = TestContext::new();
    ctx.teacher_repo
        .expect_upsert_teacher()
        .withf(|teacher| teacher.id == "t2" && teacher.name == "Nakato Sarah")
        .times(1)
        .returning(|teacher| Ok(teacher.clone()));
    let server = ctx.server();

    let response = server
        .post("/api/teachers")
        .json(&json!({ "id": "t2", "name": "  Nakato Sarah ", "subject": "English" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let teachers: Vec<TeacherRecord> = server.get("/api/teachers").await.json();
    assert_eq!(
        teachers.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(),
        vec!["t2", "t1"]
    );
}

#[tokio::test]
async fn test_create_teacher_without_id_generates_one() {
    let mut ctx = TestContext::new();
    ctx.teacher_repo
        .expect_upsert_teacher()
        .returning(|teacher| Ok(teacher.clone()));
    let server = ctx.server();

    let created: TeacherRecord = server
        .post("/api/teachers")
        .json(&json!({ "name": "Mugisha Peter" }))
        .await
        .json();

    assert!(uuid::Uuid::parse_str(&created.id).is_ok());
}

#[tokio::test]
async fn test_create_teacher_requires_name() {
    let mut ctx = TestContext::new();
    ctx.teacher_repo.expect_upsert_teacher().times(0);
    let server = ctx.server();

    server
        .post("/api/teachers")
        .json(&json!({ "name": "   " }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_renamed_teacher_shows_on_existing_lessons() {
    let mut ctx = TestContext::accepting();
    ctx.teacher_repo
        .expect_upsert_teacher()
        .with(predicate::function(|teacher: &TeacherRecord| teacher.id == "t1"))
        .returning(|teacher| Ok(teacher.clone()));
    let server = ctx.server();
    let slot: TimetableSlot = server
        .post("/api/timetable")
        .json(&lesson("Monday", 1, "Math"))
        .await
        .json();

    server
        .post("/api/teachers")
        .json(&json!({ "id": "t1", "name": "Okello J." }))
        .await
        .assert_status(StatusCode::CREATED);

    let refreshed: TimetableSlot = server.get(&format!("/api/timetable/{}", slot.id)).await.json();
    assert_eq!(refreshed.teacher.map(|t| t.name), Some("Okello J.".to_string()));
}

#[tokio::test]
async fn test_health_reports_counts() {
    let server = TestContext::new().server();

    let health: serde_json::Value = server.get("/health").await.json();

    assert_eq!(health, json!({ "status": "ok", "lessons": 0, "teachers": 1 }));
}
