#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use schooldesk_api::{ApiState, app};
use schooldesk_core::{
    models::teacher::TeacherRecord,
    service::TimetableService,
    teachers::TeacherRoster,
    timetable::{TimetableConfig, TimetableStore},
};
use schooldesk_db::mock::{MockSlotBackend, MockTeacherRepo};
use serde_json::{Value, json};

pub struct TestContext {
    pub slot_backend: MockSlotBackend,
    pub teacher_repo: MockTeacherRepo,
    pub teachers: Vec<TeacherRecord>,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            slot_backend: MockSlotBackend::new(),
            teacher_repo: MockTeacherRepo::new(),
            teachers: vec![TeacherRecord {
                id: "t1".to_string(),
                name: "Okello James".to_string(),
                contact: Some("0772000000".to_string()),
                subject: Some("Mathematics".to_string()),
            }],
        }
    }

    /// Backend that accepts every write.
    pub fn accepting() -> Self {
        let mut ctx = Self::new();
        ctx.slot_backend.expect_create_slot().returning(|_| Ok(()));
        ctx.slot_backend.expect_update_slot().returning(|_| Ok(()));
        ctx.slot_backend.expect_delete_slot().returning(|_| Ok(()));
        ctx
    }

    // Build state with mock persistence
    pub fn build_state(self) -> Arc<ApiState> {
        let teachers = Arc::new(TeacherRoster::from_records(self.teachers));
        let store = TimetableStore::new(TimetableConfig::default(), teachers.clone());

        Arc::new(ApiState {
            timetable: TimetableService::new(store, Arc::new(self.slot_backend)),
            teachers,
            teacher_repo: Arc::new(self.teacher_repo),
        })
    }

    pub fn server(self) -> TestServer {
        TestServer::new(app(self.build_state())).expect("Failed to start test server")
    }
}

pub fn lesson(day: &str, period: u32, subject: &str) -> Value {
    json!({
        "classId": "c1",
        "streamId": "s1",
        "day": day,
        "period": period,
        "subject": subject,
        "teacherId": "t1",
    })
}
