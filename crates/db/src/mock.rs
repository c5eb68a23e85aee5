use async_trait::async_trait;
use mockall::mock;
use schooldesk_core::{
    errors::SchoolResult,
    models::{teacher::TeacherRecord, timetable::TimetableSlot},
    service::SlotBackend,
};
use uuid::Uuid;

use crate::backend::TeacherRepo;

// Mock persistence for testing
mock! {
    pub SlotBackend {}

    #[async_trait]
    impl SlotBackend for SlotBackend {
        async fn create_slot(&self, slot: &TimetableSlot) -> SchoolResult<()>;

        async fn update_slot(&self, slot: &TimetableSlot) -> SchoolResult<()>;

        async fn delete_slot(&self, id: Uuid) -> SchoolResult<()>;

        async fn list_slots(&self) -> SchoolResult<Vec<TimetableSlot>>;
    }
}

mock! {
    pub TeacherRepo {}

    #[async_trait]
    impl TeacherRepo for TeacherRepo {
        async fn upsert_teacher(&self, teacher: &TeacherRecord) -> eyre::Result<TeacherRecord>;

        async fn list_teachers(&self) -> eyre::Result<Vec<TeacherRecord>>;
    }
}
