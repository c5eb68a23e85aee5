//! PostgreSQL implementations of the persistence seams used by the API.

use async_trait::async_trait;
use eyre::Result;
use schooldesk_core::{
    errors::{SchoolError, SchoolResult},
    models::{teacher::TeacherRecord, timetable::TimetableSlot},
    service::SlotBackend,
};
use uuid::Uuid;

use crate::{DbPool, repositories};

/// Persistence of the teacher directory.
#[async_trait]
pub trait TeacherRepo: Send + Sync {
    async fn upsert_teacher(&self, teacher: &TeacherRecord) -> Result<TeacherRecord>;

    async fn list_teachers(&self) -> Result<Vec<TeacherRecord>>;
}

pub struct PgSlotBackend {
    pool: DbPool,
}

impl PgSlotBackend {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SlotBackend for PgSlotBackend {
    async fn create_slot(&self, slot: &TimetableSlot) -> SchoolResult<()> {
        repositories::timetable::insert_slot(&self.pool, slot)
            .await
            .map_err(|err| classify(err, Some(slot)))
    }

    async fn update_slot(&self, slot: &TimetableSlot) -> SchoolResult<()> {
        let found = repositories::timetable::update_slot(&self.pool, slot)
            .await
            .map_err(|err| classify(err, Some(slot)))?;

        if !found {
            return Err(SchoolError::NotFound(format!(
                "Lesson with ID {} not found",
                slot.id
            )));
        }
        Ok(())
    }

    async fn delete_slot(&self, id: Uuid) -> SchoolResult<()> {
        repositories::timetable::delete_slot(&self.pool, id)
            .await
            .map_err(|err| classify(err, None))
    }

    async fn list_slots(&self) -> SchoolResult<Vec<TimetableSlot>> {
        let rows = repositories::timetable::list_slots(&self.pool)
            .await
            .map_err(SchoolError::Database)?;

        rows.into_iter()
            .map(|row| TimetableSlot::try_from(row).map_err(SchoolError::Database))
            .collect()
    }
}

/// Maps a repository failure onto the store's error kinds. A unique-index
/// violation means another client took the cell first.
pub fn classify(err: eyre::Report, slot: Option<&TimetableSlot>) -> SchoolError {
    match err.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => match slot {
            Some(slot) => SchoolError::conflict(slot.key(), None),
            None => SchoolError::Database(err),
        },
        Some(sqlx::Error::RowNotFound) => SchoolError::NotFound(match slot {
            Some(slot) => format!("Lesson with ID {} not found", slot.id),
            None => "Lesson not found".to_string(),
        }),
        _ => SchoolError::Database(err),
    }
}

pub struct PgTeacherRepo {
    pool: DbPool,
}

impl PgTeacherRepo {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeacherRepo for PgTeacherRepo {
    async fn upsert_teacher(&self, teacher: &TeacherRecord) -> Result<TeacherRecord> {
        let row = repositories::teacher::upsert_teacher(&self.pool, teacher).await?;
        Ok(row.into())
    }

    async fn list_teachers(&self) -> Result<Vec<TeacherRecord>> {
        let rows = repositories::teacher::list_teachers(&self.pool).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
