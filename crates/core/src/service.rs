//! # Timetable service
//!
//! Pairs the [`TimetableStore`] with the persistence backend. Every mutation is
//! applied locally, sent to the backend, then committed or rolled back. The
//! store lock is held for the whole sequence, so no other mutation can observe
//! or interleave with a pending change.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::{SchoolError, SchoolResult};
use crate::grid::TimetableGrid;
use crate::models::period::PeriodTable;
use crate::models::timetable::{
    ConflictQuery, ConflictResponse, NewSlot, SlotChanges, TimetableSlot,
};
use crate::optimistic::{PendingMutation, SlotChange};
use crate::timetable::{TimetableConfig, TimetableStore};
use crate::teachers::TeacherDirectory;

/// Remote copy of the timetable.
///
/// Implementations report a uniqueness violation as `SchoolError::Conflict`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SlotBackend: Send + Sync {
    async fn create_slot(&self, slot: &TimetableSlot) -> SchoolResult<()>;

    async fn update_slot(&self, slot: &TimetableSlot) -> SchoolResult<()>;

    async fn delete_slot(&self, id: Uuid) -> SchoolResult<()>;

    async fn list_slots(&self) -> SchoolResult<Vec<TimetableSlot>>;
}

pub struct TimetableService {
    store: Mutex<TimetableStore>,
    backend: Arc<dyn SlotBackend>,
}

impl TimetableService {
    pub fn new(store: TimetableStore, backend: Arc<dyn SlotBackend>) -> Self {
        Self {
            store: Mutex::new(store),
            backend,
        }
    }

    /// Builds a service whose store starts from the backend's slots.
    pub async fn load(
        config: TimetableConfig,
        teachers: Arc<dyn TeacherDirectory>,
        backend: Arc<dyn SlotBackend>,
    ) -> SchoolResult<Self> {
        let slots = backend.list_slots().await?;
        let mut store = TimetableStore::new(config, teachers);
        store.restore(slots)?;
        info!("Loaded {} timetable slots", store.len());
        Ok(Self::new(store, backend))
    }

    pub async fn add_slot(&self, candidate: NewSlot) -> SchoolResult<TimetableSlot> {
        let mut store = self.store.lock().await;
        let mutation = store.stage_add(candidate)?;

        let remote = match mutation.slot() {
            Some(slot) => self.backend.create_slot(slot).await,
            None => Ok(()),
        };

        let mutation = settle(&mut store, mutation, remote)?;
        let slot = mutation
            .into_slot()
            .ok_or_else(|| SchoolError::Internal("add produced no slot".into()))?;
        Ok(slot)
    }

    pub async fn update_slot(&self, id: Uuid, changes: SlotChanges) -> SchoolResult<TimetableSlot> {
        let mut store = self.store.lock().await;
        let mutation = store.stage_update(id, changes)?;

        let remote = match mutation.change() {
            SlotChange::Updated { previous, current } if previous == current => Ok(()),
            SlotChange::Updated { current, .. } => self.backend.update_slot(current).await,
            _ => Ok(()),
        };

        let mutation = settle(&mut store, mutation, remote)?;
        mutation
            .into_slot()
            .ok_or_else(|| SchoolError::Internal("update produced no slot".into()))
    }

    /// Idempotent: an unknown id returns `Ok(None)` without contacting the backend.
    pub async fn delete_slot(&self, id: Uuid) -> SchoolResult<Option<TimetableSlot>> {
        let mut store = self.store.lock().await;
        let mutation = store.stage_delete(id);

        let remote = if mutation.has_effect() {
            self.backend.delete_slot(id).await
        } else {
            Ok(())
        };

        let mutation = settle(&mut store, mutation, remote)?;
        Ok(mutation.into_slot())
    }

    /// Filtered slots with teachers re-resolved from the directory.
    pub async fn get_slots(&self, class_id: Option<&str>, stream_id: Option<&str>) -> Vec<TimetableSlot> {
        let store = self.store.lock().await;
        let slots = store
            .get_slots(class_id, stream_id)
            .into_iter()
            .map(|slot| store.with_current_teacher(slot))
            .collect();
        slots
    }

    pub async fn get_slot(&self, id: Uuid) -> SchoolResult<TimetableSlot> {
        let store = self.store.lock().await;
        let slot = store
            .get_slot(id)
            .map(|slot| store.with_current_teacher(slot))
            .ok_or_else(|| SchoolError::NotFound(format!("Lesson with ID {} not found", id)));
        slot
    }

    pub async fn check_conflict(&self, query: &ConflictQuery) -> ConflictResponse {
        let store = self.store.lock().await;
        let existing = store
            .conflicting_slot(
                query.day,
                query.period,
                query.class_id.as_deref(),
                query.stream_id.as_deref(),
                query.exclude_id,
            )
            .cloned();

        ConflictResponse {
            conflict: existing.is_some(),
            existing,
        }
    }

    pub async fn grid(&self, class_id: &str, stream_id: Option<&str>) -> TimetableGrid {
        self.store.lock().await.grid(class_id, stream_id)
    }

    pub async fn periods(&self) -> PeriodTable {
        self.store.lock().await.periods().clone()
    }

    pub async fn len(&self) -> usize {
        self.store.lock().await.len()
    }
}

/// Commits on backend success, otherwise rolls back and returns the backend error.
fn settle(
    store: &mut TimetableStore,
    mut mutation: PendingMutation,
    remote: SchoolResult<()>,
) -> SchoolResult<PendingMutation> {
    match remote {
        Ok(()) => {
            store.commit(&mut mutation)?;
            Ok(mutation)
        }
        Err(err) => {
            warn!("Backend rejected mutation {}, rolling back: {}", mutation.id(), err);
            store.rollback(&mut mutation)?;
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::timetable::{SchoolDay, SlotKey};
    use crate::teachers::TeacherRoster;
    use pretty_assertions::assert_eq;

    fn lesson(subject: &str, period: u32) -> NewSlot {
        NewSlot {
            class_id: "c1".to_string(),
            stream_id: Some("s1".to_string()),
            day: SchoolDay::Monday,
            period,
            subject: subject.to_string(),
            teacher_id: "t1".to_string(),
            start_time: None,
            end_time: None,
        }
    }

    fn service(backend: MockSlotBackend) -> TimetableService {
        let store = TimetableStore::new(TimetableConfig::default(), Arc::new(TeacherRoster::new()));
        TimetableService::new(store, Arc::new(backend))
    }

    fn remote_conflict() -> SchoolError {
        SchoolError::conflict(SlotKey::new("c1", Some("s1".to_string()), SchoolDay::Monday, 1), None)
    }

    #[tokio::test]
    async fn add_commits_when_backend_accepts() {
        let mut backend = MockSlotBackend::new();
        backend
            .expect_create_slot()
            .withf(|slot| slot.subject == "Math")
            .times(1)
            .returning(|_| Ok(()));
        let service = service(backend);

        let slot = service.add_slot(lesson("Math", 1)).await.unwrap();

        assert_eq!(service.get_slots(Some("c1"), Some("s1")).await, vec![slot]);
    }

    #[tokio::test]
    async fn add_rolls_back_on_remote_conflict() {
        let mut backend = MockSlotBackend::new();
        backend
            .expect_create_slot()
            .times(1)
            .returning(|_| Err(remote_conflict()));
        let service = service(backend);

        let err = service.add_slot(lesson("Math", 1)).await.unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(service.len().await, 0);
    }

    #[tokio::test]
    async fn local_conflict_never_reaches_backend() {
        let mut backend = MockSlotBackend::new();
        backend.expect_create_slot().times(1).returning(|_| Ok(()));
        let service = service(backend);

        service.add_slot(lesson("Math", 1)).await.unwrap();
        let err = service.add_slot(lesson("English", 1)).await.unwrap_err();

        match err {
            SchoolError::Conflict { existing, .. } => {
                assert_eq!(existing.map(|slot| slot.subject), Some("Math".to_string()));
            }
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_restores_previous_fields_on_backend_failure() {
        let mut backend = MockSlotBackend::new();
        backend.expect_create_slot().returning(|_| Ok(()));
        backend
            .expect_update_slot()
            .times(1)
            .returning(|_| Err(SchoolError::Database(eyre::eyre!("connection reset"))));
        let service = service(backend);

        let slot = service.add_slot(lesson("Math", 1)).await.unwrap();
        let changes = SlotChanges {
            period: Some(2),
            ..Default::default()
        };
        let err = service.update_slot(slot.id, changes).await.unwrap_err();

        assert!(matches!(err, SchoolError::Database(_)));
        assert_eq!(service.get_slot(slot.id).await.unwrap(), slot);
    }

    #[tokio::test]
    async fn unchanged_update_skips_backend() {
        let mut backend = MockSlotBackend::new();
        backend.expect_create_slot().returning(|_| Ok(()));
        backend.expect_update_slot().times(0);
        let service = service(backend);

        let slot = service.add_slot(lesson("Math", 1)).await.unwrap();
        let updated = service.update_slot(slot.id, SlotChanges::default()).await.unwrap();

        assert_eq!(updated, slot);
    }

    #[tokio::test]
    async fn delete_reinserts_slot_in_place_on_backend_failure() {
        let mut backend = MockSlotBackend::new();
        backend.expect_create_slot().returning(|_| Ok(()));
        backend
            .expect_delete_slot()
            .times(1)
            .returning(|_| Err(SchoolError::Database(eyre::eyre!("timeout"))));
        let service = service(backend);

        let first = service.add_slot(lesson("Math", 1)).await.unwrap();
        let second = service.add_slot(lesson("English", 2)).await.unwrap();
        let third = service.add_slot(lesson("Physics", 3)).await.unwrap();

        assert!(service.delete_slot(second.id).await.is_err());
        assert_eq!(
            service.get_slots(None, None).await,
            vec![first, second, third]
        );
    }

    #[tokio::test]
    async fn deleting_unknown_id_is_a_local_no_op() {
        let mut backend = MockSlotBackend::new();
        backend.expect_delete_slot().times(0);
        let service = service(backend);

        assert_eq!(service.delete_slot(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn load_restores_backend_slots() {
        let source = {
            let mut store = TimetableStore::new(TimetableConfig::default(), Arc::new(TeacherRoster::new()));
            store.add_slot(lesson("Math", 1)).unwrap();
            store.add_slot(lesson("English", 2)).unwrap();
            store.slots().to_vec()
        };
        let listed = source.clone();

        let mut backend = MockSlotBackend::new();
        backend
            .expect_list_slots()
            .times(1)
            .returning(move || Ok(listed.clone()));

        let service = TimetableService::load(
            TimetableConfig::default(),
            Arc::new(TeacherRoster::new()),
            Arc::new(backend),
        )
        .await
        .unwrap();

        assert_eq!(service.get_slots(None, None).await, source);
    }
}
