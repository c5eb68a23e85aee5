//! # Timetable store
//!
//! Authoritative in-memory collection of lesson slots. Every write checks the
//! one-lesson-per-cell rule before touching the collection, so a failed call
//! never leaves a partial change behind.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveTime;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::{SchoolError, SchoolResult};
use crate::grid::TimetableGrid;
use crate::models::period::PeriodTable;
use crate::models::teacher::TeacherRecord;
use crate::models::timetable::{
    NewSlot, SchoolDay, SlotChanges, SlotKey, TimetableSlot, normalize_stream,
};
use crate::optimistic::{MutationState, PendingMutation, SlotChange};
use crate::teachers::TeacherDirectory;

#[derive(Debug, Clone, Default)]
pub struct TimetableConfig {
    pub periods: PeriodTable,
}

pub struct TimetableStore {
    config: TimetableConfig,
    teachers: Arc<dyn TeacherDirectory>,
    slots: Vec<TimetableSlot>,
}

impl TimetableStore {
    pub fn new(config: TimetableConfig, teachers: Arc<dyn TeacherDirectory>) -> Self {
        Self {
            config,
            teachers,
            slots: Vec::new(),
        }
    }

    pub fn periods(&self) -> &PeriodTable {
        &self.config.periods
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[TimetableSlot] {
        &self.slots
    }

    /// Replaces the collection with previously persisted slots.
    ///
    /// Fails with `Conflict` and loads nothing if two slots share a cell.
    pub fn restore(&mut self, mut slots: Vec<TimetableSlot>) -> SchoolResult<()> {
        let mut seen = HashSet::with_capacity(slots.len());
        for slot in &mut slots {
            slot.stream_id = normalize_stream(slot.stream_id.take());
            if !seen.insert(slot.key()) {
                return Err(SchoolError::conflict(slot.key(), Some(slot.clone())));
            }
        }

        debug!("Restored {} timetable slots", slots.len());
        self.slots = slots;
        Ok(())
    }

    // Queries

    pub fn get_slot(&self, id: Uuid) -> Option<&TimetableSlot> {
        self.slots.iter().find(|slot| slot.id == id)
    }

    /// Slots of a class, optionally narrowed to one stream, in insertion order.
    /// Without a class every slot is returned and `stream_id` is ignored. A
    /// blank stream filter is the same as none.
    pub fn get_slots(&self, class_id: Option<&str>, stream_id: Option<&str>) -> Vec<&TimetableSlot> {
        let class_id = class_id.map(str::trim);
        let stream_id = stream_id.map(str::trim).filter(|stream| !stream.is_empty());
        self.slots
            .iter()
            .filter(|slot| match class_id {
                Some(class_id) => {
                    slot.class_id == class_id
                        && stream_id.is_none_or(|stream| slot.stream_id.as_deref() == Some(stream))
                }
                None => true,
            })
            .collect()
    }

    /// The slot holding `key`, ignoring `exclude_id`.
    pub fn find_occupant(&self, key: &SlotKey, exclude_id: Option<Uuid>) -> Option<&TimetableSlot> {
        self.slots
            .iter()
            .find(|slot| Some(slot.id) != exclude_id && slot.occupies(key))
    }

    /// Same rule the write path enforces. With a class the scope is the exact
    /// `(class, stream)` cell, a missing stream meaning the class-level cell.
    /// Without a class any lesson at `day`/`period` counts.
    pub fn check_conflict(
        &self,
        day: SchoolDay,
        period: u32,
        class_id: Option<&str>,
        stream_id: Option<&str>,
        exclude_id: Option<Uuid>,
    ) -> bool {
        self.conflicting_slot(day, period, class_id, stream_id, exclude_id)
            .is_some()
    }

    pub fn conflicting_slot(
        &self,
        day: SchoolDay,
        period: u32,
        class_id: Option<&str>,
        stream_id: Option<&str>,
        exclude_id: Option<Uuid>,
    ) -> Option<&TimetableSlot> {
        match class_id {
            // A blank class can never be written, so it holds nothing.
            Some(class_id) if class_id.trim().is_empty() => None,
            Some(class_id) => {
                let key = SlotKey::new(class_id, stream_id.map(str::to_string), day, period);
                self.find_occupant(&key, exclude_id)
            }
            None => self.slots.iter().find(|slot| {
                Some(slot.id) != exclude_id && slot.day == day && slot.period == period
            }),
        }
    }

    /// Current teacher for a slot, falling back to the snapshot when the
    /// directory no longer knows the id.
    pub fn teacher_for(&self, slot: &TimetableSlot) -> Option<TeacherRecord> {
        self.teachers
            .find_teacher(&slot.teacher_id)
            .or_else(|| slot.teacher.clone())
    }

    /// Copy of `slot` with its teacher snapshot refreshed from the directory.
    pub fn with_current_teacher(&self, slot: &TimetableSlot) -> TimetableSlot {
        TimetableSlot {
            teacher: self.teacher_for(slot),
            ..slot.clone()
        }
    }

    /// Period x day grid for one class-level or stream-level timetable.
    pub fn grid(&self, class_id: &str, stream_id: Option<&str>) -> TimetableGrid {
        let class_id = class_id.trim();
        let stream_id = normalize_stream(stream_id.map(str::to_string));
        let slots = self
            .slots
            .iter()
            .filter(|slot| slot.class_id == class_id && slot.stream_id == stream_id)
            .map(|slot| self.with_current_teacher(slot));

        TimetableGrid::build(&self.config.periods, class_id, stream_id.clone(), slots)
    }

    // Committed writes

    pub fn add_slot(&mut self, candidate: NewSlot) -> SchoolResult<TimetableSlot> {
        let mut mutation = self.stage_add(candidate)?;
        self.commit(&mut mutation)?;
        mutation
            .into_slot()
            .ok_or_else(|| SchoolError::Internal("add produced no slot".into()))
    }

    pub fn update_slot(&mut self, id: Uuid, changes: SlotChanges) -> SchoolResult<TimetableSlot> {
        let mut mutation = self.stage_update(id, changes)?;
        self.commit(&mut mutation)?;
        mutation
            .into_slot()
            .ok_or_else(|| SchoolError::Internal("update produced no slot".into()))
    }

    /// Removes the slot if present. Deleting an unknown id is a no-op.
    pub fn delete_slot(&mut self, id: Uuid) -> Option<TimetableSlot> {
        let mut mutation = self.stage_delete(id);
        mutation.settle(MutationState::Committed);
        mutation.into_slot()
    }

    // Staged writes

    pub fn stage_add(&mut self, candidate: NewSlot) -> SchoolResult<PendingMutation> {
        let class_id = required(&candidate.class_id, "classId")?;
        let subject = required(&candidate.subject, "subject")?;
        let teacher_id = required(&candidate.teacher_id, "teacherId")?;
        let (start_time, end_time) =
            self.resolve_times(candidate.period, candidate.start_time, candidate.end_time)?;

        let key = SlotKey::new(class_id, candidate.stream_id, candidate.day, candidate.period);
        if let Some(existing) = self.find_occupant(&key, None) {
            debug!("Rejected lesson for {}: occupied by {}", key, existing.id);
            return Err(SchoolError::conflict(key, Some(existing.clone())));
        }

        let slot = TimetableSlot {
            id: Uuid::new_v4(),
            class_id: key.class_id,
            stream_id: key.stream_id,
            day: key.day,
            period: key.period,
            subject,
            teacher: self.teachers.find_teacher(&teacher_id),
            teacher_id,
            start_time,
            end_time,
        };

        debug!("Added lesson {} ({} period {})", slot.id, slot.day, slot.period);
        self.slots.push(slot.clone());
        Ok(PendingMutation::new(SlotChange::Added { slot }))
    }

    pub fn stage_update(&mut self, id: Uuid, changes: SlotChanges) -> SchoolResult<PendingMutation> {
        let index = self
            .position(id)
            .ok_or_else(|| SchoolError::NotFound(format!("Lesson with ID {} not found", id)))?;
        let previous = self.slots[index].clone();

        let class_id = match &changes.class_id {
            Some(class_id) => required(class_id, "classId")?,
            None => previous.class_id.clone(),
        };
        let stream_id = match changes.stream_id {
            Some(stream_id) => normalize_stream(stream_id),
            None => previous.stream_id.clone(),
        };
        let day = changes.day.unwrap_or(previous.day);
        let period = changes.period.unwrap_or(previous.period);
        let subject = match &changes.subject {
            Some(subject) => required(subject, "subject")?,
            None => previous.subject.clone(),
        };
        let teacher_id = match &changes.teacher_id {
            Some(teacher_id) => required(teacher_id, "teacherId")?,
            None => previous.teacher_id.clone(),
        };

        // Moving to another period takes that period's times unless new ones are given.
        let (start_time, end_time) = if period != previous.period {
            self.resolve_times(period, changes.start_time, changes.end_time)?
        } else {
            let start = changes.start_time.unwrap_or(previous.start_time);
            let end = changes.end_time.unwrap_or(previous.end_time);
            self.resolve_times(period, Some(start), Some(end))?
        };

        let key = SlotKey::new(class_id, stream_id, day, period);
        if let Some(existing) = self.find_occupant(&key, Some(id)) {
            debug!("Rejected move of lesson {} to {}: occupied by {}", id, key, existing.id);
            return Err(SchoolError::conflict(key, Some(existing.clone())));
        }

        let teacher = if teacher_id != previous.teacher_id {
            self.teachers.find_teacher(&teacher_id)
        } else {
            previous.teacher.clone()
        };

        let current = TimetableSlot {
            id,
            class_id: key.class_id,
            stream_id: key.stream_id,
            day: key.day,
            period: key.period,
            subject,
            teacher_id,
            teacher,
            start_time,
            end_time,
        };

        debug!("Updated lesson {} ({} period {})", id, current.day, current.period);
        self.slots[index] = current.clone();
        Ok(PendingMutation::new(SlotChange::Updated { previous, current }))
    }

    pub fn stage_delete(&mut self, id: Uuid) -> PendingMutation {
        match self.position(id) {
            Some(index) => {
                let previous = self.slots.remove(index);
                debug!("Deleted lesson {}", id);
                PendingMutation::new(SlotChange::Deleted { previous, index })
            }
            None => PendingMutation::new(SlotChange::Unchanged),
        }
    }

    pub fn commit(&mut self, mutation: &mut PendingMutation) -> SchoolResult<()> {
        mutation.ensure_pending()?;
        mutation.settle(MutationState::Committed);
        Ok(())
    }

    /// Undoes a pending mutation. Fails without changes if undoing it would
    /// put two lessons in one cell.
    pub fn rollback(&mut self, mutation: &mut PendingMutation) -> SchoolResult<()> {
        mutation.ensure_pending()?;

        match mutation.change() {
            SlotChange::Added { slot } => {
                if let Some(index) = self.position(slot.id) {
                    self.slots.remove(index);
                } else {
                    warn!("Lesson {} vanished before its rollback", slot.id);
                }
            }
            SlotChange::Updated { previous, .. } => {
                if let Some(existing) = self.find_occupant(&previous.key(), Some(previous.id)) {
                    return Err(SchoolError::conflict(previous.key(), Some(existing.clone())));
                }
                match self.position(previous.id) {
                    Some(index) => self.slots[index] = previous.clone(),
                    None => self.slots.push(previous.clone()),
                }
            }
            SlotChange::Deleted { previous, index } => {
                if let Some(existing) = self.find_occupant(&previous.key(), Some(previous.id)) {
                    return Err(SchoolError::conflict(previous.key(), Some(existing.clone())));
                }
                if self.position(previous.id).is_none() {
                    let index = (*index).min(self.slots.len());
                    self.slots.insert(index, previous.clone());
                }
            }
            SlotChange::Unchanged => {}
        }

        debug!("Rolled back mutation {}", mutation.id());
        mutation.settle(MutationState::RolledBack);
        Ok(())
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.slots.iter().position(|slot| slot.id == id)
    }

    fn resolve_times(
        &self,
        period: u32,
        start: Option<NaiveTime>,
        end: Option<NaiveTime>,
    ) -> SchoolResult<(NaiveTime, NaiveTime)> {
        let periods = &self.config.periods;
        if !periods.contains(period) {
            return Err(SchoolError::Validation(format!(
                "Period must be between 1 and {}, got {}",
                periods.periods_per_day(),
                period
            )));
        }

        let defaults = periods.get(period);
        let start = start.or(defaults.map(|p| p.start));
        let end = end.or(defaults.map(|p| p.end));
        let (Some(start), Some(end)) = (start, end) else {
            return Err(SchoolError::Validation(format!(
                "No start and end time configured for period {period}"
            )));
        };

        if end <= start {
            return Err(SchoolError::Validation(
                "A lesson must end after it starts".to_string(),
            ));
        }

        Ok((start, end))
    }
}

fn required(value: &str, field: &str) -> SchoolResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(SchoolError::Validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}
