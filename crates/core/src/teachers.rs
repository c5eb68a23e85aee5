use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::models::teacher::TeacherRecord;

/// Lookup of teacher records by id.
///
/// Only used to fill the denormalized `teacher` field of a slot, so a missing
/// teacher is never an error.
pub trait TeacherDirectory: Send + Sync {
    fn find_teacher(&self, teacher_id: &str) -> Option<TeacherRecord>;
}

/// In-memory teacher directory, loaded at startup and kept current by the
/// teacher endpoints.
#[derive(Debug, Default)]
pub struct TeacherRoster {
    teachers: RwLock<HashMap<String, TeacherRecord>>,
}

impl TeacherRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = TeacherRecord>) -> Self {
        let teachers = records
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();
        Self {
            teachers: RwLock::new(teachers),
        }
    }

    /// Inserts or replaces a teacher, returning the previous record.
    pub fn upsert(&self, record: TeacherRecord) -> Option<TeacherRecord> {
        self.teachers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(record.id.clone(), record)
    }

    pub fn remove(&self, teacher_id: &str) -> Option<TeacherRecord> {
        self.teachers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(teacher_id)
    }

    /// All teachers sorted by name.
    pub fn list(&self) -> Vec<TeacherRecord> {
        let mut teachers: Vec<_> = self
            .teachers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        teachers.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        teachers
    }

    pub fn len(&self) -> usize {
        self.teachers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TeacherDirectory for TeacherRoster {
    fn find_teacher(&self, teacher_id: &str) -> Option<TeacherRecord> {
        self.teachers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(teacher_id)
            .cloned()
    }
}
