use thiserror::Error;

use crate::models::timetable::{SlotKey, TimetableSlot};

#[derive(Error, Debug)]
pub enum SchoolError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// `existing` is the occupying slot when it is known locally. Conflicts
    /// reported by the backend carry no occupant.
    #[error("A lesson already exists for this day and period ({key})")]
    Conflict {
        key: SlotKey,
        existing: Option<Box<TimetableSlot>>,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl SchoolError {
    pub fn conflict(key: SlotKey, existing: Option<TimetableSlot>) -> Self {
        SchoolError::Conflict {
            key,
            existing: existing.map(Box::new),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, SchoolError::Conflict { .. })
    }
}

pub type SchoolResult<T> = Result<T, SchoolError>;
