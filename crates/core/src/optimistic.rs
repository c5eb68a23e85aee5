//! Two-phase mutations of the timetable.
//!
//! A change is applied to the local store first and stays `Pending` until the
//! persistence backend answers. It then becomes `Committed`, or `RolledBack`
//! with the local change undone. The transitions live on
//! [`TimetableStore`](crate::timetable::TimetableStore); this module holds the
//! record of what each mutation did.

use serde::Serialize;
use uuid::Uuid;

use crate::errors::{SchoolError, SchoolResult};
use crate::models::timetable::TimetableSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationState {
    Pending,
    Committed,
    RolledBack,
}

/// What a staged mutation changed, with enough of the old state to undo it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotChange {
    Added {
        slot: TimetableSlot,
    },
    Updated {
        previous: TimetableSlot,
        current: TimetableSlot,
    },
    /// `index` is the position the slot held, so a rollback keeps insertion order.
    Deleted {
        previous: TimetableSlot,
        index: usize,
    },
    /// Deleting an id that was not present.
    Unchanged,
}

#[derive(Debug)]
pub struct PendingMutation {
    id: Uuid,
    change: SlotChange,
    state: MutationState,
}

impl PendingMutation {
    pub(crate) fn new(change: SlotChange) -> Self {
        Self {
            id: Uuid::new_v4(),
            change,
            state: MutationState::Pending,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn change(&self) -> &SlotChange {
        &self.change
    }

    pub fn state(&self) -> MutationState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == MutationState::Pending
    }

    /// True when the mutation touched the collection.
    pub fn has_effect(&self) -> bool {
        !matches!(self.change, SlotChange::Unchanged)
    }

    /// The slot as it stands after the mutation; for a delete, the removed slot.
    pub fn slot(&self) -> Option<&TimetableSlot> {
        match &self.change {
            SlotChange::Added { slot } => Some(slot),
            SlotChange::Updated { current, .. } => Some(current),
            SlotChange::Deleted { previous, .. } => Some(previous),
            SlotChange::Unchanged => None,
        }
    }

    pub fn into_slot(self) -> Option<TimetableSlot> {
        match self.change {
            SlotChange::Added { slot } => Some(slot),
            SlotChange::Updated { current, .. } => Some(current),
            SlotChange::Deleted { previous, .. } => Some(previous),
            SlotChange::Unchanged => None,
        }
    }

    pub(crate) fn ensure_pending(&self) -> SchoolResult<()> {
        match self.state {
            MutationState::Pending => Ok(()),
            MutationState::Committed => Err(SchoolError::Validation(format!(
                "Mutation {} is already committed",
                self.id
            ))),
            MutationState::RolledBack => Err(SchoolError::Validation(format!(
                "Mutation {} is already rolled back",
                self.id
            ))),
        }
    }

    pub(crate) fn settle(&mut self, state: MutationState) {
        self.state = state;
    }
}
