use chrono::NaiveTime;
use serde::Serialize;

use crate::models::period::{PeriodTable, hhmm};
use crate::models::timetable::{SchoolDay, TimetableSlot};

/// Weekly timetable of one class or stream: one row per period, one cell per
/// school day.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableGrid {
    pub class_id: String,
    pub stream_id: Option<String>,
    pub days: Vec<SchoolDay>,
    pub rows: Vec<GridRow>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRow {
    pub period: u32,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    /// Indexed like `TimetableGrid::days`.
    pub cells: Vec<Option<TimetableSlot>>,
}

impl TimetableGrid {
    /// Places `slots` into the grid. Slots outside the configured periods are
    /// left out; the first slot wins if two land in the same cell.
    pub fn build(
        periods: &PeriodTable,
        class_id: impl Into<String>,
        stream_id: Option<String>,
        slots: impl IntoIterator<Item = TimetableSlot>,
    ) -> Self {
        let mut rows: Vec<GridRow> = periods
            .iter()
            .map(|p| GridRow {
                period: p.period,
                start_time: p.start,
                end_time: p.end,
                cells: vec![None; SchoolDay::ALL.len()],
            })
            .collect();

        for slot in slots {
            let Some(row) = rows.iter_mut().find(|row| row.period == slot.period) else {
                continue;
            };
            let cell = &mut row.cells[slot.day.index()];
            if cell.is_none() {
                *cell = Some(slot);
            }
        }

        Self {
            class_id: class_id.into(),
            stream_id,
            days: SchoolDay::ALL.to_vec(),
            rows,
        }
    }

    pub fn cell(&self, day: SchoolDay, period: u32) -> Option<&TimetableSlot> {
        self.rows
            .iter()
            .find(|row| row.period == period)
            .and_then(|row| row.cells[day.index()].as_ref())
    }

    /// Empty `(day, period)` cells, in day-major order.
    pub fn free_cells(&self) -> Vec<(SchoolDay, u32)> {
        SchoolDay::ALL
            .iter()
            .flat_map(|day| {
                self.rows
                    .iter()
                    .filter(|row| row.cells[day.index()].is_none())
                    .map(move |row| (*day, row.period))
            })
            .collect()
    }

    pub fn lesson_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.cells.iter().filter(|cell| cell.is_some()).count())
            .sum()
    }
}
