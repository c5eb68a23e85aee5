use chrono::{DateTime, NaiveTime, Utc};
use eyre::{Result, eyre};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use schooldesk_core::models::{
    teacher::TeacherRecord,
    timetable::{SchoolDay, TimetableSlot, normalize_stream},
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTeacher {
    pub id: String,
    pub name: String,
    pub contact: Option<String>,
    pub subject: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<DbTeacher> for TeacherRecord {
    fn from(row: DbTeacher) -> Self {
        TeacherRecord {
            id: row.id,
            name: row.name,
            contact: row.contact,
            subject: row.subject,
        }
    }
}

/// A `timetable_slots` row joined with its teacher, if the teacher exists.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTimetableSlot {
    pub id: Uuid,
    pub class_id: String,
    pub stream_id: Option<String>,
    pub day: String,
    pub period: i32,
    pub subject: String,
    pub teacher_id: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
    pub teacher_name: Option<String>,
    pub teacher_contact: Option<String>,
    pub teacher_subject: Option<String>,
}

impl TryFrom<DbTimetableSlot> for TimetableSlot {
    type Error = eyre::Report;

    fn try_from(row: DbTimetableSlot) -> Result<Self> {
        let day: SchoolDay = row
            .day
            .parse()
            .map_err(|e| eyre!("Invalid day on lesson {}: {}", row.id, e))?;
        let period = u32::try_from(row.period)
            .map_err(|_| eyre!("Invalid period on lesson {}: {}", row.id, row.period))?;

        let teacher = row.teacher_name.map(|name| TeacherRecord {
            id: row.teacher_id.clone(),
            name,
            contact: row.teacher_contact,
            subject: row.teacher_subject,
        });

        Ok(TimetableSlot {
            id: row.id,
            class_id: row.class_id,
            stream_id: normalize_stream(row.stream_id),
            day,
            period,
            subject: row.subject,
            teacher_id: row.teacher_id,
            teacher,
            start_time: row.start_time,
            end_time: row.end_time,
        })
    }
}
