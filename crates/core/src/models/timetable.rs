use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::period::hhmm;
use super::teacher::TeacherRecord;

/// Teaching days, in week order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SchoolDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl SchoolDay {
    pub const ALL: [SchoolDay; 5] = [
        SchoolDay::Monday,
        SchoolDay::Tuesday,
        SchoolDay::Wednesday,
        SchoolDay::Thursday,
        SchoolDay::Friday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SchoolDay::Monday => "Monday",
            SchoolDay::Tuesday => "Tuesday",
            SchoolDay::Wednesday => "Wednesday",
            SchoolDay::Thursday => "Thursday",
            SchoolDay::Friday => "Friday",
        }
    }

    /// Zero-based column in a Monday..Friday grid.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for SchoolDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchoolDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SchoolDay::ALL
            .into_iter()
            .find(|day| day.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown school day: {s}"))
    }
}

/// The cell a lesson occupies. At most one slot may hold a given key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotKey {
    pub class_id: String,
    pub stream_id: Option<String>,
    pub day: SchoolDay,
    pub period: u32,
}

impl SlotKey {
    pub fn new(
        class_id: impl Into<String>,
        stream_id: Option<String>,
        day: SchoolDay,
        period: u32,
    ) -> Self {
        Self {
            class_id: class_id.into().trim().to_string(),
            stream_id: normalize_stream(stream_id),
            day,
            period,
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class {}", self.class_id)?;
        if let Some(stream) = &self.stream_id {
            write!(f, " stream {stream}")?;
        }
        write!(f, ", {} period {}", self.day, self.period)
    }
}

/// One scheduled lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableSlot {
    pub id: Uuid,
    pub class_id: String,
    pub stream_id: Option<String>,
    pub day: SchoolDay,
    pub period: u32,
    pub subject: String,
    pub teacher_id: String,
    /// Snapshot taken when the teacher was assigned. May be stale.
    pub teacher: Option<TeacherRecord>,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
}

impl TimetableSlot {
    pub fn key(&self) -> SlotKey {
        SlotKey {
            class_id: self.class_id.clone(),
            stream_id: self.stream_id.clone(),
            day: self.day,
            period: self.period,
        }
    }

    pub fn occupies(&self, key: &SlotKey) -> bool {
        self.class_id == key.class_id
            && self.stream_id == key.stream_id
            && self.day == key.day
            && self.period == key.period
    }
}

/// Payload for creating a slot. The store assigns `id` and resolves `teacher`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSlot {
    pub class_id: String,
    #[serde(default)]
    pub stream_id: Option<String>,
    pub day: SchoolDay,
    pub period: u32,
    pub subject: String,
    pub teacher_id: String,
    #[serde(default, with = "hhmm::option")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "hhmm::option")]
    pub end_time: Option<NaiveTime>,
}

impl NewSlot {
    pub fn key(&self) -> SlotKey {
        SlotKey::new(self.class_id.clone(), self.stream_id.clone(), self.day, self.period)
    }
}

/// Partial update. `stream_id` distinguishes "leave unchanged" (absent) from
/// "clear the stream" (`null`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub stream_id: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<SchoolDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<String>,
    #[serde(
        default,
        with = "hhmm::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_time: Option<NaiveTime>,
    #[serde(
        default,
        with = "hhmm::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time: Option<NaiveTime>,
}

impl SlotChanges {
    pub fn is_empty(&self) -> bool {
        self == &SlotChanges::default()
    }
}

fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Empty or blank stream ids mean "no stream".
pub fn normalize_stream(stream_id: Option<String>) -> Option<String> {
    stream_id
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotQuery {
    pub class_id: Option<String>,
    pub stream_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictQuery {
    pub day: SchoolDay,
    pub period: u32,
    pub class_id: Option<String>,
    pub stream_id: Option<String>,
    pub exclude_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictResponse {
    pub conflict: bool,
    pub existing: Option<TimetableSlot>,
}
