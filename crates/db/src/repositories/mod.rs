pub mod teacher;
pub mod timetable;
