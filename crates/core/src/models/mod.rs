pub mod period;
pub mod teacher;
pub mod timetable;
