pub mod health;
pub mod teacher;
pub mod timetable;
