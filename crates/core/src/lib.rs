//! # SchoolDesk Core
//!
//! Domain types and the timetable engine shared by the API server and the
//! persistence layer.
//!
//! The central piece is [`timetable::TimetableStore`], which owns the lesson
//! slots of every class and stream and refuses any write that would put two
//! lessons in the same `(class, stream, day, period)` cell.
//! [`service::TimetableService`] wraps the store with a persistence backend
//! and applies each mutation optimistically, rolling it back when the backend
//! rejects it.

pub mod errors;
pub mod grid;
pub mod models;
pub mod optimistic;
pub mod service;
pub mod teachers;
pub mod timetable;
