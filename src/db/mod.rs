//! Database module: models, schema and queries for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: pool handle and per-request transactions
//! - `roster.rs`, `attendance.rs`, `grades.rs`, `users.rs`: queries per area

pub mod attendance;
pub mod grades;
pub mod models;
pub mod roster;
pub mod schema;
pub mod sqlite;
pub mod users;

pub use models::{
    AttendanceStatus, DbAssessment, DbAttendanceRecord, DbClassSession, DbCourse, DbEnrollment,
    DbScore, DbStudent, DbUser, Role,
};
pub use schema::SQLITE_INIT;
pub use sqlite::{SqlitePool, Storage};
