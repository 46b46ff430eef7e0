//! SQLite persistence layer for student registration.
//!
//! Provides schema creation with seed data, lookup queries, enrollment
//! mutations, and an owned store handle, backed by SQLite (via rusqlite with
//! bundled feature).

pub mod operations;
pub mod queries;
pub mod schema;
pub mod settings;
pub mod store;

pub use operations::{drop_registration, register, register_by_id, OperationError};
pub use queries::{
    find_unresolved_courses, get_course, get_courses_by_name, get_courses_by_student_id,
    get_instructor, get_student, is_enrolled, list_enrollments, table_counts, TableCounts,
};
pub use schema::{create_schema, open_database, open_memory, open_memory_with, SchemaError, SetupOutcome};
pub use settings::{DatabaseSettings, Settings, SettingsError};
pub use store::{Registrar, StoreError};
