//! Owned store handle around a single SQLite connection.
//!
//! A [`Registrar`] is opened once at startup and hands out scoped access to
//! its connection. The connection sits behind a mutex so the handle can be
//! shared between callers; each in-memory store is fully isolated.

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use registrar_catalog::{Course, Enrollment, Instructor, Student};
use rusqlite::Connection;
use thiserror::Error;

use crate::operations::{self, OperationError};
use crate::queries::{self, TableCounts};
use crate::schema::{self, SchemaError, SetupOutcome};
use crate::settings::{self, Settings, SettingsError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

pub struct Registrar {
    conn: Mutex<Connection>,
}

impl Registrar {
    /// Open the database described by `settings` and make sure the schema
    /// exists. Without a configured path the database lives in memory.
    pub fn open(settings: &Settings) -> Result<Self, SchemaError> {
        let conn = match &settings.database.path {
            Some(path) => {
                log::info!("Opening registrar database at {}", path.display());
                schema::open_database(path, settings)?
            }
            None => schema::open_memory_with(settings)?,
        };
        Ok(Self::from_connection(conn))
    }

    /// Open a fresh, seeded in-memory store.
    pub fn open_memory() -> Result<Self, SchemaError> {
        Self::open(&Settings::default())
    }

    /// Load settings from the user's config directory, then [`Registrar::open`].
    pub fn open_from_settings_file() -> Result<Self, StoreError> {
        Self::open_from_settings_path(&settings::settings_path())
    }

    /// Load settings from `path` (missing file means defaults), then
    /// [`Registrar::open`].
    pub fn open_from_settings_path(path: &Path) -> Result<Self, StoreError> {
        let settings = Settings::load_from(path)?;
        Ok(Self::open(&settings)?)
    }

    /// Wrap an already-configured connection. The schema is not touched.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Run `f` with exclusive access to the connection. The lock is released
    /// when `f` returns.
    pub fn with_connection<T>(&self, f: impl FnOnce(&Connection) -> T) -> T {
        let guard = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        f(&*guard)
    }

    pub fn into_connection(self) -> Connection {
        self.conn.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    /// Re-run schema setup. On an initialized database this reports
    /// [`SetupOutcome::AlreadyInitialized`] and changes nothing.
    pub fn setup(&self) -> Result<SetupOutcome, SchemaError> {
        self.with_connection(schema::create_schema)
    }

    pub fn get_student(&self, student_id: i64) -> Result<Option<Student>, OperationError> {
        self.with_connection(|conn| queries::get_student(conn, student_id))
    }

    pub fn get_instructor(&self, instructor_id: i64) -> Result<Option<Instructor>, OperationError> {
        self.with_connection(|conn| queries::get_instructor(conn, instructor_id))
    }

    pub fn get_course(&self, course_id: i64) -> Result<Option<Course>, OperationError> {
        self.with_connection(|conn| queries::get_course(conn, course_id))
    }

    pub fn get_courses_by_name(&self, fragment: &str) -> Result<Vec<Course>, OperationError> {
        self.with_connection(|conn| queries::get_courses_by_name(conn, fragment))
    }

    pub fn get_courses_by_student_id(&self, student_id: i64) -> Result<Vec<Course>, OperationError> {
        self.with_connection(|conn| queries::get_courses_by_student_id(conn, student_id))
    }

    pub fn find_unresolved_courses(&self) -> Result<Vec<i64>, OperationError> {
        self.with_connection(queries::find_unresolved_courses)
    }

    pub fn is_enrolled(&self, student_id: i64, course_id: i64) -> Result<bool, OperationError> {
        self.with_connection(|conn| queries::is_enrolled(conn, student_id, course_id))
    }

    pub fn list_enrollments(&self) -> Result<Vec<Enrollment>, OperationError> {
        self.with_connection(queries::list_enrollments)
    }

    pub fn table_counts(&self) -> Result<TableCounts, OperationError> {
        self.with_connection(queries::table_counts)
    }

    pub fn register(&self, student: &Student, course: &Course) -> Result<(), OperationError> {
        self.with_connection(|conn| operations::register(conn, student, course))
    }

    pub fn register_by_id(&self, student_id: i64, course_id: i64) -> Result<(), OperationError> {
        self.with_connection(|conn| operations::register_by_id(conn, student_id, course_id))
    }

    pub fn drop_registration(&self, student_id: i64, course_id: i64) -> Result<bool, OperationError> {
        self.with_connection(|conn| operations::drop_registration(conn, student_id, course_id))
    }
}
