//! SQLite schema creation and seed data.

use std::path::Path;

use rusqlite::Connection;
use thiserror::Error;

use crate::settings::Settings;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result of running the setup script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupOutcome {
    /// Tables were created and seeded.
    Created,
    /// Tables already existed; nothing was changed.
    AlreadyInitialized,
}

/// The four registrar tables, in creation order.
pub const TABLES: [&str; 4] = ["Student", "Course", "Instructor", "Student_Course"];

/// Create all tables and insert the seed rows.
///
/// The script runs in a single transaction. If the tables already exist the
/// engine rejects the first `CREATE TABLE`; that conflict is logged, the
/// transaction is rolled back, and [`SetupOutcome::AlreadyInitialized`] is
/// returned so callers keep working against the existing data. This never
/// resets data.
pub fn create_schema(conn: &Connection) -> Result<SetupOutcome, SchemaError> {
    log::info!("Creating registrar tables");
    let tx = conn.unchecked_transaction()?;
    // Seed rows reference tables populated later in the script.
    tx.execute_batch("PRAGMA defer_foreign_keys=ON;")?;
    match tx.execute_batch(SCHEMA_SQL) {
        Ok(()) => {
            tx.commit()?;
            log::info!("Registrar tables created and seeded");
            Ok(SetupOutcome::Created)
        }
        Err(e) if is_already_exists(&e) => {
            log::warn!("Schema already present, keeping existing data: {e}");
            Ok(SetupOutcome::AlreadyInitialized)
        }
        Err(e) => Err(e.into()),
    }
}

fn is_already_exists(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("already exists")
    )
}

/// Open or create a registrar database at the given path.
pub fn open_database(path: &Path, settings: &Settings) -> Result<Connection, SchemaError> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    configure(&conn, settings)?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Open an in-memory database with the seeded schema. Useful for testing.
pub fn open_memory() -> Result<Connection, SchemaError> {
    open_memory_with(&Settings::default())
}

/// Open an in-memory database using the connection options from `settings`.
/// The database path in `settings` is ignored.
pub fn open_memory_with(settings: &Settings) -> Result<Connection, SchemaError> {
    let conn = Connection::open_in_memory()?;
    configure(&conn, settings)?;
    create_schema(&conn)?;
    Ok(conn)
}

fn configure(conn: &Connection, settings: &Settings) -> Result<(), SchemaError> {
    if settings.database.enforce_foreign_keys {
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    } else {
        conn.execute_batch("PRAGMA foreign_keys=OFF;")?;
    }
    Ok(())
}

/// Whether a table with this name exists.
pub fn table_exists(conn: &Connection, name: &str) -> Result<bool, SchemaError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1)",
        [name],
        |row| row.get(0),
    )?;
    Ok(exists)
}

// Duplicate names (instructors 2/6, students 14/17) are intentional fixtures.
const SCHEMA_SQL: &str = r#"
CREATE TABLE Student (
    StudentNum INTEGER PRIMARY KEY,
    FirstName TEXT NOT NULL,
    LastName TEXT NOT NULL
);

CREATE TABLE Course (
    CourseNum INTEGER PRIMARY KEY,
    Name TEXT NOT NULL,
    InstructorNum INTEGER REFERENCES Instructor
);

CREATE TABLE Instructor (
    InstructorNum INTEGER PRIMARY KEY,
    FirstName TEXT NOT NULL,
    LastName TEXT NOT NULL
);

CREATE TABLE Student_Course (
    StudentNum INTEGER NOT NULL,
    CourseNum INTEGER NOT NULL,
    PRIMARY KEY (StudentNum, CourseNum),
    FOREIGN KEY (StudentNum) REFERENCES Student,
    FOREIGN KEY (CourseNum) REFERENCES Course
);

INSERT INTO Student VALUES (1, 'David', 'Oser');
INSERT INTO Student VALUES (2, 'Diana', 'smith');
INSERT INTO Student VALUES (3, 'Sarah', 'Mcarthy');
INSERT INTO Student VALUES (4, 'Chitra', 'Kakkar');
INSERT INTO Student VALUES (5, 'Glenda', 'Pinho');
INSERT INTO Student VALUES (6, 'Eva', 'Mendes');
INSERT INTO Student VALUES (7, 'Mason', 'Elmore');
INSERT INTO Student VALUES (8, 'Yannick', 'Idrissa');
INSERT INTO Student VALUES (9, 'Marian', 'Abshir');
INSERT INTO Student VALUES (10, 'Branden', 'Adams');
INSERT INTO Student VALUES (11, 'Anna', 'Dudda');
INSERT INTO Student VALUES (12, 'Federico', 'Fernandez Diaz');
INSERT INTO Student VALUES (13, 'Joe', 'Lee');
INSERT INTO Student VALUES (14, 'Malcolm', 'Leehan');
INSERT INTO Student VALUES (15, 'Timothy', 'Milligan');
INSERT INTO Student VALUES (16, 'Robert', 'Williams');
INSERT INTO Student VALUES (17, 'Malcolm', 'Leehan');

INSERT INTO Course VALUES (1, 'Capstone', 1);
INSERT INTO Course VALUES (2, 'Java', 2);
INSERT INTO Course VALUES (3, 'C#', 3);
INSERT INTO Course VALUES (4, 'Python', 4);
INSERT INTO Course VALUES (5, 'SQL', 1);
INSERT INTO Course VALUES (6, 'Software Development Capstone', 1);
INSERT INTO Course VALUES (7, 'Microsoft Windows Operating Systems', 5);
INSERT INTO Course VALUES (8, 'Programming Logic and Design', 6);

INSERT INTO Instructor VALUES (1, 'Andy', 'Chrastek');
INSERT INTO Instructor VALUES (2, 'Eric', 'Level');
INSERT INTO Instructor VALUES (3, 'Clara', 'James');
INSERT INTO Instructor VALUES (4, 'Joan', 'Carter');
INSERT INTO Instructor VALUES (5, 'Richard', 'Pollak');
INSERT INTO Instructor VALUES (6, 'Eric', 'Level');

INSERT INTO Student_Course VALUES (4, 5);
INSERT INTO Student_Course VALUES (4, 6);
INSERT INTO Student_Course VALUES (5, 5);
INSERT INTO Student_Course VALUES (5, 6);
INSERT INTO Student_Course VALUES (8, 6);
INSERT INTO Student_Course VALUES (8, 7);
INSERT INTO Student_Course VALUES (7, 6);
INSERT INTO Student_Course VALUES (7, 8);
"#;
