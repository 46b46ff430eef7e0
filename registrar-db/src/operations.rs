//! Enrollment mutations.
//!
//! Every statement runs in SQLite's auto-commit mode, so each successful
//! call is committed before it returns.

use registrar_catalog::{Course, Student};
use rusqlite::{ffi, params, Connection};
use thiserror::Error;

use crate::queries::{get_course, get_student};

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Entity not found: {entity_type} with id '{id}'")]
    NotFound { entity_type: String, id: String },
    #[error("Student {student_id} is already enrolled in course {course_id}")]
    AlreadyEnrolled { student_id: i64, course_id: i64 },
    #[error("Enrollment ({student_id}, {course_id}) references a missing student or course")]
    DanglingReference { student_id: i64, course_id: i64 },
}

// ── Register ────────────────────────────────────────────────────────────────

/// Enroll `student` in `course`. Only the ids of the records are used.
///
/// A pair that is already enrolled fails with
/// [`OperationError::AlreadyEnrolled`] and leaves the existing row alone.
/// With foreign-key enforcement on, ids that do not resolve fail with
/// [`OperationError::DanglingReference`].
pub fn register(
    conn: &Connection,
    student: &Student,
    course: &Course,
) -> Result<(), OperationError> {
    let (student_id, course_id) = (student.id, course.id);
    let result = conn.execute(
        "INSERT INTO Student_Course (StudentNum, CourseNum) VALUES (?1, ?2)",
        params![student_id, course_id],
    );
    match result {
        Ok(_) => {
            log::debug!("Registered student {student_id} in course {course_id}");
            Ok(())
        }
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            log::warn!("Student {student_id} is already enrolled in course {course_id}");
            Err(OperationError::AlreadyEnrolled {
                student_id,
                course_id,
            })
        }
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.extended_code == ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
        {
            log::warn!("Enrollment ({student_id}, {course_id}) rejected: missing student or course");
            Err(OperationError::DanglingReference {
                student_id,
                course_id,
            })
        }
        Err(e) => Err(e.into()),
    }
}

/// Resolve both ids, then [`register`].
///
/// Fails with [`OperationError::NotFound`] if the student does not exist or
/// the course cannot be loaded with its instructor.
pub fn register_by_id(
    conn: &Connection,
    student_id: i64,
    course_id: i64,
) -> Result<(), OperationError> {
    let student = get_student(conn, student_id)?.ok_or_else(|| OperationError::NotFound {
        entity_type: "student".to_string(),
        id: student_id.to_string(),
    })?;
    let course = get_course(conn, course_id)?.ok_or_else(|| OperationError::NotFound {
        entity_type: "course".to_string(),
        id: course_id.to_string(),
    })?;
    register(conn, &student, &course)
}

// ── Drop ────────────────────────────────────────────────────────────────────

/// Remove a student's enrollment in a course.
///
/// Returns `true` if a row was deleted. Dropping a pair that was never
/// enrolled is not an error and returns `false`.
pub fn drop_registration(
    conn: &Connection,
    student_id: i64,
    course_id: i64,
) -> Result<bool, OperationError> {
    let removed = conn.execute(
        "DELETE FROM Student_Course WHERE CourseNum = ?1 AND StudentNum = ?2",
        params![course_id, student_id],
    )?;
    if removed == 0 {
        log::debug!("No enrollment ({student_id}, {course_id}) to drop");
    }
    Ok(removed > 0)
}
