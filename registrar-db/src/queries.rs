//! Read queries for the registrar database.
//!
//! Course lookups use an inner join against `Instructor`, so a course whose
//! instructor reference is NULL or dangling is reported as missing.
//! [`find_unresolved_courses`] lists those rows.

use registrar_catalog::{Course, Enrollment, Instructor, Student};
use rusqlite::{params, Connection, Row};

use crate::operations::OperationError;

// ── Student / Instructor Lookups ────────────────────────────────────────────

/// Find a student by id.
pub fn get_student(conn: &Connection, student_id: i64) -> Result<Option<Student>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT StudentNum, FirstName, LastName FROM Student WHERE StudentNum = ?1",
    )?;
    let result = stmt.query_row(params![student_id], |row| {
        Ok(Student {
            id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
        })
    });
    match result {
        Ok(s) => Ok(Some(s)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Find an instructor by id.
pub fn get_instructor(
    conn: &Connection,
    instructor_id: i64,
) -> Result<Option<Instructor>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT InstructorNum, FirstName, LastName FROM Instructor WHERE InstructorNum = ?1",
    )?;
    let result = stmt.query_row(params![instructor_id], |row| {
        Ok(Instructor {
            id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
        })
    });
    match result {
        Ok(i) => Ok(Some(i)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// ── Course Lookups ──────────────────────────────────────────────────────────

/// Find a course by id, with its instructor resolved.
pub fn get_course(conn: &Connection, course_id: i64) -> Result<Option<Course>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT Course.CourseNum, Course.Name, Course.InstructorNum,
                Instructor.FirstName, Instructor.LastName
         FROM Course
         JOIN Instructor ON Course.InstructorNum = Instructor.InstructorNum
         WHERE Course.CourseNum = ?1",
    )?;
    match stmt.query_row(params![course_id], row_to_course) {
        Ok(c) => Ok(Some(c)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Find courses whose name contains `fragment`, ignoring case.
///
/// The fragment is matched literally (`%` and `_` are not wildcards). An
/// empty fragment returns every course with a resolvable instructor.
/// Results are ordered by course id.
pub fn get_courses_by_name(
    conn: &Connection,
    fragment: &str,
) -> Result<Vec<Course>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT Course.CourseNum, Course.Name, Course.InstructorNum,
                Instructor.FirstName, Instructor.LastName
         FROM Course
         JOIN Instructor ON Course.InstructorNum = Instructor.InstructorNum
         WHERE UPPER(Course.Name) LIKE '%' || UPPER(?1) || '%' ESCAPE '\\'
         ORDER BY Course.CourseNum",
    )?;
    let rows = stmt.query_map(params![escape_like(fragment)], row_to_course)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// List the courses a student is enrolled in, in enrollment order.
///
/// Each course is loaded through [`get_course`]; enrollments whose course
/// cannot be resolved are skipped.
pub fn get_courses_by_student_id(
    conn: &Connection,
    student_id: i64,
) -> Result<Vec<Course>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT CourseNum FROM Student_Course WHERE StudentNum = ?1 ORDER BY rowid",
    )?;
    let course_ids = stmt
        .query_map(params![student_id], |row| row.get::<_, i64>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut courses = Vec::with_capacity(course_ids.len());
    for course_id in course_ids {
        match get_course(conn, course_id)? {
            Some(course) => courses.push(course),
            None => log::debug!(
                "Student {student_id} is enrolled in unresolvable course {course_id}, skipping"
            ),
        }
    }
    Ok(courses)
}

/// Ids of courses whose instructor reference is NULL or points nowhere.
pub fn find_unresolved_courses(conn: &Connection) -> Result<Vec<i64>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT Course.CourseNum
         FROM Course
         LEFT JOIN Instructor ON Course.InstructorNum = Instructor.InstructorNum
         WHERE Instructor.InstructorNum IS NULL
         ORDER BY Course.CourseNum",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, i64>(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Enrollment Queries ──────────────────────────────────────────────────────

/// Whether the (student, course) pair is enrolled.
pub fn is_enrolled(
    conn: &Connection,
    student_id: i64,
    course_id: i64,
) -> Result<bool, OperationError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM Student_Course WHERE StudentNum = ?1 AND CourseNum = ?2)",
        params![student_id, course_id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// All enrollments, in insertion order.
pub fn list_enrollments(conn: &Connection) -> Result<Vec<Enrollment>, OperationError> {
    let mut stmt =
        conn.prepare("SELECT StudentNum, CourseNum FROM Student_Course ORDER BY rowid")?;
    let rows = stmt.query_map([], |row| {
        Ok(Enrollment {
            student_id: row.get(0)?,
            course_id: row.get(1)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Stats ───────────────────────────────────────────────────────────────────

/// Row counts for each table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub students: i64,
    pub instructors: i64,
    pub courses: i64,
    pub enrollments: i64,
}

pub fn table_counts(conn: &Connection) -> Result<TableCounts, OperationError> {
    let count = |sql: &str| -> Result<i64, rusqlite::Error> {
        conn.query_row(sql, [], |row| row.get(0))
    };
    Ok(TableCounts {
        students: count("SELECT COUNT(*) FROM Student")?,
        instructors: count("SELECT COUNT(*) FROM Instructor")?,
        courses: count("SELECT COUNT(*) FROM Course")?,
        enrollments: count("SELECT COUNT(*) FROM Student_Course")?,
    })
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn row_to_course(row: &Row<'_>) -> rusqlite::Result<Course> {
    Ok(Course {
        id: row.get(0)?,
        name: row.get(1)?,
        instructor: Instructor {
            id: row.get(2)?,
            first_name: row.get(3)?,
            last_name: row.get(4)?,
        },
    })
}

/// Escape LIKE metacharacters so the input matches literally (`ESCAPE '\'`).
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
