//! Data model types for the registration catalog.
//!
//! These mirror the four persistent tables: students, instructors, courses,
//! and the student/course enrollment association.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Student ─────────────────────────────────────────────────────────────────

/// A student row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

impl Student {
    pub fn new(id: i64, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

// ── Instructor ──────────────────────────────────────────────────────────────

/// An instructor row. Instructors only ever come from seed data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructor {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

impl Instructor {
    pub fn new(id: i64, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl fmt::Display for Instructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

// ── Course ──────────────────────────────────────────────────────────────────

/// A course with its instructor resolved.
///
/// The database stores only the instructor's id; a loaded `Course` always
/// carries the full `Instructor` record by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub instructor: Instructor,
}

impl Course {
    pub fn new(id: i64, name: impl Into<String>, instructor: Instructor) -> Self {
        Self {
            id,
            name: name.into(),
            instructor,
        }
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.instructor)
    }
}

// ── Enrollment ──────────────────────────────────────────────────────────────

/// A student/course association. The pair is the composite key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Enrollment {
    pub student_id: i64,
    pub course_id: i64,
}

impl Enrollment {
    pub fn new(student_id: i64, course_id: i64) -> Self {
        Self {
            student_id,
            course_id,
        }
    }
}
