// src/models/enrollment.rs
use sqlx::FromRow;

/// Bridge row between students and courses. Composite primary key
/// (student_id, course_id) guarantees at most one row per pair.
#[derive(Debug, Clone, FromRow)]
pub struct Enrollment {
    pub student_id: i64,
    pub course_id: i64,
    pub mark: Option<f64>, // 0..=100 once graded
}

/// One line of an instructor's course roster.
#[derive(Debug, Clone, FromRow)]
pub struct RosterEntry {
    pub student_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mark: Option<f64>,
}

impl RosterEntry {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A student's enrollment joined with course, department and instructor
/// details, as shown on My Courses / My GPA.
#[derive(Debug, Clone, FromRow)]
pub struct EnrolledCourse {
    pub course_id: i64,
    pub title: String,
    pub credits: i64,
    pub department_name: String,
    pub instructor_name: Option<String>,
    pub mark: Option<f64>,
}
