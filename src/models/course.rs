// src/models/course.rs
use serde::Deserialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Course {
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub credits: i64, // 1..=6, enforced by CHECK constraint and form validation
    pub department_id: i64,
    pub instructor_id: Option<i64>,
}

/// Course joined with its department name and (optional) instructor name,
/// for list/detail pages.
#[derive(Debug, Clone, FromRow)]
pub struct CourseListing {
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub credits: i64,
    pub department_id: i64,
    pub department_name: String,
    pub instructor_id: Option<i64>,
    pub instructor_name: Option<String>,
}

/// An instructor's own course with its enrolled-student count.
#[derive(Debug, Clone, FromRow)]
pub struct TaughtCourse {
    pub course_id: i64,
    pub title: String,
    pub credits: i64,
    pub department_name: String,
    pub enrolled_count: i64,
}

/// Form data for course create/edit (POST /courses/new, /courses/{id}/edit).
/// instructor_id stays a String because the "none" select option posts an
/// empty value, which would fail to parse as Option<i64>.
#[derive(Debug, Deserialize)]
pub struct CourseForm {
    pub title: String,
    pub description: String,
    pub credits: i64,
    pub department_id: i64,
    #[serde(default)]
    pub instructor_id: String,
}

impl CourseForm {
    pub fn instructor_id(&self) -> Option<i64> {
        self.instructor_id.trim().parse::<i64>().ok()
    }

    pub fn description(&self) -> Option<&str> {
        let trimmed = self.description.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}
