// src/services/instructor_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        course::{Course, TaughtCourse},
        enrollment::{Enrollment, RosterEntry},
        person::{Instructor, Student},
    },
};
use chrono::NaiveDate;
use sqlx::SqlitePool;

pub async fn find_by_user_id(
    db_pool: &SqlitePool,
    user_id: &str,
) -> AppResult<Option<Instructor>> {
    let instructor = sqlx::query_as::<_, Instructor>(
        r#"
        SELECT id, first_name, last_name, email, hire_date, department_id, user_id
        FROM instructors
        WHERE user_id = ?1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db_pool)
    .await?;
    Ok(instructor)
}

/// One-time profile completion. If a profile already exists for the account
/// the existing row wins and nothing is inserted.
pub async fn create_profile(
    db_pool: &SqlitePool,
    user_id: &str,
    email: &str,
    first_name: &str,
    last_name: &str,
    department_id: i64,
    hire_date: NaiveDate,
) -> AppResult<i64> {
    if let Some(existing) = find_by_user_id(db_pool, user_id).await? {
        tracing::debug!("Instructor profile already exists for user {}", user_id);
        return Ok(existing.id);
    }

    tracing::info!("Creating instructor profile for user {}", user_id);
    let result = sqlx::query(
        r#"
        INSERT INTO instructors (first_name, last_name, email, hire_date, department_id, user_id)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(first_name)
    .bind(last_name)
    .bind(email)
    .bind(hire_date)
    .bind(department_id)
    .bind(user_id)
    .execute(db_pool)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Course count plus total enrolled students across the instructor's courses.
pub async fn dashboard_stats(
    db_pool: &SqlitePool,
    instructor_id: i64,
) -> AppResult<(i64, i64)> {
    let course_count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM courses WHERE instructor_id = ?1",
    )
    .bind(instructor_id)
    .fetch_one(db_pool)
    .await?;

    let total_students = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM enrollments e
        JOIN courses c ON c.course_id = e.course_id
        WHERE c.instructor_id = ?1
        "#,
    )
    .bind(instructor_id)
    .fetch_one(db_pool)
    .await?;

    Ok((course_count, total_students))
}

pub async fn taught_courses(
    db_pool: &SqlitePool,
    instructor_id: i64,
) -> AppResult<Vec<TaughtCourse>> {
    let courses = sqlx::query_as::<_, TaughtCourse>(
        r#"
        SELECT c.course_id, c.title, c.credits, d.name AS department_name,
               (SELECT COUNT(*) FROM enrollments e WHERE e.course_id = c.course_id) AS enrolled_count
        FROM courses c
        JOIN departments d ON d.department_id = c.department_id
        WHERE c.instructor_id = ?1
        ORDER BY c.title ASC
        "#,
    )
    .bind(instructor_id)
    .fetch_all(db_pool)
    .await?;
    Ok(courses)
}

/// Fetches a course only when it belongs to the given instructor. The
/// cross-tenant guard for every grading and enrollment action.
pub async fn owned_course(
    db_pool: &SqlitePool,
    instructor_id: i64,
    course_id: i64,
) -> AppResult<Option<Course>> {
    let course = sqlx::query_as::<_, Course>(
        r#"
        SELECT course_id, title, description, credits, department_id, instructor_id
        FROM courses
        WHERE course_id = ?1 AND instructor_id = ?2
        "#,
    )
    .bind(course_id)
    .bind(instructor_id)
    .fetch_optional(db_pool)
    .await?;
    Ok(course)
}

pub async fn course_roster(
    db_pool: &SqlitePool,
    course_id: i64,
) -> AppResult<Vec<RosterEntry>> {
    let roster = sqlx::query_as::<_, RosterEntry>(
        r#"
        SELECT s.id AS student_id, s.first_name, s.last_name, s.email, e.mark
        FROM enrollments e
        JOIN students s ON s.id = e.student_id
        WHERE e.course_id = ?1
        ORDER BY s.last_name ASC, s.first_name ASC
        "#,
    )
    .bind(course_id)
    .fetch_all(db_pool)
    .await?;
    Ok(roster)
}

pub async fn find_enrollment(
    db_pool: &SqlitePool,
    course_id: i64,
    student_id: i64,
) -> AppResult<Option<Enrollment>> {
    let enrollment = sqlx::query_as::<_, Enrollment>(
        r#"
        SELECT student_id, course_id, mark
        FROM enrollments
        WHERE course_id = ?1 AND student_id = ?2
        "#,
    )
    .bind(course_id)
    .bind(student_id)
    .fetch_optional(db_pool)
    .await?;
    Ok(enrollment)
}

/// Sets (or clears) the mark of an enrollment in a course owned by the
/// requesting instructor. Foreign courses and unknown enrollments are both
/// NotFound.
pub async fn update_mark(
    db_pool: &SqlitePool,
    instructor_id: i64,
    course_id: i64,
    student_id: i64,
    mark: Option<f64>,
) -> AppResult<()> {
    if owned_course(db_pool, instructor_id, course_id).await?.is_none() {
        tracing::warn!(
            "Instructor {} tried to grade course {} they do not own.",
            instructor_id,
            course_id
        );
        return Err(AppError::NotFound);
    }

    let rows_affected = sqlx::query(
        r#"
        UPDATE enrollments SET mark = ?1 WHERE course_id = ?2 AND student_id = ?3
        "#,
    )
    .bind(mark)
    .bind(course_id)
    .bind(student_id)
    .execute(db_pool)
    .await?
    .rows_affected();

    if rows_affected == 0 {
        Err(AppError::NotFound)
    } else {
        tracing::info!(
            "✅ Mark for student {} in course {} set to {:?}",
            student_id,
            course_id,
            mark
        );
        Ok(())
    }
}

/// Students not yet enrolled in the course (candidates for enrollment).
pub async fn available_students(
    db_pool: &SqlitePool,
    course_id: i64,
) -> AppResult<Vec<Student>> {
    let students = sqlx::query_as::<_, Student>(
        r#"
        SELECT id, first_name, last_name, email, enrollment_date, user_id
        FROM students
        WHERE id NOT IN (SELECT student_id FROM enrollments WHERE course_id = ?1)
        ORDER BY last_name ASC, first_name ASC
        "#,
    )
    .bind(course_id)
    .fetch_all(db_pool)
    .await?;
    Ok(students)
}

/// Enrolls a student into a course owned by the instructor.
///
/// Guarded by an existence check on the (student, course) pair: enrolling the
/// same pair twice leaves exactly one row and the second call is a no-op.
pub async fn enroll_student(
    db_pool: &SqlitePool,
    instructor_id: i64,
    course_id: i64,
    student_id: i64,
) -> AppResult<()> {
    if owned_course(db_pool, instructor_id, course_id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    if find_enrollment(db_pool, course_id, student_id).await?.is_some() {
        tracing::debug!(
            "Student {} already enrolled in course {}, nothing to do.",
            student_id,
            course_id
        );
        return Ok(());
    }

    sqlx::query(
        "INSERT INTO enrollments (student_id, course_id, mark) VALUES (?1, ?2, NULL)",
    )
    .bind(student_id)
    .bind(course_id)
    .execute(db_pool)
    .await?;

    tracing::info!("✅ Student {} enrolled in course {}", student_id, course_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::memory_pool;

    async fn seed_world(pool: &SqlitePool) -> (i64, i64, i64) {
        let dept = sqlx::query("INSERT INTO departments (name) VALUES ('CS')")
            .execute(pool)
            .await
            .unwrap()
            .last_insert_rowid();

        let instructor = sqlx::query(
            r#"
            INSERT INTO instructors (first_name, last_name, email, hire_date, department_id)
            VALUES ('Grace', 'Hopper', 'grace@xyz.edu.jo', '2020-09-01', ?1)
            "#,
        )
        .bind(dept)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid();

        let course = sqlx::query(
            r#"
            INSERT INTO courses (title, description, credits, department_id, instructor_id)
            VALUES ('Compilers', NULL, 3, ?1, ?2)
            "#,
        )
        .bind(dept)
        .bind(instructor)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid();

        let student = sqlx::query(
            r#"
            INSERT INTO students (first_name, last_name, email, enrollment_date)
            VALUES ('Ada', 'Lovelace', 'ada@xyz.edu.jo', '2024-09-01')
            "#,
        )
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid();

        (instructor, course, student)
    }

    #[tokio::test]
    async fn enrolling_twice_leaves_one_row() {
        let pool = memory_pool().await;
        let (instructor, course, student) = seed_world(&pool).await;

        enroll_student(&pool, instructor, course, student).await.unwrap();
        enroll_student(&pool, instructor, course, student).await.unwrap();

        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM enrollments WHERE course_id = ?1 AND student_id = ?2",
        )
        .bind(course)
        .bind(student)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn grading_a_foreign_course_is_not_found() {
        let pool = memory_pool().await;
        let (instructor, course, student) = seed_world(&pool).await;
        enroll_student(&pool, instructor, course, student).await.unwrap();

        let other = sqlx::query(
            r#"
            INSERT INTO instructors (first_name, last_name, email, hire_date, department_id)
            VALUES ('Alan', 'Turing', 'alan@xyz.edu.jo', '2021-01-15', 1)
            "#,
        )
        .execute(&pool)
        .await
        .unwrap()
        .last_insert_rowid();

        let err = update_mark(&pool, other, course, student, Some(95.0))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound));

        // The owner can grade just fine
        update_mark(&pool, instructor, course, student, Some(95.0))
            .await
            .unwrap();
        let roster = course_roster(&pool, course).await.unwrap();
        assert_eq!(roster[0].mark, Some(95.0));
    }

    #[tokio::test]
    async fn enrolled_students_drop_out_of_the_available_list() {
        let pool = memory_pool().await;
        let (instructor, course, student) = seed_world(&pool).await;

        assert_eq!(available_students(&pool, course).await.unwrap().len(), 1);
        enroll_student(&pool, instructor, course, student).await.unwrap();
        assert!(available_students(&pool, course).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn profile_completion_is_idempotent() {
        let pool = memory_pool().await;
        seed_world(&pool).await;

        sqlx::query("INSERT INTO users (id, email, password_hash) VALUES ('u1', 'h@xyz.edu.jo', 'x')")
            .execute(&pool)
            .await
            .unwrap();

        let date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let first = create_profile(&pool, "u1", "h@xyz.edu.jo", "Edsger", "Dijkstra", 1, date)
            .await
            .unwrap();
        let second = create_profile(&pool, "u1", "h@xyz.edu.jo", "Edsger", "Dijkstra", 1, date)
            .await
            .unwrap();
        assert_eq!(first, second);

        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM instructors WHERE user_id = 'u1'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn dashboard_counts_courses_and_enrollments() {
        let pool = memory_pool().await;
        let (instructor, course, student) = seed_world(&pool).await;
        enroll_student(&pool, instructor, course, student).await.unwrap();

        let (courses, students) = dashboard_stats(&pool, instructor).await.unwrap();
        assert_eq!(courses, 1);
        assert_eq!(students, 1);

        let taught = taught_courses(&pool, instructor).await.unwrap();
        assert_eq!(taught.len(), 1);
        assert_eq!(taught[0].enrolled_count, 1);
    }
}
