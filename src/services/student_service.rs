// src/services/student_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{card::StudentCard, enrollment::EnrolledCourse, person::Student},
};
use chrono::{Months, NaiveDate};
use sqlx::SqlitePool;

pub async fn find_by_user_id(db_pool: &SqlitePool, user_id: &str) -> AppResult<Option<Student>> {
    let student = sqlx::query_as::<_, Student>(
        r#"
        SELECT id, first_name, last_name, email, enrollment_date, user_id
        FROM students
        WHERE user_id = ?1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db_pool)
    .await?;
    Ok(student)
}

/// One-time profile completion, mirroring the instructor flow.
pub async fn create_profile(
    db_pool: &SqlitePool,
    user_id: &str,
    email: &str,
    first_name: &str,
    last_name: &str,
    enrollment_date: NaiveDate,
) -> AppResult<i64> {
    if let Some(existing) = find_by_user_id(db_pool, user_id).await? {
        tracing::debug!("Student profile already exists for user {}", user_id);
        return Ok(existing.id);
    }

    tracing::info!("Creating student profile for user {}", user_id);
    let result = sqlx::query(
        r#"
        INSERT INTO students (first_name, last_name, email, enrollment_date, user_id)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(first_name)
    .bind(last_name)
    .bind(email)
    .bind(enrollment_date)
    .bind(user_id)
    .execute(db_pool)
    .await?;
    Ok(result.last_insert_rowid())
}

/// The student's enrollments with course, department and instructor details.
pub async fn enrolled_courses(
    db_pool: &SqlitePool,
    student_id: i64,
) -> AppResult<Vec<EnrolledCourse>> {
    let courses = sqlx::query_as::<_, EnrolledCourse>(
        r#"
        SELECT c.course_id, c.title, c.credits, d.name AS department_name,
               CASE WHEN i.id IS NULL THEN NULL
                    ELSE i.first_name || ' ' || i.last_name
               END AS instructor_name,
               e.mark
        FROM enrollments e
        JOIN courses c ON c.course_id = e.course_id
        JOIN departments d ON d.department_id = c.department_id
        LEFT JOIN instructors i ON i.id = c.instructor_id
        WHERE e.student_id = ?1
        ORDER BY c.title ASC
        "#,
    )
    .bind(student_id)
    .fetch_all(db_pool)
    .await?;
    Ok(courses)
}

// --- GPA ---

/// Converts a 0-100 mark to a 0.0-4.0 grade point on the fixed scale.
pub fn grade_point(mark: f64) -> f64 {
    match mark {
        m if m >= 90.0 => 4.0,
        m if m >= 85.0 => 3.7,
        m if m >= 80.0 => 3.3,
        m if m >= 75.0 => 3.0,
        m if m >= 70.0 => 2.7,
        m if m >= 65.0 => 2.3,
        m if m >= 60.0 => 2.0,
        m if m >= 55.0 => 1.7,
        m if m >= 50.0 => 1.0,
        _ => 0.0,
    }
}

/// Credit-weighted GPA over the graded enrollments, rounded to 2 decimal
/// places. 0 when no course has a mark yet.
pub fn gpa(courses: &[EnrolledCourse]) -> f64 {
    let mut total_points = 0.0;
    let mut total_credits: i64 = 0;

    for course in courses {
        if let Some(mark) = course.mark {
            total_points += grade_point(mark) * course.credits as f64;
            total_credits += course.credits;
        }
    }

    if total_credits == 0 {
        return 0.0;
    }
    (total_points / total_credits as f64 * 100.0).round() / 100.0
}

// --- Student card ---

pub async fn find_card(db_pool: &SqlitePool, student_id: i64) -> AppResult<Option<StudentCard>> {
    let card = sqlx::query_as::<_, StudentCard>(
        r#"
        SELECT student_id, card_number, issue_date, expiry_date, is_active
        FROM student_cards
        WHERE student_id = ?1
        "#,
    )
    .bind(student_id)
    .fetch_optional(db_pool)
    .await?;
    Ok(card)
}

/// Issues the student's card exactly once.
///
/// Card number is derived (STU-YYYYMMDD-NNNN, NNNN = zero-padded student id),
/// expiry is one year after issue, and the card starts active. When a card
/// already exists it is returned untouched, so a second issuance attempt is
/// a no-op.
pub async fn issue_card(
    db_pool: &SqlitePool,
    student_id: i64,
    issue_date: NaiveDate,
) -> AppResult<StudentCard> {
    if let Some(existing) = find_card(db_pool, student_id).await? {
        tracing::debug!("Student {} already has a card, not re-issuing.", student_id);
        return Ok(existing);
    }

    let card_number = format!("STU-{}-{:04}", issue_date.format("%Y%m%d"), student_id);
    let expiry_date = issue_date
        .checked_add_months(Months::new(12))
        .unwrap_or(issue_date);

    sqlx::query(
        r#"
        INSERT INTO student_cards (student_id, card_number, issue_date, expiry_date, is_active)
        VALUES (?1, ?2, ?3, ?4, 1)
        "#,
    )
    .bind(student_id)
    .bind(&card_number)
    .bind(issue_date)
    .bind(expiry_date)
    .execute(db_pool)
    .await?;

    tracing::info!("✅ Card {} issued to student {}", card_number, student_id);
    Ok(StudentCard {
        student_id,
        card_number,
        issue_date,
        expiry_date,
        is_active: true,
    })
}

/// Toggles the active flag; the only field a student may edit.
pub async fn set_card_active(
    db_pool: &SqlitePool,
    student_id: i64,
    is_active: bool,
) -> AppResult<()> {
    let rows_affected = sqlx::query(
        "UPDATE student_cards SET is_active = ?1 WHERE student_id = ?2",
    )
    .bind(is_active)
    .bind(student_id)
    .execute(db_pool)
    .await?
    .rows_affected();

    if rows_affected == 0 {
        Err(AppError::NotFound)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::memory_pool;

    fn course(credits: i64, mark: Option<f64>) -> EnrolledCourse {
        EnrolledCourse {
            course_id: 1,
            title: "Test".to_string(),
            credits,
            department_name: "CS".to_string(),
            instructor_name: None,
            mark,
        }
    }

    #[test]
    fn grade_point_scale_boundaries() {
        assert_eq!(grade_point(100.0), 4.0);
        assert_eq!(grade_point(90.0), 4.0);
        assert_eq!(grade_point(89.9), 3.7);
        assert_eq!(grade_point(85.0), 3.7);
        assert_eq!(grade_point(80.0), 3.3);
        assert_eq!(grade_point(75.0), 3.0);
        assert_eq!(grade_point(70.0), 2.7);
        assert_eq!(grade_point(65.0), 2.3);
        assert_eq!(grade_point(60.0), 2.0);
        assert_eq!(grade_point(55.0), 1.7);
        assert_eq!(grade_point(50.0), 1.0);
        assert_eq!(grade_point(49.9), 0.0);
        assert_eq!(grade_point(0.0), 0.0);
    }

    #[test]
    fn gpa_of_a_perfect_mark_is_four_regardless_of_credits() {
        assert_eq!(gpa(&[course(1, Some(100.0))]), 4.0);
        assert_eq!(gpa(&[course(6, Some(100.0))]), 4.0);
    }

    #[test]
    fn gpa_with_no_enrollments_is_zero() {
        assert_eq!(gpa(&[]), 0.0);
        // ungraded courses do not count either
        assert_eq!(gpa(&[course(3, None)]), 0.0);
    }

    #[test]
    fn gpa_is_credit_weighted_and_rounded() {
        // marks 90 & 50, credits 3 & 3 -> (4.0*3 + 1.0*3) / 6 = 2.50
        let courses = [course(3, Some(90.0)), course(3, Some(50.0))];
        assert_eq!(gpa(&courses), 2.5);

        // uneven credits: (4.0*4 + 1.0*2) / 6 = 3.0
        let courses = [course(4, Some(90.0)), course(2, Some(50.0))];
        assert_eq!(gpa(&courses), 3.0);

        // rounding: (4.0*3 + 3.7*3 + 1.0*3) / 9 = 2.9
        let courses = [
            course(3, Some(95.0)),
            course(3, Some(85.0)),
            course(3, Some(50.0)),
        ];
        assert_eq!(gpa(&courses), 2.9);
    }

    async fn seed_student(pool: &SqlitePool) -> i64 {
        sqlx::query(
            r#"
            INSERT INTO students (first_name, last_name, email, enrollment_date)
            VALUES ('Ada', 'Lovelace', 'ada@xyz.edu.jo', '2024-09-01')
            "#,
        )
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
    }

    #[tokio::test]
    async fn card_issuance_is_idempotent() {
        let pool = memory_pool().await;
        let student = seed_student(&pool).await;
        let date = NaiveDate::from_ymd_opt(2025, 9, 15).unwrap();

        let first = issue_card(&pool, student, date).await.unwrap();
        assert_eq!(first.card_number, format!("STU-20250915-{:04}", student));
        assert_eq!(first.expiry_date, NaiveDate::from_ymd_opt(2026, 9, 15).unwrap());
        assert!(first.is_active);

        // Second attempt on a later day: no-op, fields unchanged
        let later = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
        let second = issue_card(&pool, student, later).await.unwrap();
        assert_eq!(second.card_number, first.card_number);
        assert_eq!(second.issue_date, first.issue_date);
        assert_eq!(second.expiry_date, first.expiry_date);

        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM student_cards")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn card_active_flag_can_be_toggled() {
        let pool = memory_pool().await;
        let student = seed_student(&pool).await;
        let date = NaiveDate::from_ymd_opt(2025, 9, 15).unwrap();
        issue_card(&pool, student, date).await.unwrap();

        set_card_active(&pool, student, false).await.unwrap();
        let card = find_card(&pool, student).await.unwrap().unwrap();
        assert!(!card.is_active);

        // toggling a card that does not exist is NotFound
        let err = set_card_active(&pool, student + 1, true).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn profile_completion_is_idempotent() {
        let pool = memory_pool().await;
        sqlx::query("INSERT INTO users (id, email, password_hash) VALUES ('u1', 's@xyz.edu.jo', 'x')")
            .execute(&pool)
            .await
            .unwrap();

        let date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let first = create_profile(&pool, "u1", "s@xyz.edu.jo", "Ada", "Lovelace", date)
            .await
            .unwrap();
        let second = create_profile(&pool, "u1", "s@xyz.edu.jo", "Ada", "Lovelace", date)
            .await
            .unwrap();
        assert_eq!(first, second);
    }
}
