// src/services/course_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{course::{Course, CourseListing}, department::Department, person::Instructor},
};
use sqlx::SqlitePool;

pub const MIN_CREDITS: i64 = 1;
pub const MAX_CREDITS: i64 = 6;

const LISTING_QUERY: &str = r#"
    SELECT c.course_id, c.title, c.description, c.credits,
           c.department_id, d.name AS department_name,
           c.instructor_id,
           CASE WHEN i.id IS NULL THEN NULL
                ELSE i.first_name || ' ' || i.last_name
           END AS instructor_name
    FROM courses c
    JOIN departments d ON d.department_id = c.department_id
    LEFT JOIN instructors i ON i.id = c.instructor_id
"#;

/// All courses with resolved department and instructor names.
pub async fn list_courses(db_pool: &SqlitePool) -> AppResult<Vec<CourseListing>> {
    tracing::debug!("Fetching course listing...");
    let sql = format!("{LISTING_QUERY} ORDER BY c.title ASC");
    let courses = sqlx::query_as::<_, CourseListing>(&sql)
        .fetch_all(db_pool)
        .await?;
    Ok(courses)
}

pub async fn find_course(db_pool: &SqlitePool, course_id: i64) -> AppResult<Option<Course>> {
    let course = sqlx::query_as::<_, Course>(
        r#"
        SELECT course_id, title, description, credits, department_id, instructor_id
        FROM courses
        WHERE course_id = ?1
        "#,
    )
    .bind(course_id)
    .fetch_optional(db_pool)
    .await?;
    Ok(course)
}

pub async fn find_course_listing(
    db_pool: &SqlitePool,
    course_id: i64,
) -> AppResult<Option<CourseListing>> {
    let sql = format!("{LISTING_QUERY} WHERE c.course_id = ?1");
    let course = sqlx::query_as::<_, CourseListing>(&sql)
        .bind(course_id)
        .fetch_optional(db_pool)
        .await?;
    Ok(course)
}

pub async fn create_course(
    db_pool: &SqlitePool,
    title: &str,
    description: Option<&str>,
    credits: i64,
    department_id: i64,
    instructor_id: Option<i64>,
) -> AppResult<i64> {
    tracing::info!("Creating course '{}' ({} credits)", title, credits);
    let result = sqlx::query(
        r#"
        INSERT INTO courses (title, description, credits, department_id, instructor_id)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(title)
    .bind(description)
    .bind(credits)
    .bind(department_id)
    .bind(instructor_id)
    .execute(db_pool)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Updates a course; a concurrently-deleted course surfaces as NotFound
/// (existence check via rows_affected, no merge).
pub async fn update_course(
    db_pool: &SqlitePool,
    course_id: i64,
    title: &str,
    description: Option<&str>,
    credits: i64,
    department_id: i64,
    instructor_id: Option<i64>,
) -> AppResult<()> {
    tracing::info!("Updating course {}", course_id);
    let rows_affected = sqlx::query(
        r#"
        UPDATE courses
        SET title = ?1, description = ?2, credits = ?3,
            department_id = ?4, instructor_id = ?5
        WHERE course_id = ?6
        "#,
    )
    .bind(title)
    .bind(description)
    .bind(credits)
    .bind(department_id)
    .bind(instructor_id)
    .bind(course_id)
    .execute(db_pool)
    .await?
    .rows_affected();

    if rows_affected == 0 {
        tracing::warn!("Update failed: course {} not found.", course_id);
        Err(AppError::NotFound)
    } else {
        Ok(())
    }
}

pub async fn delete_course(db_pool: &SqlitePool, course_id: i64) -> AppResult<()> {
    tracing::info!("Deleting course {}", course_id);
    let rows_affected = sqlx::query("DELETE FROM courses WHERE course_id = ?1")
        .bind(course_id)
        .execute(db_pool)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        Err(AppError::NotFound)
    } else {
        Ok(())
    }
}

// --- Reference data for the course forms ---

pub async fn list_departments(db_pool: &SqlitePool) -> AppResult<Vec<Department>> {
    let departments = sqlx::query_as::<_, Department>(
        "SELECT department_id, name FROM departments ORDER BY name ASC",
    )
    .fetch_all(db_pool)
    .await?;
    Ok(departments)
}

pub async fn list_instructors(db_pool: &SqlitePool) -> AppResult<Vec<Instructor>> {
    let instructors = sqlx::query_as::<_, Instructor>(
        r#"
        SELECT id, first_name, last_name, email, hire_date, department_id, user_id
        FROM instructors
        ORDER BY last_name ASC, first_name ASC
        "#,
    )
    .fetch_all(db_pool)
    .await?;
    Ok(instructors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::memory_pool;

    async fn department(pool: &SqlitePool, name: &str) -> i64 {
        sqlx::query("INSERT INTO departments (name) VALUES (?1)")
            .bind(name)
            .execute(pool)
            .await
            .unwrap()
            .last_insert_rowid()
    }

    #[tokio::test]
    async fn create_and_list_resolves_department_name() {
        let pool = memory_pool().await;
        let dept = department(&pool, "Computer Science").await;

        let id = create_course(&pool, "Databases", Some("Intro to SQL"), 3, dept, None)
            .await
            .unwrap();

        let listing = find_course_listing(&pool, id).await.unwrap().unwrap();
        assert_eq!(listing.department_name, "Computer Science");
        assert_eq!(listing.credits, 3);
        assert!(listing.instructor_name.is_none());
        assert_eq!(list_courses(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn updating_a_deleted_course_is_not_found() {
        let pool = memory_pool().await;
        let dept = department(&pool, "Mathematics").await;
        let id = create_course(&pool, "Calculus", None, 4, dept, None)
            .await
            .unwrap();

        delete_course(&pool, id).await.unwrap();

        let err = update_course(&pool, id, "Calculus II", None, 4, dept, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn credits_outside_range_are_rejected_by_the_schema() {
        let pool = memory_pool().await;
        let dept = department(&pool, "Physics").await;

        let result = create_course(&pool, "Bogus", None, 7, dept, None).await;
        assert!(result.is_err());
    }
}
