// src/services/user_service.rs
use crate::{
    error::{AppError, AppResult},
    models::user::User,
};
use sqlx::SqlitePool;
use uuid::Uuid;

pub const ROLE_ADMIN: &str = "Admin";
pub const ROLE_INSTRUCTOR: &str = "Instructor";
pub const ROLE_STUDENT: &str = "Student";

/// Roles an admin may hand out through the set-role screen. Admin itself is
/// deliberately excluded from this path.
pub const ASSIGNABLE_ROLES: &[&str] = &[ROLE_STUDENT, ROLE_INSTRUCTOR];

pub async fn find_user_by_id(db_pool: &SqlitePool, user_id: &str) -> AppResult<Option<User>> {
    tracing::debug!("Looking up user by id: {}", user_id);
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, created_at
        FROM users
        WHERE id = ?1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db_pool)
    .await?;
    Ok(user)
}

pub async fn find_user_by_email(db_pool: &SqlitePool, email: &str) -> AppResult<Option<User>> {
    tracing::debug!("Looking up user by email: {}", email);
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, created_at
        FROM users
        WHERE email = ?1
        "#,
    )
    .bind(email)
    .fetch_optional(db_pool)
    .await?;
    Ok(user)
}

pub async fn find_all_users(db_pool: &SqlitePool) -> AppResult<Vec<User>> {
    tracing::debug!("Fetching all users...");
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, created_at
        FROM users
        ORDER BY email ASC
        "#,
    )
    .fetch_all(db_pool)
    .await?;
    tracing::debug!("Found {} users.", users.len());
    Ok(users)
}

/// Roles currently held by a user.
pub async fn get_user_roles(db_pool: &SqlitePool, user_id: &str) -> AppResult<Vec<String>> {
    let roles = sqlx::query_scalar::<_, String>(
        r#"
        SELECT role FROM user_roles WHERE user_id = ?1 ORDER BY role ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db_pool)
    .await?;
    Ok(roles)
}

pub async fn user_has_role(db_pool: &SqlitePool, user_id: &str, role: &str) -> AppResult<bool> {
    let roles = get_user_roles(db_pool, user_id).await?;
    Ok(roles.iter().any(|r| r.eq_ignore_ascii_case(role)))
}

/// Names of every role in the catalogue (for the set-role screen).
pub async fn list_role_names(db_pool: &SqlitePool) -> AppResult<Vec<String>> {
    let roles = sqlx::query_scalar::<_, String>("SELECT name FROM roles ORDER BY name ASC")
        .fetch_all(db_pool)
        .await?;
    Ok(roles)
}

pub async fn count_users(db_pool: &SqlitePool) -> AppResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(db_pool)
        .await?;
    Ok(count)
}

pub async fn count_roles(db_pool: &SqlitePool) -> AppResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM roles")
        .fetch_one(db_pool)
        .await?;
    Ok(count)
}

/// Creates an account with no roles and returns its generated id.
/// The caller is expected to have checked the email for duplicates; a race
/// still surfaces as a database UNIQUE violation.
pub async fn create_user(db_pool: &SqlitePool, email: &str, raw_password: &str) -> AppResult<String> {
    tracing::info!("Creating account for: {}", email);
    let password_hash = crate::services::auth_service::hash_password(raw_password).await?;
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO users (id, email, password_hash) VALUES (?1, ?2, ?3)
        "#,
    )
    .bind(&id)
    .bind(email)
    .bind(&password_hash)
    .execute(db_pool)
    .await?;

    tracing::info!("✅ Account '{}' created.", email);
    Ok(id)
}

/// Replaces a user's roles with at most one new role.
///
/// All existing roles are removed first, so a user can never end up holding
/// both Student and Instructor. `None` leaves the account roleless.
pub async fn set_user_role(
    db_pool: &SqlitePool,
    user_id: &str,
    new_role: Option<&str>,
) -> AppResult<()> {
    tracing::info!("Reassigning role for user '{}': {:?}", user_id, new_role);

    let mut tx = db_pool.begin().await?;

    // Drop everything the user currently holds
    sqlx::query("DELETE FROM user_roles WHERE user_id = ?1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    if let Some(role) = new_role {
        sqlx::query("INSERT INTO user_roles (user_id, role) VALUES (?1, ?2)")
            .bind(user_id)
            .bind(role)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    tracing::info!("✅ Roles updated for user {}", user_id);
    Ok(())
}

/// Deletes an account together with its linked business records.
///
/// Any linked student row goes first (its enrollments and card follow via
/// ON DELETE CASCADE), then any linked instructor row (owned courses keep
/// existing, instructor_id is set NULL by the schema), then the account
/// itself. Nothing belonging to other users is touched.
pub async fn delete_user(db_pool: &SqlitePool, user_id: &str) -> AppResult<()> {
    tracing::info!("Deleting user '{}' and linked records...", user_id);

    let mut tx = db_pool.begin().await?;

    sqlx::query("DELETE FROM students WHERE user_id = ?1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM instructors WHERE user_id = ?1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    let rows_affected = sqlx::query("DELETE FROM users WHERE id = ?1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        tracing::warn!("Delete failed: user '{}' not found.", user_id);
        tx.rollback().await?;
        return Err(AppError::NotFound);
    }

    tx.commit().await?;
    tracing::info!("✅ User '{}' deleted.", user_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::memory_pool;

    async fn account(pool: &SqlitePool, id: &str, email: &str) {
        sqlx::query("INSERT INTO users (id, email, password_hash) VALUES (?1, ?2, 'x')")
            .bind(id)
            .bind(email)
            .execute(pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn reassignment_never_leaves_two_roles() {
        let pool = memory_pool().await;
        account(&pool, "u1", "a@xyz.edu.jo").await;

        set_user_role(&pool, "u1", Some(ROLE_STUDENT)).await.unwrap();
        set_user_role(&pool, "u1", Some(ROLE_INSTRUCTOR)).await.unwrap();

        let roles = get_user_roles(&pool, "u1").await.unwrap();
        assert_eq!(roles, vec!["Instructor".to_string()]);

        // clearing the role leaves the account roleless
        set_user_role(&pool, "u1", None).await.unwrap();
        assert!(get_user_roles(&pool, "u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_a_user_cascades_to_its_student_data_only() {
        let pool = memory_pool().await;
        account(&pool, "u1", "a@xyz.edu.jo").await;
        account(&pool, "u2", "b@xyz.edu.jo").await;

        let dept = sqlx::query("INSERT INTO departments (name) VALUES ('CS')")
            .execute(&pool)
            .await
            .unwrap()
            .last_insert_rowid();
        let course = sqlx::query(
            "INSERT INTO courses (title, credits, department_id) VALUES ('Algo', 3, ?1)",
        )
        .bind(dept)
        .execute(&pool)
        .await
        .unwrap()
        .last_insert_rowid();

        for (user, email) in [("u1", "a@xyz.edu.jo"), ("u2", "b@xyz.edu.jo")] {
            let student = sqlx::query(
                r#"
                INSERT INTO students (first_name, last_name, email, enrollment_date, user_id)
                VALUES ('S', 'Tudent', ?1, '2024-09-01', ?2)
                "#,
            )
            .bind(email)
            .bind(user)
            .execute(&pool)
            .await
            .unwrap()
            .last_insert_rowid();
            sqlx::query("INSERT INTO enrollments (student_id, course_id) VALUES (?1, ?2)")
                .bind(student)
                .bind(course)
                .execute(&pool)
                .await
                .unwrap();
        }

        delete_user(&pool, "u1").await.unwrap();

        assert!(find_user_by_id(&pool, "u1").await.unwrap().is_none());
        let students = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM students")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(students, 1);
        // u1's enrollment went with the student row; u2's survived
        let enrollments = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM enrollments")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(enrollments, 1);
        assert!(find_user_by_id(&pool, "u2").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn deleting_an_unknown_user_is_not_found() {
        let pool = memory_pool().await;
        let err = delete_user(&pool, "ghost").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }
}
