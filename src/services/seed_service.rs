// src/services/seed_service.rs
use crate::{
    error::AppResult,
    services::{auth_service, user_service},
};
use sqlx::SqlitePool;
use uuid::Uuid;

const ROLES: &[&str] = &[
    user_service::ROLE_ADMIN,
    user_service::ROLE_INSTRUCTOR,
    user_service::ROLE_STUDENT,
];

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@xyz.edu.jo";
const DEFAULT_ADMIN_PASSWORD: &str = "Admin@123";

/// Seeds the three fixed roles and a default admin account on startup.
/// Idempotent: running it again changes nothing.
pub async fn seed_roles_and_admin(db_pool: &SqlitePool) -> AppResult<()> {
    tracing::info!("Seeding roles and default admin account...");

    for role in ROLES {
        sqlx::query("INSERT OR IGNORE INTO roles (name) VALUES (?1)")
            .bind(role)
            .execute(db_pool)
            .await?;
    }

    // Default admin, so the admin area is reachable on a fresh database
    if user_service::find_user_by_email(db_pool, DEFAULT_ADMIN_EMAIL)
        .await?
        .is_none()
    {
        let password_hash = auth_service::hash_password(DEFAULT_ADMIN_PASSWORD).await?;
        let id = Uuid::new_v4().to_string();

        let mut tx = db_pool.begin().await?;
        sqlx::query("INSERT INTO users (id, email, password_hash) VALUES (?1, ?2, ?3)")
            .bind(&id)
            .bind(DEFAULT_ADMIN_EMAIL)
            .bind(&password_hash)
            .execute(&mut *tx)
            .await?;
        sqlx::query("INSERT INTO user_roles (user_id, role) VALUES (?1, ?2)")
            .bind(&id)
            .bind(user_service::ROLE_ADMIN)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!("✅ Default admin '{}' created.", DEFAULT_ADMIN_EMAIL);
    } else {
        tracing::debug!("Default admin already present, skipping.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::memory_pool;

    #[tokio::test]
    async fn seeding_twice_does_not_duplicate_anything() {
        let pool = memory_pool().await;

        seed_roles_and_admin(&pool).await.unwrap();
        seed_roles_and_admin(&pool).await.unwrap();

        let role_count = user_service::count_roles(&pool).await.unwrap();
        assert_eq!(role_count, 3);

        let user_count = user_service::count_users(&pool).await.unwrap();
        assert_eq!(user_count, 1);

        let admin = user_service::find_user_by_email(&pool, DEFAULT_ADMIN_EMAIL)
            .await
            .unwrap()
            .expect("admin account seeded");
        let roles = user_service::get_user_roles(&pool, &admin.id).await.unwrap();
        assert_eq!(roles, vec!["Admin".to_string()]);
    }
}
