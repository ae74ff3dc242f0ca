// src/models/user.rs
use chrono::NaiveDateTime;
use serde::Deserialize;
use sqlx::FromRow;

/// Account row from the 'users' table. Accounts carry authentication data
/// only; Student/Instructor business records link back via their user_id.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String, // uuid v4
    pub email: String,
    pub password_hash: String,
    pub created_at: Option<NaiveDateTime>,
}

/// Login form data (POST /login).
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Self-registration form data (POST /register).
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}
