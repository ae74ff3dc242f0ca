// src/models/department.rs
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Department {
    pub department_id: i64,
    pub name: String,
}
