// src/models/person.rs
use chrono::NaiveDate;
use sqlx::FromRow;

// Students and instructors share the person shape (name + email) but live in
// separate tables; the only shared behaviour is name formatting.

#[derive(Debug, Clone, FromRow)]
pub struct Student {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub enrollment_date: NaiveDate,
    // None until the account completes its profile
    pub user_id: Option<String>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Instructor {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub hire_date: NaiveDate,
    pub department_id: i64,
    pub user_id: Option<String>,
}

impl Instructor {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
