// src/models/card.rs
use chrono::NaiveDate;
use sqlx::FromRow;

/// Virtual student ID card, 1:1 with a student (shared primary key).
/// Issued lazily, exactly once; only the active flag is editable afterwards.
#[derive(Debug, Clone, FromRow)]
pub struct StudentCard {
    pub student_id: i64,
    pub card_number: String, // STU-YYYYMMDD-NNNN
    pub issue_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub is_active: bool,
}
