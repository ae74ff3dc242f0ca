// src/services/mod.rs
pub mod auth_service;
pub mod course_service;
pub mod instructor_service;
pub mod seed_service;
pub mod student_service;
pub mod user_service;
