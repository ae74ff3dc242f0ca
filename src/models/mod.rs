// src/models/mod.rs
pub mod card;
pub mod course;
pub mod department;
pub mod enrollment;
pub mod person;
pub mod user;
