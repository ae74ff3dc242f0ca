// src/web/mod.rs
pub mod admin_handlers;
pub mod auth_handlers;
pub mod course_handlers;
pub mod instructor_handlers;
pub mod mw_auth;
pub mod mw_role;
pub mod routes;
pub mod student_handlers;

use crate::error::{AppError, AppResult};
use askama::Template;
use axum::response::Html;

/// Renders an askama template into an HTML response, mapping render failures
/// to an internal error.
pub fn render_page<T: Template>(template: &T) -> AppResult<Html<String>> {
    match template.render() {
        Ok(html) => Ok(Html(html)),
        Err(e) => {
            tracing::error!("Failed to render template: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}
