// src/error.rs
use axum::{http::StatusCode, response::Html, response::IntoResponse};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("database migration error: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("environment variable error: {0}")]
    EnvVarError(#[from] std::env::VarError),

    #[error("password hashing failed")]
    PasswordHashingError,

    #[error("session error: {0}")]
    SessionError(String),

    // Missing id or cross-tenant access (e.g. an instructor requesting
    // another instructor's course). Both render the same 404.
    #[error("not found")]
    NotFound,

    #[error("forbidden")]
    Forbidden,

    #[error("unexpected internal error")]
    InternalServerError,
}

// How an AppError becomes an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // Log the detailed error server-side; the user gets a generic page.
        tracing::error!("request failed: {:?}", self);

        let (status, user_message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "The requested record was not found."),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "You do not have access to this page."),
            AppError::SqlxError(_) | AppError::SqlxMigrateError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Error accessing data.")
            }
            AppError::EnvVarError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Configuration error."),
            AppError::PasswordHashingError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Error processing credentials.")
            }
            AppError::SessionError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Error managing your session.")
            }
            AppError::InternalServerError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "An unexpected error occurred.")
            }
        };

        (status, Html(format!(r#"
            <!DOCTYPE html><html><head><title>Error</title><style>body{{font-family:sans-serif;}}</style></head>
            <body><h1>Error {status_code}</h1><p>{message}</p><a href="javascript:history.back()">Back</a></body></html>
         "#, status_code = status.as_u16(), message = user_message))).into_response()
    }
}

// Default Result type for the application
pub type AppResult<T = ()> = Result<T, AppError>;
