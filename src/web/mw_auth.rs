// src/web/mw_auth.rs
use crate::error::AppError;
use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

/// Middleware that requires a logged-in session.
///
/// Puts the authenticated account id into the request extensions so the
/// protected handlers can pick it up without touching the session again.
pub async fn require_auth(
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match session.get::<String>("user_id").await {
        Ok(Some(user_id)) => {
            tracing::debug!("Auth MW: user '{}' authenticated.", user_id);
            request.extensions_mut().insert(UserId(user_id));
            Ok(next.run(request).await)
        }
        Ok(None) => {
            tracing::debug!("Auth MW: no session, redirecting to /login");
            Ok(Redirect::to("/login").into_response())
        }
        Err(e) => {
            tracing::error!("Auth MW: failed to read session: {:?}", e);
            Err(AppError::SessionError(format!("failed to check session: {}", e)))
        }
    }
}

/// The authenticated account id, placed into request extensions by
/// `require_auth`.
#[derive(Clone, Debug)]
pub struct UserId(pub String);
