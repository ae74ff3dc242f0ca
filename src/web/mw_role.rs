// src/web/mw_role.rs
use crate::{
    error::AppError,
    services::user_service,
    state::AppState,
    web::mw_auth::UserId,
};
use axum::{
    extract::{Extension, Request, State},
    middleware::Next,
    response::Response,
};

/// Shared check behind the three role middlewares. Runs *after*
/// `require_auth`, which put the UserId extension in place.
async fn check_role(
    state: &AppState,
    user_id: &str,
    required_role: &str,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    tracing::debug!("Role MW: checking '{}' for {}", required_role, user_id);

    if user_service::user_has_role(&state.db_pool, user_id, required_role).await? {
        Ok(next.run(request).await)
    } else {
        tracing::warn!(
            "Role MW: access denied for {} (missing role '{}').",
            user_id,
            required_role
        );
        Err(AppError::Forbidden)
    }
}

pub async fn require_admin(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    check_role(&state, &user_id_ext.0, user_service::ROLE_ADMIN, request, next).await
}

pub async fn require_instructor(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    check_role(&state, &user_id_ext.0, user_service::ROLE_INSTRUCTOR, request, next).await
}

pub async fn require_student(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    check_role(&state, &user_id_ext.0, user_service::ROLE_STUDENT, request, next).await
}
