// src/web/admin_handlers.rs
use crate::{
    error::{AppError, AppResult},
    services::{instructor_service, student_service, user_service},
    state::AppState,
    templates::{
        AdminDashboardPage, AdminSetRolePage, AdminUserDetailsPage, AdminUsersPage, UserWithRoles,
    },
    web::{mw_auth::UserId, render_page},
};
use axum::{
    extract::{Extension, Form, Path, Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;

// --- Form / query structs ---

#[derive(Deserialize, Debug)]
pub struct SetRoleForm {
    // Empty string means "no role"
    #[serde(default)]
    role: String,
}

#[derive(Deserialize, Debug)]
pub struct FeedbackParams {
    success: Option<String>,
    error: Option<String>,
}

// --- Handlers ---

/// GET /admin/dashboard - quick stats
pub async fn show_dashboard(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let template = AdminDashboardPage {
        user_count: user_service::count_users(&state.db_pool).await?,
        role_count: user_service::count_roles(&state.db_pool).await?,
    };
    render_page(&template)
}

/// GET /admin/users - all users with their resolved role names
pub async fn show_users(
    State(state): State<AppState>,
    Query(params): Query<FeedbackParams>,
) -> AppResult<impl IntoResponse> {
    tracing::debug!("GET /admin/users: loading user management page...");

    let users = user_service::find_all_users(&state.db_pool).await?;

    let mut users_with_roles = Vec::with_capacity(users.len());
    for user in users {
        let roles = user_service::get_user_roles(&state.db_pool, &user.id).await?;
        users_with_roles.push(UserWithRoles {
            id: user.id,
            email: user.email,
            roles,
        });
    }

    let template = AdminUsersPage {
        users: users_with_roles,
        success_message: params.success,
        error_message: params.error,
    };
    render_page(&template)
}

/// GET /admin/users/{id} - account details merged with any linked
/// student/instructor record
pub async fn show_user_details(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let user = user_service::find_user_by_id(&state.db_pool, &user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let roles = user_service::get_user_roles(&state.db_pool, &user.id).await?;
    let student = student_service::find_by_user_id(&state.db_pool, &user.id).await?;
    let instructor = instructor_service::find_by_user_id(&state.db_pool, &user.id).await?;

    let template = AdminUserDetailsPage {
        user_id: user.id,
        email: user.email,
        roles,
        student,
        instructor,
    };
    render_page(&template)
}

/// GET /admin/users/{id}/role - role reassignment form
pub async fn show_set_role_form(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<FeedbackParams>,
) -> AppResult<impl IntoResponse> {
    let user = user_service::find_user_by_id(&state.db_pool, &user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let template = AdminSetRolePage {
        user_id: user.id,
        user_email: user.email,
        current_roles: user_service::get_user_roles(&state.db_pool, &user_id).await?,
        assignable_roles: user_service::ASSIGNABLE_ROLES,
        error_message: params.error,
    };
    render_page(&template)
}

/// POST /admin/users/{id}/role - removes all current roles, then assigns at
/// most one of {Student, Instructor}. Admin is not assignable here.
pub async fn handle_set_role(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Form(form): Form<SetRoleForm>,
) -> AppResult<Redirect> {
    tracing::info!("POST /admin/users/{}/role: '{}'", user_id, form.role);

    if user_service::find_user_by_id(&state.db_pool, &user_id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let role = form.role.trim();
    let new_role = if role.is_empty() {
        None
    } else if user_service::ASSIGNABLE_ROLES
        .iter()
        .any(|r| r.eq_ignore_ascii_case(role))
    {
        Some(role)
    } else {
        tracing::warn!("Rejected role assignment '{}' for user {}", role, user_id);
        let error_msg = urlencoding::encode("That role cannot be assigned here.");
        let redirect_url = format!("/admin/users/{}/role?error={}", user_id, error_msg);
        return Ok(Redirect::to(&redirect_url));
    };

    user_service::set_user_role(&state.db_pool, &user_id, new_role).await?;

    let success_msg = urlencoding::encode("Role updated.").to_string();
    let redirect_url = format!("/admin/users?success={}", success_msg);
    Ok(Redirect::to(&redirect_url))
}

/// POST /admin/users/{id}/delete - refuses self-deletion; otherwise removes
/// the account and its linked business records.
pub async fn handle_delete_user(
    State(state): State<AppState>,
    Extension(caller): Extension<UserId>,
    Path(user_id): Path<String>,
) -> AppResult<Redirect> {
    tracing::info!("POST /admin/users/{}/delete", user_id);

    if caller.0 == user_id {
        tracing::warn!("User {} attempted to delete their own account.", user_id);
        let error_msg = urlencoding::encode("You cannot delete your own account.");
        let redirect_url = format!("/admin/users?error={}", error_msg);
        return Ok(Redirect::to(&redirect_url));
    }

    user_service::delete_user(&state.db_pool, &user_id).await?;

    let success_msg = urlencoding::encode("User deleted.").to_string();
    let redirect_url = format!("/admin/users?success={}", success_msg);
    Ok(Redirect::to(&redirect_url))
}
