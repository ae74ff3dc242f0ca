// src/web/auth_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::user::{LoginForm, RegisterForm},
    services::{auth_service, user_service},
    state::AppState,
    templates::{AwaitingRolePage, LoginPage, RegisterPage},
    web::{mw_auth::UserId, render_page},
};
use axum::{
    extract::{Extension, Form, State},
    response::{IntoResponse, Redirect},
};
use tower_sessions::Session;

// GET /login
pub async fn show_login_form(session: Session) -> AppResult<impl IntoResponse> {
    if session.get::<String>("user_id").await.ok().flatten().is_some() {
        tracing::debug!("GET /login: already logged in, redirecting to /home");
        return Ok(Redirect::to("/home").into_response());
    }
    Ok(render_page(&LoginPage { error: None })?.into_response())
}

// POST /login
pub async fn handle_login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> AppResult<impl IntoResponse> {
    tracing::info!("Login attempt for: {}", form.email);

    let user = match user_service::find_user_by_email(&state.db_pool, &form.email).await? {
        Some(user) => user,
        None => {
            tracing::warn!("Unknown account: {}", form.email);
            // Same generic message as a wrong password, on purpose
            let template = LoginPage { error: Some("Invalid email or password.".to_string()) };
            return Ok(render_page(&template)?.into_response());
        }
    };

    if !auth_service::verify_password(&form.password, &user.password_hash).await? {
        tracing::warn!("Wrong password for: {}", form.email);
        let template = LoginPage { error: Some("Invalid email or password.".to_string()) };
        return Ok(render_page(&template)?.into_response());
    }

    // Fresh session id on privilege change
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::SessionError(format!("failed to cycle session id: {}", e)))?;
    session
        .insert("user_id", &user.id)
        .await
        .map_err(|e| AppError::SessionError(format!("failed to write session: {}", e)))?;

    tracing::info!("✅ Login successful for: {}", user.email);
    Ok(Redirect::to("/home").into_response())
}

// GET /register
pub async fn show_register_form(session: Session) -> AppResult<impl IntoResponse> {
    if session.get::<String>("user_id").await.ok().flatten().is_some() {
        return Ok(Redirect::to("/home").into_response());
    }
    Ok(render_page(&RegisterPage { error: None })?.into_response())
}

// POST /register - self-signup; the account stays roleless until an admin
// assigns Student or Instructor.
pub async fn handle_register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> AppResult<impl IntoResponse> {
    tracing::info!("Registration attempt for: {}", form.email);

    let email = form.email.trim().to_string();
    if email.is_empty() || !email.contains('@') {
        let template = RegisterPage { error: Some("Please enter a valid email address.".to_string()) };
        return Ok(render_page(&template)?.into_response());
    }
    if form.password.len() < 6 {
        let template = RegisterPage { error: Some("Password must be at least 6 characters.".to_string()) };
        return Ok(render_page(&template)?.into_response());
    }
    if form.password != form.confirm_password {
        let template = RegisterPage { error: Some("Passwords do not match.".to_string()) };
        return Ok(render_page(&template)?.into_response());
    }

    if user_service::find_user_by_email(&state.db_pool, &email).await?.is_some() {
        tracing::warn!("Registration failed: '{}' already exists.", email);
        let template = RegisterPage { error: Some("An account with this email already exists.".to_string()) };
        return Ok(render_page(&template)?.into_response());
    }

    let user_id = user_service::create_user(&state.db_pool, &email, &form.password).await?;

    // Log the new account straight in
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::SessionError(format!("failed to cycle session id: {}", e)))?;
    session
        .insert("user_id", &user_id)
        .await
        .map_err(|e| AppError::SessionError(format!("failed to write session: {}", e)))?;

    Ok(Redirect::to("/home").into_response())
}

// GET /logout
pub async fn handle_logout(session: Session) -> AppResult<Redirect> {
    let user_id: Option<String> = session.get("user_id").await.ok().flatten();

    session
        .delete()
        .await
        .map_err(|e| AppError::SessionError(format!("failed to delete session: {}", e)))?;

    if let Some(id) = user_id {
        tracing::info!("🚪 User '{}' logged out.", id);
    }
    Ok(Redirect::to("/login"))
}

// GET /home - dispatch to the area matching the account's role.
pub async fn home_handler(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
) -> AppResult<impl IntoResponse> {
    let user_id = user_id_ext.0;
    let roles = user_service::get_user_roles(&state.db_pool, &user_id).await?;

    let target = if roles.iter().any(|r| r.eq_ignore_ascii_case(user_service::ROLE_ADMIN)) {
        "/admin/dashboard"
    } else if roles.iter().any(|r| r.eq_ignore_ascii_case(user_service::ROLE_INSTRUCTOR)) {
        "/instructor/dashboard"
    } else if roles.iter().any(|r| r.eq_ignore_ascii_case(user_service::ROLE_STUDENT)) {
        "/student/my-courses"
    } else {
        // No role assigned yet: show the waiting page instead of a loop
        let user = user_service::find_user_by_id(&state.db_pool, &user_id)
            .await?
            .ok_or_else(|| {
                tracing::error!("Authenticated user_id '{}' missing from DB!", user_id);
                AppError::InternalServerError
            })?;
        return Ok(render_page(&AwaitingRolePage { email: user.email })?.into_response());
    };

    Ok(Redirect::to(target).into_response())
}
