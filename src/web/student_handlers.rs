// src/web/student_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::person::Student,
    services::{student_service, user_service},
    state::AppState,
    templates::{
        CreateCardPage, EditCardPage, MyCardPage, MyCoursesPage, MyGpaPage, StudentProfilePage,
    },
    web::{mw_auth::UserId, render_page},
};
use axum::{
    extract::{Extension, Form, Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct ProfileForm {
    first_name: String,
    last_name: String,
}

#[derive(Deserialize, Debug)]
pub struct EditCardForm {
    // Checkbox: present when checked, absent when not
    #[serde(default)]
    is_active: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct FeedbackParams {
    error: Option<String>,
}

async fn current_student(state: &AppState, user_id: &str) -> AppResult<Option<Student>> {
    student_service::find_by_user_id(&state.db_pool, user_id).await
}

// --- Profile completion ---

/// GET /student/complete-profile
pub async fn show_profile_form(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
    Query(params): Query<FeedbackParams>,
) -> AppResult<impl IntoResponse> {
    if current_student(&state, &user_id_ext.0).await?.is_some() {
        return Ok(Redirect::to("/student/my-courses").into_response());
    }
    Ok(render_page(&StudentProfilePage { error: params.error })?.into_response())
}

/// POST /student/complete-profile - one-time, idempotent
pub async fn handle_profile_form(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
    Form(form): Form<ProfileForm>,
) -> AppResult<Redirect> {
    let user_id = user_id_ext.0;
    tracing::info!("POST /student/complete-profile for user {}", user_id);

    if form.first_name.trim().is_empty() || form.last_name.trim().is_empty() {
        let error_msg = urlencoding::encode("First and last name are required.");
        let redirect_url = format!("/student/complete-profile?error={}", error_msg);
        return Ok(Redirect::to(&redirect_url));
    }

    let user = user_service::find_user_by_id(&state.db_pool, &user_id)
        .await?
        .ok_or(AppError::InternalServerError)?;

    student_service::create_profile(
        &state.db_pool,
        &user_id,
        &user.email,
        form.first_name.trim(),
        form.last_name.trim(),
        chrono::Local::now().date_naive(),
    )
    .await?;

    Ok(Redirect::to("/student/my-courses"))
}

// --- Courses & GPA ---

/// GET /student/my-courses
pub async fn show_my_courses(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
) -> AppResult<impl IntoResponse> {
    let student = match current_student(&state, &user_id_ext.0).await? {
        Some(s) => s,
        None => return Ok(Redirect::to("/student/complete-profile").into_response()),
    };

    let courses = student_service::enrolled_courses(&state.db_pool, student.id).await?;
    let gpa = student_service::gpa(&courses);

    let template = MyCoursesPage {
        student_name: student.full_name(),
        gpa: format!("{:.2}", gpa),
        courses,
    };
    Ok(render_page(&template)?.into_response())
}

/// GET /student/my-gpa
pub async fn show_my_gpa(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
) -> AppResult<impl IntoResponse> {
    let student = match current_student(&state, &user_id_ext.0).await? {
        Some(s) => s,
        None => return Ok(Redirect::to("/student/complete-profile").into_response()),
    };

    let courses = student_service::enrolled_courses(&state.db_pool, student.id).await?;
    let gpa = student_service::gpa(&courses);

    let graded: Vec<_> = courses.into_iter().filter(|c| c.mark.is_some()).collect();
    let total_credits: i64 = graded.iter().map(|c| c.credits).sum();

    let template = MyGpaPage {
        student_name: student.full_name(),
        gpa: format!("{:.2}", gpa),
        total_credits,
        completed_courses: graded.len(),
        graded,
    };
    Ok(render_page(&template)?.into_response())
}

// --- Student card ---

/// GET /student/my-card - absent card redirects to the create flow
pub async fn show_my_card(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
) -> AppResult<impl IntoResponse> {
    let student = match current_student(&state, &user_id_ext.0).await? {
        Some(s) => s,
        None => return Ok(Redirect::to("/student/complete-profile").into_response()),
    };

    let card = match student_service::find_card(&state.db_pool, student.id).await? {
        Some(card) => card,
        None => return Ok(Redirect::to("/student/my-card/create").into_response()),
    };

    let template = MyCardPage {
        student_name: student.full_name(),
        card,
    };
    Ok(render_page(&template)?.into_response())
}

/// GET /student/my-card/create - existing card redirects back to view
pub async fn show_create_card(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
) -> AppResult<impl IntoResponse> {
    let student = match current_student(&state, &user_id_ext.0).await? {
        Some(s) => s,
        None => return Ok(Redirect::to("/student/complete-profile").into_response()),
    };

    if student_service::find_card(&state.db_pool, student.id).await?.is_some() {
        return Ok(Redirect::to("/student/my-card").into_response());
    }

    let template = CreateCardPage {
        student_name: student.full_name(),
    };
    Ok(render_page(&template)?.into_response())
}

/// POST /student/my-card/create - issuance; a second attempt is a no-op
/// redirect (the service returns the existing card untouched)
pub async fn handle_create_card(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
) -> AppResult<Redirect> {
    let student = match current_student(&state, &user_id_ext.0).await? {
        Some(s) => s,
        None => return Ok(Redirect::to("/student/complete-profile")),
    };

    student_service::issue_card(&state.db_pool, student.id, chrono::Local::now().date_naive())
        .await?;

    Ok(Redirect::to("/student/my-card"))
}

/// GET /student/my-card/edit
pub async fn show_edit_card(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
) -> AppResult<impl IntoResponse> {
    let student = match current_student(&state, &user_id_ext.0).await? {
        Some(s) => s,
        None => return Ok(Redirect::to("/student/complete-profile").into_response()),
    };

    let card = match student_service::find_card(&state.db_pool, student.id).await? {
        Some(card) => card,
        None => return Ok(Redirect::to("/student/my-card/create").into_response()),
    };

    Ok(render_page(&EditCardPage { card })?.into_response())
}

/// POST /student/my-card/edit - only the active flag is editable
pub async fn handle_edit_card(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
    Form(form): Form<EditCardForm>,
) -> AppResult<Redirect> {
    let student = match current_student(&state, &user_id_ext.0).await? {
        Some(s) => s,
        None => return Ok(Redirect::to("/student/complete-profile")),
    };

    if student_service::find_card(&state.db_pool, student.id).await?.is_none() {
        return Ok(Redirect::to("/student/my-card/create"));
    }

    student_service::set_card_active(&state.db_pool, student.id, form.is_active.is_some()).await?;

    Ok(Redirect::to("/student/my-card"))
}
