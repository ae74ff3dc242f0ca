// src/web/instructor_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::person::Instructor,
    services::{course_service, instructor_service, user_service},
    state::AppState,
    templates::{
        CourseStudentsPage, EnrollStudentPage, InstructorCoursesPage, InstructorDashboardPage,
        InstructorProfilePage,
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
pub struct ProfileForm {
    first_name: String,
    last_name: String,
    department_id: i64,
}

#[derive(Deserialize, Debug)]
pub struct MarkForm {
    student_id: i64,
    // Empty string clears the mark
    #[serde(default)]
    mark: String,
}

#[derive(Deserialize, Debug)]
pub struct EnrollForm {
    student_id: i64,
}

#[derive(Deserialize, Debug)]
pub struct FeedbackParams {
    error: Option<String>,
}

/// Loads the instructor profile for the logged-in account, or None when the
/// account has not completed its profile yet.
async fn current_instructor(
    state: &AppState,
    user_id: &str,
) -> AppResult<Option<Instructor>> {
    instructor_service::find_by_user_id(&state.db_pool, user_id).await
}

// --- Profile completion ---

/// GET /instructor/complete-profile
pub async fn show_profile_form(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
    Query(params): Query<FeedbackParams>,
) -> AppResult<impl IntoResponse> {
    if current_instructor(&state, &user_id_ext.0).await?.is_some() {
        return Ok(Redirect::to("/instructor/dashboard").into_response());
    }

    let template = InstructorProfilePage {
        departments: course_service::list_departments(&state.db_pool).await?,
        error: params.error,
    };
    Ok(render_page(&template)?.into_response())
}

/// POST /instructor/complete-profile - one-time, idempotent
pub async fn handle_profile_form(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
    Form(form): Form<ProfileForm>,
) -> AppResult<Redirect> {
    let user_id = user_id_ext.0;
    tracing::info!("POST /instructor/complete-profile for user {}", user_id);

    if form.first_name.trim().is_empty() || form.last_name.trim().is_empty() {
        let error_msg = urlencoding::encode("First and last name are required.");
        let redirect_url = format!("/instructor/complete-profile?error={}", error_msg);
        return Ok(Redirect::to(&redirect_url));
    }

    let user = user_service::find_user_by_id(&state.db_pool, &user_id)
        .await?
        .ok_or(AppError::InternalServerError)?;

    instructor_service::create_profile(
        &state.db_pool,
        &user_id,
        &user.email,
        form.first_name.trim(),
        form.last_name.trim(),
        form.department_id,
        chrono::Local::now().date_naive(),
    )
    .await?;

    Ok(Redirect::to("/instructor/dashboard"))
}

// --- Dashboard and courses ---

/// GET /instructor/dashboard
pub async fn show_dashboard(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
) -> AppResult<impl IntoResponse> {
    let instructor = match current_instructor(&state, &user_id_ext.0).await? {
        Some(i) => i,
        None => return Ok(Redirect::to("/instructor/complete-profile").into_response()),
    };

    let (course_count, total_students) =
        instructor_service::dashboard_stats(&state.db_pool, instructor.id).await?;

    let template = InstructorDashboardPage {
        name: instructor.full_name(),
        course_count,
        total_students,
    };
    Ok(render_page(&template)?.into_response())
}

/// GET /instructor/courses
pub async fn show_courses(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
) -> AppResult<impl IntoResponse> {
    let instructor = match current_instructor(&state, &user_id_ext.0).await? {
        Some(i) => i,
        None => return Ok(Redirect::to("/instructor/complete-profile").into_response()),
    };

    let template = InstructorCoursesPage {
        courses: instructor_service::taught_courses(&state.db_pool, instructor.id).await?,
    };
    Ok(render_page(&template)?.into_response())
}

/// GET /instructor/courses/{id}/students - roster with marks.
/// Courses of other instructors come back as 404.
pub async fn show_course_students(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
    Path(course_id): Path<i64>,
    Query(params): Query<FeedbackParams>,
) -> AppResult<impl IntoResponse> {
    let instructor = match current_instructor(&state, &user_id_ext.0).await? {
        Some(i) => i,
        None => return Ok(Redirect::to("/instructor/complete-profile").into_response()),
    };

    let course = instructor_service::owned_course(&state.db_pool, instructor.id, course_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let template = CourseStudentsPage {
        roster: instructor_service::course_roster(&state.db_pool, course_id).await?,
        course,
        error_message: params.error,
    };
    Ok(render_page(&template)?.into_response())
}

/// POST /instructor/courses/{id}/mark
pub async fn handle_update_mark(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
    Path(course_id): Path<i64>,
    Form(form): Form<MarkForm>,
) -> AppResult<Redirect> {
    let instructor = match current_instructor(&state, &user_id_ext.0).await? {
        Some(i) => i,
        None => return Ok(Redirect::to("/instructor/complete-profile")),
    };

    // Empty input clears the mark; anything else must be 0..=100
    let mark = match form.mark.trim() {
        "" => None,
        raw => match raw.parse::<f64>() {
            Ok(m) if (0.0..=100.0).contains(&m) => Some(m),
            _ => {
                let error_msg = urlencoding::encode("Mark must be a number between 0 and 100.");
                let redirect_url =
                    format!("/instructor/courses/{}/students?error={}", course_id, error_msg);
                return Ok(Redirect::to(&redirect_url));
            }
        },
    };

    instructor_service::update_mark(&state.db_pool, instructor.id, course_id, form.student_id, mark)
        .await?;

    let redirect_url = format!("/instructor/courses/{}/students", course_id);
    Ok(Redirect::to(&redirect_url))
}

// --- Enrollment ---

/// GET /instructor/courses/{id}/enroll - offers only students not already
/// enrolled
pub async fn show_enroll_form(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
    Path(course_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let instructor = match current_instructor(&state, &user_id_ext.0).await? {
        Some(i) => i,
        None => return Ok(Redirect::to("/instructor/complete-profile").into_response()),
    };

    let course = instructor_service::owned_course(&state.db_pool, instructor.id, course_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let template = EnrollStudentPage {
        students: instructor_service::available_students(&state.db_pool, course_id).await?,
        course,
    };
    Ok(render_page(&template)?.into_response())
}

/// POST /instructor/courses/{id}/enroll - duplicate pairs are a silent no-op
pub async fn handle_enroll(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
    Path(course_id): Path<i64>,
    Form(form): Form<EnrollForm>,
) -> AppResult<Redirect> {
    let instructor = match current_instructor(&state, &user_id_ext.0).await? {
        Some(i) => i,
        None => return Ok(Redirect::to("/instructor/complete-profile")),
    };

    instructor_service::enroll_student(&state.db_pool, instructor.id, course_id, form.student_id)
        .await?;

    let redirect_url = format!("/instructor/courses/{}/students", course_id);
    Ok(Redirect::to(&redirect_url))
}
