// src/web/course_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::course::CourseForm,
    services::course_service,
    state::AppState,
    templates::{CourseDeletePage, CourseDetailsPage, CourseFormPage, CoursesPage},
    web::render_page,
};
use axum::{
    extract::{Form, Path, Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct FeedbackParams {
    success: Option<String>,
    error: Option<String>,
}

fn validate(form: &CourseForm) -> Result<(), &'static str> {
    if form.title.trim().is_empty() {
        return Err("Title is required.");
    }
    if !(course_service::MIN_CREDITS..=course_service::MAX_CREDITS).contains(&form.credits) {
        return Err("Credits must be between 1 and 6.");
    }
    Ok(())
}

/// GET /courses - admin course listing
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<FeedbackParams>,
) -> AppResult<impl IntoResponse> {
    let template = CoursesPage {
        courses: course_service::list_courses(&state.db_pool).await?,
        success_message: params.success,
        error_message: params.error,
    };
    render_page(&template)
}

/// GET /courses/{id}
pub async fn details(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let course = course_service::find_course_listing(&state.db_pool, course_id)
        .await?
        .ok_or(AppError::NotFound)?;
    render_page(&CourseDetailsPage { course })
}

/// GET /courses/new
pub async fn show_create_form(
    State(state): State<AppState>,
    Query(params): Query<FeedbackParams>,
) -> AppResult<impl IntoResponse> {
    let template = CourseFormPage {
        course: None,
        departments: course_service::list_departments(&state.db_pool).await?,
        instructors: course_service::list_instructors(&state.db_pool).await?,
        error_message: params.error,
    };
    render_page(&template)
}

/// POST /courses/new
pub async fn handle_create(
    State(state): State<AppState>,
    Form(form): Form<CourseForm>,
) -> AppResult<Redirect> {
    tracing::info!("POST /courses/new: '{}'", form.title);

    if let Err(message) = validate(&form) {
        let error_msg = urlencoding::encode(message);
        let redirect_url = format!("/courses/new?error={}", error_msg);
        return Ok(Redirect::to(&redirect_url));
    }

    course_service::create_course(
        &state.db_pool,
        form.title.trim(),
        form.description(),
        form.credits,
        form.department_id,
        form.instructor_id(),
    )
    .await?;

    let success_msg = urlencoding::encode("Course created.").to_string();
    let redirect_url = format!("/courses?success={}", success_msg);
    Ok(Redirect::to(&redirect_url))
}

/// GET /courses/{id}/edit
pub async fn show_edit_form(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    Query(params): Query<FeedbackParams>,
) -> AppResult<impl IntoResponse> {
    let course = course_service::find_course(&state.db_pool, course_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let template = CourseFormPage {
        course: Some(course),
        departments: course_service::list_departments(&state.db_pool).await?,
        instructors: course_service::list_instructors(&state.db_pool).await?,
        error_message: params.error,
    };
    render_page(&template)
}

/// POST /courses/{id}/edit - a concurrently-deleted course comes back as 404
pub async fn handle_edit(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    Form(form): Form<CourseForm>,
) -> AppResult<Redirect> {
    tracing::info!("POST /courses/{}/edit", course_id);

    if let Err(message) = validate(&form) {
        let error_msg = urlencoding::encode(message);
        let redirect_url = format!("/courses/{}/edit?error={}", course_id, error_msg);
        return Ok(Redirect::to(&redirect_url));
    }

    course_service::update_course(
        &state.db_pool,
        course_id,
        form.title.trim(),
        form.description(),
        form.credits,
        form.department_id,
        form.instructor_id(),
    )
    .await?;

    let success_msg = urlencoding::encode("Course updated.").to_string();
    let redirect_url = format!("/courses?success={}", success_msg);
    Ok(Redirect::to(&redirect_url))
}

/// GET /courses/{id}/delete - confirmation page
pub async fn show_delete_confirmation(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let course = course_service::find_course_listing(&state.db_pool, course_id)
        .await?
        .ok_or(AppError::NotFound)?;
    render_page(&CourseDeletePage { course })
}

/// POST /courses/{id}/delete
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> AppResult<Redirect> {
    tracing::info!("POST /courses/{}/delete", course_id);
    course_service::delete_course(&state.db_pool, course_id).await?;

    let success_msg = urlencoding::encode("Course deleted.").to_string();
    let redirect_url = format!("/courses?success={}", success_msg);
    Ok(Redirect::to(&redirect_url))
}
