// src/web/routes.rs
use crate::{
    state::AppState,
    web::{
        admin_handlers, auth_handlers, course_handlers, instructor_handlers, mw_auth, mw_role,
        student_handlers,
    },
};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub fn create_router(app_state: AppState) -> Router {
    // --- Public routes ---
    let public_routes = Router::new()
        .route("/login", get(auth_handlers::show_login_form).post(auth_handlers::handle_login))
        .route("/register", get(auth_handlers::show_register_form).post(auth_handlers::handle_register))
        .route("/logout", get(auth_handlers::handle_logout))
        .route("/", get(|| async { axum::response::Redirect::permanent("/home") }));

    // --- Admin: user & role management ---
    let admin_routes = Router::new()
        .route("/dashboard", get(admin_handlers::show_dashboard))
        .route("/users", get(admin_handlers::show_users))
        .route("/users/{id}", get(admin_handlers::show_user_details))
        .route(
            "/users/{id}/role",
            get(admin_handlers::show_set_role_form).post(admin_handlers::handle_set_role),
        )
        .route("/users/{id}/delete", post(admin_handlers::handle_delete_user))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            mw_role::require_admin,
        ));

    // --- Admin: course CRUD ---
    let course_routes = Router::new()
        .route("/", get(course_handlers::index))
        .route(
            "/new",
            get(course_handlers::show_create_form).post(course_handlers::handle_create),
        )
        .route("/{id}", get(course_handlers::details))
        .route(
            "/{id}/edit",
            get(course_handlers::show_edit_form).post(course_handlers::handle_edit),
        )
        .route(
            "/{id}/delete",
            get(course_handlers::show_delete_confirmation).post(course_handlers::handle_delete),
        )
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            mw_role::require_admin,
        ));

    // --- Instructor area ---
    let instructor_routes = Router::new()
        .route(
            "/complete-profile",
            get(instructor_handlers::show_profile_form)
                .post(instructor_handlers::handle_profile_form),
        )
        .route("/dashboard", get(instructor_handlers::show_dashboard))
        .route("/courses", get(instructor_handlers::show_courses))
        .route("/courses/{id}/students", get(instructor_handlers::show_course_students))
        .route("/courses/{id}/mark", post(instructor_handlers::handle_update_mark))
        .route(
            "/courses/{id}/enroll",
            get(instructor_handlers::show_enroll_form).post(instructor_handlers::handle_enroll),
        )
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            mw_role::require_instructor,
        ));

    // --- Student area ---
    let student_routes = Router::new()
        .route(
            "/complete-profile",
            get(student_handlers::show_profile_form).post(student_handlers::handle_profile_form),
        )
        .route("/my-courses", get(student_handlers::show_my_courses))
        .route("/my-gpa", get(student_handlers::show_my_gpa))
        .route("/my-card", get(student_handlers::show_my_card))
        .route(
            "/my-card/create",
            get(student_handlers::show_create_card).post(student_handlers::handle_create_card),
        )
        .route(
            "/my-card/edit",
            get(student_handlers::show_edit_card).post(student_handlers::handle_edit_card),
        )
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            mw_role::require_student,
        ));

    // --- Authenticated routes (login required, role checked per area) ---
    let authenticated_routes = Router::new()
        .route("/home", get(auth_handlers::home_handler))
        .nest("/admin", admin_routes)
        .nest("/courses", course_routes)
        .nest("/instructor", instructor_routes)
        .nest("/student", student_routes)
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            mw_auth::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .with_state(app_state)
}
