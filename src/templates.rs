// src/templates.rs
use crate::models::{
    card::StudentCard,
    course::{Course, CourseListing, TaughtCourse},
    department::Department,
    enrollment::{EnrolledCourse, RosterEntry},
    person::{Instructor, Student},
};
use askama::Template;

// --- Auth pages ---

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterPage {
    pub error: Option<String>,
}

/// Shown after login to accounts the admin has not assigned a role to yet.
#[derive(Template)]
#[template(path = "awaiting_role.html")]
pub struct AwaitingRolePage {
    pub email: String,
}

// --- Admin pages ---

#[derive(Template)]
#[template(path = "admin_dashboard.html")]
pub struct AdminDashboardPage {
    pub user_count: i64,
    pub role_count: i64,
}

// Wrapper because the base User struct does not carry its roles
#[derive(Clone, Debug)]
pub struct UserWithRoles {
    pub id: String,
    pub email: String,
    pub roles: Vec<String>,
}

#[derive(Template)]
#[template(path = "admin_users.html")]
pub struct AdminUsersPage {
    pub users: Vec<UserWithRoles>,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Template)]
#[template(path = "admin_user_details.html")]
pub struct AdminUserDetailsPage {
    pub user_id: String,
    pub email: String,
    pub roles: Vec<String>,
    // Linked business records, if the account completed a profile
    pub student: Option<Student>,
    pub instructor: Option<Instructor>,
}

#[derive(Template)]
#[template(path = "admin_set_role.html")]
pub struct AdminSetRolePage {
    pub user_id: String,
    pub user_email: String,
    pub current_roles: Vec<String>,
    pub assignable_roles: &'static [&'static str],
    pub error_message: Option<String>,
}

impl AdminSetRolePage {
    /// Whether the user currently holds the given role.
    pub fn has_role(&self, role: &str) -> bool {
        self.current_roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }
}

// --- Course pages (admin) ---

#[derive(Template)]
#[template(path = "courses_index.html")]
pub struct CoursesPage {
    pub courses: Vec<CourseListing>,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Template)]
#[template(path = "course_details.html")]
pub struct CourseDetailsPage {
    pub course: CourseListing,
}

/// Shared by create (course = None) and edit (course = Some).
#[derive(Template)]
#[template(path = "course_form.html")]
pub struct CourseFormPage {
    pub course: Option<Course>,
    pub departments: Vec<Department>,
    pub instructors: Vec<Instructor>,
    pub error_message: Option<String>,
}

impl CourseFormPage {
    // Small helpers so the template does not have to unwrap the Option

    pub fn is_edit(&self) -> bool {
        self.course.is_some()
    }

    pub fn form_action(&self) -> String {
        match &self.course {
            Some(c) => format!("/courses/{}/edit", c.course_id),
            None => "/courses/new".to_string(),
        }
    }

    pub fn title_value(&self) -> &str {
        self.course.as_ref().map_or("", |c| c.title.as_str())
    }

    pub fn description_value(&self) -> &str {
        self.course
            .as_ref()
            .and_then(|c| c.description.as_deref())
            .unwrap_or("")
    }

    pub fn credits_value(&self) -> i64 {
        self.course.as_ref().map_or(3, |c| c.credits)
    }

    pub fn department_selected(&self, department_id: &i64) -> bool {
        self.course
            .as_ref()
            .is_some_and(|c| c.department_id == *department_id)
    }

    pub fn instructor_selected(&self, instructor_id: &i64) -> bool {
        self.course
            .as_ref()
            .is_some_and(|c| c.instructor_id == Some(*instructor_id))
    }
}

#[derive(Template)]
#[template(path = "course_delete.html")]
pub struct CourseDeletePage {
    pub course: CourseListing,
}

// --- Instructor pages ---

#[derive(Template)]
#[template(path = "instructor_profile.html")]
pub struct InstructorProfilePage {
    pub departments: Vec<Department>,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "instructor_dashboard.html")]
pub struct InstructorDashboardPage {
    pub name: String,
    pub course_count: i64,
    pub total_students: i64,
}

#[derive(Template)]
#[template(path = "instructor_courses.html")]
pub struct InstructorCoursesPage {
    pub courses: Vec<TaughtCourse>,
}

#[derive(Template)]
#[template(path = "course_students.html")]
pub struct CourseStudentsPage {
    pub course: Course,
    pub roster: Vec<RosterEntry>,
    pub error_message: Option<String>,
}

#[derive(Template)]
#[template(path = "enroll_student.html")]
pub struct EnrollStudentPage {
    pub course: Course,
    pub students: Vec<Student>,
}

// --- Student pages ---

#[derive(Template)]
#[template(path = "student_profile.html")]
pub struct StudentProfilePage {
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "my_courses.html")]
pub struct MyCoursesPage {
    pub student_name: String,
    pub courses: Vec<EnrolledCourse>,
    pub gpa: String, // pre-formatted to 2 decimals
}

#[derive(Template)]
#[template(path = "my_gpa.html")]
pub struct MyGpaPage {
    pub student_name: String,
    pub graded: Vec<EnrolledCourse>,
    pub gpa: String,
    pub total_credits: i64,
    pub completed_courses: usize,
}

#[derive(Template)]
#[template(path = "my_card.html")]
pub struct MyCardPage {
    pub student_name: String,
    pub card: StudentCard,
}

#[derive(Template)]
#[template(path = "create_card.html")]
pub struct CreateCardPage {
    pub student_name: String,
}

#[derive(Template)]
#[template(path = "edit_card.html")]
pub struct EditCardPage {
    pub card: StudentCard,
}
