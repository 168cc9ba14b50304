use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use gradeport_core::import::{SubmitSummary, ValidationError};
use gradeport_core::pagination::{PaginationMeta, PaginationParams};
use gradeport_models::academic_sessions::{
    AcademicSession, AcademicSessionWithStats, CreateAcademicSessionDto,
    PaginatedAcademicSessionsResponse, UpdateAcademicSessionDto,
};
use gradeport_models::auth::{LoginRequest, LoginResponse, MessageResponse};
use gradeport_models::courses::{
    Course, CreateCourseDto, PaginatedCoursesResponse, UpdateCourseDto,
};
use gradeport_models::departments::{
    CreateDepartmentDto, Department, PaginatedDepartmentsResponse, UpdateDepartmentDto,
};
use gradeport_models::results::{
    CourseResult, PaginatedResultsResponse, RecordResultDto, ReportCard, ReportCardLine,
    SemesterReport,
};
use gradeport_models::semesters::{CreateSemesterDto, Semester, UpdateSemesterDto};
use gradeport_models::students::{
    CreateStudentDto, Gender, Level, PaginatedStudentsResponse, Student, StudentStatus,
    UpdateStudentDto,
};
use gradeport_models::uploads::{
    BulkUploadRequest, UploadAcceptedResponse, UploadRejectedResponse,
};
use gradeport_models::users::{CreateUserDto, User, UserRole};

use crate::modules::auth::controller::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::me,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::delete_user,
        crate::modules::departments::controller::create_department,
        crate::modules::departments::controller::get_departments,
        crate::modules::departments::controller::get_department,
        crate::modules::departments::controller::update_department,
        crate::modules::departments::controller::delete_department,
        crate::modules::academic_sessions::controller::create_academic_session,
        crate::modules::academic_sessions::controller::get_academic_sessions,
        crate::modules::academic_sessions::controller::get_academic_session,
        crate::modules::academic_sessions::controller::update_academic_session,
        crate::modules::academic_sessions::controller::delete_academic_session,
        crate::modules::semesters::controller::create_semester,
        crate::modules::semesters::controller::get_session_semesters,
        crate::modules::semesters::controller::get_semester,
        crate::modules::semesters::controller::update_semester,
        crate::modules::semesters::controller::delete_semester,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::get_courses,
        crate::modules::courses::controller::get_course,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::students::controller::import_students,
        crate::modules::students::controller::student_import_template,
        crate::modules::results::controller::record_result,
        crate::modules::results::controller::get_results,
        crate::modules::results::controller::import_results,
        crate::modules::results::controller::result_import_template,
        crate::modules::results::controller::report_card,
    ),
    components(
        schemas(
            ErrorResponse,
            MessageResponse,
            LoginRequest,
            LoginResponse,
            User,
            UserRole,
            CreateUserDto,
            Department,
            CreateDepartmentDto,
            UpdateDepartmentDto,
            PaginatedDepartmentsResponse,
            AcademicSession,
            AcademicSessionWithStats,
            CreateAcademicSessionDto,
            UpdateAcademicSessionDto,
            PaginatedAcademicSessionsResponse,
            Semester,
            CreateSemesterDto,
            UpdateSemesterDto,
            Course,
            CreateCourseDto,
            UpdateCourseDto,
            PaginatedCoursesResponse,
            Student,
            Level,
            StudentStatus,
            Gender,
            CreateStudentDto,
            UpdateStudentDto,
            PaginatedStudentsResponse,
            CourseResult,
            RecordResultDto,
            PaginatedResultsResponse,
            ReportCard,
            SemesterReport,
            ReportCardLine,
            BulkUploadRequest,
            UploadAcceptedResponse,
            UploadRejectedResponse,
            SubmitSummary,
            ValidationError,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login and profile endpoints"),
        (name = "Users", description = "Account management (admin)"),
        (name = "Departments", description = "Department reference data"),
        (name = "Academic Sessions", description = "Session management"),
        (name = "Semesters", description = "Semester management"),
        (name = "Courses", description = "Course catalogue"),
        (name = "Students", description = "Student registry and bulk import"),
        (name = "Results", description = "Result recording, bulk import, and report cards")
    ),
    info(
        title = "Gradeport API",
        version = "0.1.0",
        description = "A university grade-management REST API: lecturers record course results, students view report cards, admins manage departments, sessions, courses, and accounts.",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
