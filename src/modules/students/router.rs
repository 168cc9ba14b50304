use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::students::controller::{
    create_student, delete_student, get_student, get_students, import_students,
    student_import_template, update_student,
};
use crate::state::AppState;

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_student).get(get_students))
        .route("/import", post(import_students))
        .route("/import/template", get(student_import_template))
        .route(
            "/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
}
