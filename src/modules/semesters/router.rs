use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::semesters::controller::{
    create_semester, delete_semester, get_semester, get_session_semesters, update_semester,
};
use crate::state::AppState;

/// Nested under `/api/academic-sessions/{session_id}/semesters`.
pub fn init_session_semesters_router() -> Router<AppState> {
    Router::new().route("/", post(create_semester).get(get_session_semesters))
}

/// Mounted at `/api/semesters` for item-level access.
pub fn init_semesters_router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(get_semester).put(update_semester).delete(delete_semester),
    )
}
