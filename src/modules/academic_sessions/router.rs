use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::academic_sessions::controller::{
    create_academic_session, delete_academic_session, get_academic_session,
    get_academic_sessions, update_academic_session,
};
use crate::state::AppState;

pub fn init_academic_sessions_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(create_academic_session).get(get_academic_sessions),
        )
        .route(
            "/{id}",
            get(get_academic_session)
                .put(update_academic_session)
                .delete(delete_academic_session),
        )
}
