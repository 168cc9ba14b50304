use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::departments::controller::{
    create_department, delete_department, get_department, get_departments, update_department,
};
use crate::state::AppState;

pub fn init_departments_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_department).get(get_departments))
        .route(
            "/{id}",
            get(get_department)
                .put(update_department)
                .delete(delete_department),
        )
}
