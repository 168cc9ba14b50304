use axum::{
    Router,
    middleware,
    routing::{get, post},
};

use crate::middleware::role::require_staff;
use crate::modules::results::controller::{
    get_results, import_results, record_result, report_card, result_import_template,
};
use crate::state::AppState;

/// Result recording and import are staff-only; the report card route does
/// its own check so students can read their own.
pub fn init_results_router(state: AppState) -> Router<AppState> {
    let staff_routes = Router::new()
        .route("/", post(record_result).get(get_results))
        .route("/import", post(import_results))
        .route("/import/template", get(result_import_template))
        .route_layer(middleware::from_fn_with_state(state, require_staff));

    staff_routes.route("/students/{student_id}/report-card", get(report_card))
}
