use axum::{
    Router,
    routing::get,
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/timetable",
            get(handlers::timetable::list_slots).post(handlers::timetable::create_slot),
        )
        .route("/api/timetable/grid", get(handlers::timetable::get_grid))
        .route(
            "/api/timetable/conflicts",
            get(handlers::timetable::check_conflict),
        )
        .route("/api/timetable/periods", get(handlers::timetable::list_periods))
        .route(
            "/api/timetable/:id",
            get(handlers::timetable::get_slot)
                .put(handlers::timetable::update_slot)
                .delete(handlers::timetable::delete_slot),
        )
}
