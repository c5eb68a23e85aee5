use axum::{Router, routing::get};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route(
        "/api/teachers",
        get(handlers::teacher::list_teachers).post(handlers::teacher::create_teacher),
    )
}
