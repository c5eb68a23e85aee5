use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use schooldesk_core::{
    grid::TimetableGrid,
    models::{
        period::PeriodTime,
        timetable::{ConflictQuery, ConflictResponse, NewSlot, SlotChanges, SlotQuery, TimetableSlot},
    },
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridQuery {
    pub class_id: String,
    pub stream_id: Option<String>,
}

#[axum::debug_handler]
pub async fn list_slots(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<SlotQuery>,
) -> Json<Vec<TimetableSlot>> {
    let slots = state
        .timetable
        .get_slots(query.class_id.as_deref(), query.stream_id.as_deref())
        .await;

    Json(slots)
}

#[axum::debug_handler]
pub async fn get_slot(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TimetableSlot>, AppError> {
    let slot = state.timetable.get_slot(id).await?;
    Ok(Json(slot))
}

#[axum::debug_handler]
pub async fn create_slot(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<NewSlot>,
) -> Result<(StatusCode, Json<TimetableSlot>), AppError> {
    let slot = state.timetable.add_slot(payload).await?;
    tracing::info!(
        "Scheduled {} for class {} on {} period {}",
        slot.subject, slot.class_id, slot.day, slot.period
    );

    Ok((StatusCode::CREATED, Json(slot)))
}

#[axum::debug_handler]
pub async fn update_slot(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SlotChanges>,
) -> Result<Json<TimetableSlot>, AppError> {
    let slot = state.timetable.update_slot(id, payload).await?;
    Ok(Json(slot))
}

/// Always 204: deleting a lesson that is already gone is not an error.
#[axum::debug_handler]
pub async fn delete_slot(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.timetable.delete_slot(id).await?.is_some() {
        tracing::info!("Removed lesson {}", id);
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Pre-submission check used by the lesson form. Writes are checked again.
#[axum::debug_handler]
pub async fn check_conflict(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ConflictQuery>,
) -> Json<ConflictResponse> {
    Json(state.timetable.check_conflict(&query).await)
}

#[axum::debug_handler]
pub async fn get_grid(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<GridQuery>,
) -> Json<TimetableGrid> {
    let grid = state
        .timetable
        .grid(&query.class_id, query.stream_id.as_deref())
        .await;

    Json(grid)
}

#[axum::debug_handler]
pub async fn list_periods(State(state): State<Arc<ApiState>>) -> Json<Vec<PeriodTime>> {
    let periods = state.timetable.periods().await;
    Json(periods.iter().cloned().collect())
}
