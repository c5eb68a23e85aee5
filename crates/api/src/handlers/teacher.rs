use axum::{Json, extract::State, http::StatusCode};
use schooldesk_core::{
    errors::SchoolError,
    models::teacher::{CreateTeacherRequest, TeacherRecord},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn list_teachers(State(state): State<Arc<ApiState>>) -> Json<Vec<TeacherRecord>> {
    Json(state.teachers.list())
}

/// Registers or updates a teacher. Lessons pick up the new details on their
/// next read; stored snapshots are not rewritten.
#[axum::debug_handler]
pub async fn create_teacher(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateTeacherRequest>,
) -> Result<(StatusCode, Json<TeacherRecord>), AppError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError(SchoolError::Validation("name is required".to_string())));
    }

    let id = payload
        .id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let record = TeacherRecord {
        id,
        name: name.to_string(),
        contact: payload.contact,
        subject: payload.subject,
    };

    let saved = state.teacher_repo.upsert_teacher(&record).await?;
    state.teachers.upsert(saved.clone());
    tracing::debug!("Registered teacher {} ({})", saved.name, saved.id);

    Ok((StatusCode::CREATED, Json(saved)))
}
