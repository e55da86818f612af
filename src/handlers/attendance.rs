use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use crate::db::models::{DbAttendanceRecord, DbClassSession};
use crate::error::RollcallError;
use crate::middleware::{Principal, ValidJson, ValidPath};
use crate::router::AppState;
use crate::types::attendance::{AttendanceInput, AttendanceSummary, SessionInput};

pub async fn create_session(
    State(state): State<AppState>,
    ValidPath(course_id): ValidPath<i64>,
    _principal: Principal,
    ValidJson(input): ValidJson<SessionInput>,
) -> Result<impl IntoResponse, RollcallError> {
    let session = state.storage.create_session(course_id, input).await?;
    info!(course_id, session_id = session.id, date = %session.session_date, "session created");
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn list_sessions(
    State(state): State<AppState>,
    ValidPath(course_id): ValidPath<i64>,
    _principal: Principal,
) -> Result<Json<Vec<DbClassSession>>, RollcallError> {
    Ok(Json(state.storage.list_sessions(course_id).await?))
}

/// POST /sessions/{id}/attendance/bulk -> merges the marks, all or nothing.
pub async fn upsert_attendance(
    State(state): State<AppState>,
    ValidPath(session_id): ValidPath<i64>,
    principal: Principal,
    ValidJson(items): ValidJson<Vec<AttendanceInput>>,
) -> Result<impl IntoResponse, RollcallError> {
    let count = items.len();
    let records = state.storage.upsert_attendance(session_id, items).await?;
    info!(session_id, count, by = %principal.username, "attendance upserted");
    Ok((StatusCode::CREATED, Json(records)))
}

pub async fn list_attendance(
    State(state): State<AppState>,
    ValidPath(session_id): ValidPath<i64>,
    _principal: Principal,
) -> Result<Json<Vec<DbAttendanceRecord>>, RollcallError> {
    Ok(Json(state.storage.list_attendance(session_id).await?))
}

pub async fn attendance_summary(
    State(state): State<AppState>,
    ValidPath(course_id): ValidPath<i64>,
    _principal: Principal,
) -> Result<Json<AttendanceSummary>, RollcallError> {
    Ok(Json(state.storage.attendance_summary(course_id).await?))
}
