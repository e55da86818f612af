use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use crate::db::models::{DbAssessment, DbScore};
use crate::error::RollcallError;
use crate::middleware::{Principal, ValidJson, ValidPath};
use crate::router::AppState;
use crate::types::grades::{AssessmentInput, CourseGradeSummary, GradeSummary, ScoreInput};

pub async fn create_assessment(
    State(state): State<AppState>,
    ValidPath(course_id): ValidPath<i64>,
    _principal: Principal,
    ValidJson(input): ValidJson<AssessmentInput>,
) -> Result<impl IntoResponse, RollcallError> {
    let assessment = state.storage.create_assessment(course_id, input).await?;
    info!(course_id, assessment_id = assessment.id, "assessment created");
    Ok((StatusCode::CREATED, Json(assessment)))
}

pub async fn list_assessments(
    State(state): State<AppState>,
    ValidPath(course_id): ValidPath<i64>,
    _principal: Principal,
) -> Result<Json<Vec<DbAssessment>>, RollcallError> {
    Ok(Json(state.storage.list_assessments(course_id).await?))
}

/// POST /assessments/{id}/scores/bulk -> merges the scores, all or nothing.
pub async fn upsert_scores(
    State(state): State<AppState>,
    ValidPath(assessment_id): ValidPath<i64>,
    principal: Principal,
    ValidJson(items): ValidJson<Vec<ScoreInput>>,
) -> Result<impl IntoResponse, RollcallError> {
    let count = items.len();
    let scores = state.storage.upsert_scores(assessment_id, items).await?;
    info!(assessment_id, count, by = %principal.username, "scores upserted");
    Ok((StatusCode::CREATED, Json(scores)))
}

pub async fn list_scores(
    State(state): State<AppState>,
    ValidPath(assessment_id): ValidPath<i64>,
    _principal: Principal,
) -> Result<Json<Vec<DbScore>>, RollcallError> {
    Ok(Json(state.storage.list_scores(assessment_id).await?))
}

pub async fn student_grades(
    State(state): State<AppState>,
    ValidPath(student_id): ValidPath<i64>,
    _principal: Principal,
) -> Result<Json<Vec<GradeSummary>>, RollcallError> {
    Ok(Json(state.storage.student_grades(student_id).await?))
}

pub async fn course_grades(
    State(state): State<AppState>,
    ValidPath(course_id): ValidPath<i64>,
    _principal: Principal,
) -> Result<Json<CourseGradeSummary>, RollcallError> {
    Ok(Json(state.storage.course_grades(course_id).await?))
}
