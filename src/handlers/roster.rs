use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use crate::db::models::{DbCourse, DbEnrollment, DbStudent};
use crate::error::RollcallError;
use crate::middleware::{Principal, ValidJson, ValidPath};
use crate::router::AppState;
use crate::types::roster::{CourseInput, EnrollmentInput, StudentInput};

pub async fn create_student(
    State(state): State<AppState>,
    _principal: Principal,
    ValidJson(input): ValidJson<StudentInput>,
) -> Result<impl IntoResponse, RollcallError> {
    let student = state.storage.create_student(input).await?;
    info!(student_id = student.id, "student created");
    Ok((StatusCode::CREATED, Json(student)))
}

pub async fn list_students(
    State(state): State<AppState>,
    _principal: Principal,
) -> Result<Json<Vec<DbStudent>>, RollcallError> {
    Ok(Json(state.storage.list_students().await?))
}

pub async fn get_student(
    State(state): State<AppState>,
    ValidPath(student_id): ValidPath<i64>,
    _principal: Principal,
) -> Result<Json<DbStudent>, RollcallError> {
    Ok(Json(state.storage.get_student(student_id).await?))
}

pub async fn update_student(
    State(state): State<AppState>,
    ValidPath(student_id): ValidPath<i64>,
    _principal: Principal,
    ValidJson(input): ValidJson<StudentInput>,
) -> Result<Json<DbStudent>, RollcallError> {
    Ok(Json(state.storage.update_student(student_id, input).await?))
}

pub async fn delete_student(
    State(state): State<AppState>,
    ValidPath(student_id): ValidPath<i64>,
    principal: Principal,
) -> Result<StatusCode, RollcallError> {
    state.storage.delete_student(student_id).await?;
    info!(student_id, by = %principal.username, "student deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_course(
    State(state): State<AppState>,
    _principal: Principal,
    ValidJson(input): ValidJson<CourseInput>,
) -> Result<impl IntoResponse, RollcallError> {
    let course = state.storage.create_course(input).await?;
    info!(course_id = course.id, "course created");
    Ok((StatusCode::CREATED, Json(course)))
}

pub async fn list_courses(
    State(state): State<AppState>,
    _principal: Principal,
) -> Result<Json<Vec<DbCourse>>, RollcallError> {
    Ok(Json(state.storage.list_courses().await?))
}

pub async fn get_course(
    State(state): State<AppState>,
    ValidPath(course_id): ValidPath<i64>,
    _principal: Principal,
) -> Result<Json<DbCourse>, RollcallError> {
    Ok(Json(state.storage.get_course(course_id).await?))
}

pub async fn update_course(
    State(state): State<AppState>,
    ValidPath(course_id): ValidPath<i64>,
    _principal: Principal,
    ValidJson(input): ValidJson<CourseInput>,
) -> Result<Json<DbCourse>, RollcallError> {
    Ok(Json(state.storage.update_course(course_id, input).await?))
}

pub async fn delete_course(
    State(state): State<AppState>,
    ValidPath(course_id): ValidPath<i64>,
    principal: Principal,
) -> Result<StatusCode, RollcallError> {
    state.storage.delete_course(course_id).await?;
    info!(course_id, by = %principal.username, "course deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn enroll_student(
    State(state): State<AppState>,
    ValidPath(course_id): ValidPath<i64>,
    _principal: Principal,
    ValidJson(input): ValidJson<EnrollmentInput>,
) -> Result<impl IntoResponse, RollcallError> {
    let enrollment = state
        .storage
        .enroll_student(course_id, input.student_id)
        .await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

pub async fn list_enrollments(
    State(state): State<AppState>,
    ValidPath(course_id): ValidPath<i64>,
    _principal: Principal,
) -> Result<Json<Vec<DbEnrollment>>, RollcallError> {
    Ok(Json(state.storage.list_enrollments(course_id).await?))
}

pub async fn unenroll_student(
    State(state): State<AppState>,
    ValidPath((course_id, student_id)): ValidPath<(i64, i64)>,
    _principal: Principal,
) -> Result<StatusCode, RollcallError> {
    state.storage.unenroll_student(course_id, student_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
