use std::sync::Arc;

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::TokenSigner;
use crate::config::Config;
use crate::db::Storage;
use crate::handlers::{attendance, auth, grades, roster};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub storage: Storage,
    pub signer: TokenSigner,
    pub api_key: Arc<str>,
}

impl AppState {
    pub fn new(storage: Storage, cfg: &Config) -> Self {
        Self {
            storage,
            signer: TokenSigner::new(&cfg.token_secret, cfg.token_ttl_minutes),
            api_key: Arc::from(cfg.api_key.as_str()),
        }
    }
}

pub fn rollcall_router(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/auth/me", get(auth::me))
        .route(
            "/students",
            post(roster::create_student).get(roster::list_students),
        )
        .route(
            "/students/{student_id}",
            get(roster::get_student)
                .put(roster::update_student)
                .delete(roster::delete_student),
        )
        .route("/students/{student_id}/grades", get(grades::student_grades))
        .route(
            "/courses",
            post(roster::create_course).get(roster::list_courses),
        )
        .route(
            "/courses/{course_id}",
            get(roster::get_course)
                .put(roster::update_course)
                .delete(roster::delete_course),
        )
        .route(
            "/courses/{course_id}/enrollments",
            post(roster::enroll_student).get(roster::list_enrollments),
        )
        .route(
            "/courses/{course_id}/enrollments/{student_id}",
            delete(roster::unenroll_student),
        )
        .route(
            "/courses/{course_id}/sessions",
            post(attendance::create_session).get(attendance::list_sessions),
        )
        .route(
            "/courses/{course_id}/attendance/summary",
            get(attendance::attendance_summary),
        )
        .route(
            "/courses/{course_id}/assessments",
            post(grades::create_assessment).get(grades::list_assessments),
        )
        .route(
            "/courses/{course_id}/grades/summary",
            get(grades::course_grades),
        )
        .route(
            "/sessions/{session_id}/attendance",
            get(attendance::list_attendance),
        )
        .route(
            "/sessions/{session_id}/attendance/bulk",
            post(attendance::upsert_attendance),
        )
        .route("/assessments/{assessment_id}/scores", get(grades::list_scores))
        .route(
            "/assessments/{assessment_id}/scores/bulk",
            post(grades::upsert_scores),
        )
        .layer(DefaultBodyLimit::max(body_limit_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
