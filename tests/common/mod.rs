#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use rollcall::{AppState, Config, Storage, rollcall_router};
use serde_json::Value;
use std::{
    fs,
    path::PathBuf,
    sync::atomic::{AtomicUsize, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

pub const API_KEY: &str = "test-key";
pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

static DB_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Router wired to a throwaway SQLite file.
pub struct TestApp {
    pub app: Router,
    pub storage: Storage,
    db_path: PathBuf,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_limit(Config::default().body_limit_bytes).await
    }

    pub async fn spawn_with_limit(body_limit_bytes: usize) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();
        let mut db_path = std::env::temp_dir();
        db_path.push(format!(
            "rollcall-test-{}-{}-{}.sqlite",
            std::process::id(),
            nanos,
            DB_COUNTER.fetch_add(1, Ordering::SeqCst)
        ));

        let cfg = Config {
            database_url: format!("sqlite:{}", db_path.display()),
            api_key: API_KEY.to_string(),
            token_secret: "test-secret".to_string(),
            body_limit_bytes,
            ..Config::default()
        };

        let storage = Storage::connect(&cfg.database_url)
            .await
            .expect("failed to open test database");
        storage
            .seed_admin(ADMIN_USER, ADMIN_PASSWORD)
            .await
            .expect("failed to seed admin");

        let state = AppState::new(storage.clone(), &cfg);
        let app = rollcall_router(state, cfg.body_limit_bytes);
        Self {
            app,
            storage,
            db_path,
        }
    }

    /// Send a request authenticated with the service key.
    pub async fn call(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-api-key", API_KEY);
        self.send(req, body).await
    }

    /// Send a request authenticated with a bearer token.
    pub async fn call_as(
        &self,
        token: &str,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", format!("Bearer {token}"));
        self.send(req, body).await
    }

    /// Send a request with no credentials.
    pub async fn call_anonymous(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let req = Request::builder().method(method).uri(uri);
        self.send(req, body).await
    }

    pub async fn send(
        &self,
        req: axum::http::request::Builder,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let req = match body {
            Some(json) => req
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => req.body(Body::empty()),
        }
        .expect("failed to build request");
        self.send_raw(req).await
    }

    pub async fn send_raw(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self.app.clone().oneshot(req).await.expect("request failed");
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, json)
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .call_anonymous(
                "POST",
                "/auth/login",
                Some(serde_json::json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["access_token"]
            .as_str()
            .expect("access_token missing")
            .to_string()
    }

    pub async fn create_student(&self, name: &str) -> i64 {
        let (status, body) = self
            .call(
                "POST",
                "/students",
                Some(serde_json::json!({ "full_name": name })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create student failed: {body}");
        body["id"].as_i64().expect("student id")
    }

    pub async fn create_course(&self, name: &str) -> i64 {
        let (status, body) = self
            .call("POST", "/courses", Some(serde_json::json!({ "name": name })))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create course failed: {body}");
        body["id"].as_i64().expect("course id")
    }

    pub async fn create_session(&self, course_id: i64, date: &str) -> i64 {
        let (status, body) = self
            .call(
                "POST",
                &format!("/courses/{course_id}/sessions"),
                Some(serde_json::json!({ "session_date": date })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create session failed: {body}");
        body["id"].as_i64().expect("session id")
    }

    pub async fn create_assessment(&self, course_id: i64, name: &str, weight: f64, max_score: f64) -> i64 {
        let (status, body) = self
            .call(
                "POST",
                &format!("/courses/{course_id}/assessments"),
                Some(serde_json::json!({ "name": name, "weight": weight, "max_score": max_score })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create assessment failed: {body}");
        body["id"].as_i64().expect("assessment id")
    }

    pub async fn enroll(&self, course_id: i64, student_id: i64) {
        let (status, body) = self
            .call(
                "POST",
                &format!("/courses/{course_id}/enrollments"),
                Some(serde_json::json!({ "student_id": student_id })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "enroll failed: {body}");
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.db_path);
        for suffix in ["-wal", "-shm"] {
            let mut side = self.db_path.clone().into_os_string();
            side.push(suffix);
            let _ = fs::remove_file(side);
        }
    }
}
