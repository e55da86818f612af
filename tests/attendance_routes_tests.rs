mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::{Value, json};

async fn seeded() -> (TestApp, i64, i64, i64, i64) {
    let t = TestApp::spawn().await;
    let course = t.create_course("Korean").await;
    let a = t.create_student("Ahn").await;
    let b = t.create_student("Baek").await;
    t.enroll(course, a).await;
    t.enroll(course, b).await;
    let session = t.create_session(course, "2024-03-04").await;
    (t, course, a, b, session)
}

#[tokio::test]
async fn duplicate_session_date_is_a_conflict() {
    let (t, course, ..) = seeded().await;

    let (status, err) = t
        .call(
            "POST",
            &format!("/courses/{course}/sessions"),
            Some(json!({ "session_date": "2024-03-04", "topic": "again" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"]["code"], "CONFLICT");

    let (status, _) = t
        .call(
            "POST",
            &format!("/courses/{course}/sessions"),
            Some(json!({ "session_date": "2024-03-05" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, sessions) = t
        .call("GET", &format!("/courses/{course}/sessions"), None)
        .await;
    let dates: Vec<&str> = sessions
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["session_date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2024-03-05", "2024-03-04"]);
}

#[tokio::test]
async fn session_for_unknown_course_is_not_found() {
    let t = TestApp::spawn().await;
    let (status, err) = t
        .call(
            "POST",
            "/courses/77/sessions",
            Some(json!({ "session_date": "2024-03-04" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn resubmitting_the_same_batch_is_idempotent() {
    let (t, _, a, b, session) = seeded().await;
    let uri = format!("/sessions/{session}/attendance/bulk");
    let batch = json!([
        { "student_id": a, "status": "present" },
        { "student_id": b, "status": "late", "memo": "bus" },
    ]);

    let (status, first) = t.call("POST", &uri, Some(batch.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first.as_array().unwrap().len(), 2);
    assert_eq!(first[1]["memo"], "bus");

    let (status, second) = t.call("POST", &uri, Some(batch)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first, second);

    let (_, stored) = t
        .call("GET", &format!("/sessions/{session}/attendance"), None)
        .await;
    assert_eq!(stored.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn later_batch_overwrites_status() {
    let (t, _, a, _, session) = seeded().await;
    let uri = format!("/sessions/{session}/attendance/bulk");

    let (_, first) = t
        .call("POST", &uri, Some(json!([{ "student_id": a, "status": "absent" }])))
        .await;
    let (status, second) = t
        .call(
            "POST",
            &uri,
            Some(json!([{ "student_id": a, "status": "excused", "memo": "note from home" }])),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(second[0]["id"], first[0]["id"]);
    assert_eq!(second[0]["status"], "excused");
    assert_eq!(second[0]["memo"], "note from home");

    let (_, stored) = t
        .call("GET", &format!("/sessions/{session}/attendance"), None)
        .await;
    assert_eq!(stored.as_array().unwrap().len(), 1);
    assert_eq!(stored[0]["status"], "excused");
}

#[tokio::test]
async fn unknown_student_aborts_the_whole_batch() {
    let (t, _, a, _, session) = seeded().await;

    let (status, err) = t
        .call(
            "POST",
            &format!("/sessions/{session}/attendance/bulk"),
            Some(json!([
                { "student_id": a, "status": "present" },
                { "student_id": 9999, "status": "present" },
            ])),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"]["code"], "NOT_FOUND");

    let (_, stored) = t
        .call("GET", &format!("/sessions/{session}/attendance"), None)
        .await;
    assert_eq!(stored, json!([]));
}

#[tokio::test]
async fn invalid_status_is_a_validation_error() {
    let (t, _, a, _, session) = seeded().await;

    let (status, err) = t
        .call(
            "POST",
            &format!("/sessions/{session}/attendance/bulk"),
            Some(json!([{ "student_id": a, "status": "tardy" }])),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn bulk_for_unknown_session_is_not_found() {
    let (t, _, a, ..) = seeded().await;
    let (status, _) = t
        .call(
            "POST",
            "/sessions/555/attendance/bulk",
            Some(json!([{ "student_id": a, "status": "present" }])),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn summary_counts_every_status() {
    let (t, course, a, b, first) = seeded().await;
    let second = t.create_session(course, "2024-03-05").await;

    for (session, marks) in [
        (first, json!([
            { "student_id": a, "status": "present" },
            { "student_id": b, "status": "late" },
        ])),
        (second, json!([
            { "student_id": a, "status": "absent" },
            { "student_id": b, "status": "present" },
        ])),
    ] {
        let (status, _) = t
            .call("POST", &format!("/sessions/{session}/attendance/bulk"), Some(marks))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, summary) = t
        .call("GET", &format!("/courses/{course}/attendance/summary"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        summary,
        json!({
            "course_id": course,
            "session_count": 2,
            "present": 2,
            "late": 1,
            "absent": 1,
            "excused": 0,
        })
    );
}

#[tokio::test]
async fn summary_without_sessions_is_all_zero() {
    let t = TestApp::spawn().await;
    let course = t.create_course("Art").await;

    let (status, summary) = t
        .call("GET", &format!("/courses/{course}/attendance/summary"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    for field in ["session_count", "present", "late", "absent", "excused"] {
        assert_eq!(summary[field], Value::from(0), "{field}");
    }

    let (status, _) = t.call("GET", "/courses/31337/attendance/summary", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
