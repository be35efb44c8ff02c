//! HTTP-level integration tests for the refactoring lifecycle endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener. Records live in an in-memory store and
//! the mock backend answers instantly.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use common::{body_json, get, post_json, wait_for_terminal, SAMPLE_CODE};
use refactorer_intelligence::mock::{REFACTORED_CODE, REFACTOR_EXPLANATION};
use refactorer_intelligence::MockBackend;
use serde_json::json;

async fn submit(app: &axum::Router, body: serde_json::Value) -> serde_json::Value {
    let response = post_json(app.clone(), "/api/v1/refactoring", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Submission and lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submit_returns_processing_snapshot() {
    let app = common::build_app_with(Arc::new(
        MockBackend::new().with_latency(Duration::from_secs(60)),
    ));

    let data = submit(&app, json!({ "original_code": SAMPLE_CODE })).await;

    assert_eq!(data["status"], "processing");
    assert_eq!(data["original_code"], SAMPLE_CODE);
    assert!(data["refactored_code"].is_null());
    assert!(data["explanation"].is_null());
    assert!(data["analysis_result"].is_null());
    assert_eq!(data["feedback"], json!([]));
    assert!(uuid::Uuid::parse_str(data["id"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn submit_detects_language_when_omitted() {
    let app = common::build_test_app();

    let data = submit(&app, json!({ "original_code": SAMPLE_CODE })).await;

    assert_eq!(data["language"], "python");
}

#[tokio::test]
async fn submit_keeps_explicit_language_and_focus_areas() {
    let app = common::build_test_app();

    let data = submit(
        &app,
        json!({
            "original_code": SAMPLE_CODE,
            "language": "cobol",
            "focus_areas": ["performance"],
        }),
    )
    .await;

    assert_eq!(data["language"], "cobol");
    assert_eq!(data["focus_areas"], json!(["performance"]));
}

#[tokio::test]
async fn sample_submission_completes_with_analysis() {
    let app = common::build_test_app();
    let created = submit(
        &app,
        json!({ "original_code": SAMPLE_CODE, "language": "python" }),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let data = wait_for_terminal(&app, id).await;

    assert_eq!(data["status"], "completed");
    assert_eq!(data["refactored_code"], REFACTORED_CODE);
    assert_eq!(data["explanation"], REFACTOR_EXPLANATION);
    assert_eq!(data["analysis_result"]["complexity_score"], 3);
    assert_eq!(data["analysis_result"]["readability_score"], 7);
    assert_eq!(data["analysis_result"]["issues"][0]["type"], "readability");
    assert_eq!(data["original_code"], SAMPLE_CODE);
}

#[tokio::test]
async fn backend_failure_marks_record_failed() {
    let app = common::build_app_with(Arc::new(
        MockBackend::new()
            .with_latency(Duration::ZERO)
            .failing("quota exceeded"),
    ));
    let created = submit(&app, json!({ "original_code": SAMPLE_CODE })).await;

    let data = wait_for_terminal(&app, created["id"].as_str().unwrap()).await;

    assert_eq!(data["status"], "failed");
    assert_eq!(
        data["explanation"],
        "Refactoring failed: Backend unavailable: quota exceeded"
    );
    assert!(data["refactored_code"].is_null());
    assert!(data["analysis_result"].is_null());
}

#[tokio::test]
async fn terminal_snapshot_is_stable_across_reads() {
    let app = common::build_test_app();
    let created = submit(&app, json!({ "original_code": SAMPLE_CODE })).await;
    let id = created["id"].as_str().unwrap();

    let first = wait_for_terminal(&app, id).await;
    let second = body_json(get(app.clone(), &format!("/api/v1/refactoring/{id}")).await).await;

    assert_eq!(first, second["data"]);
}

#[tokio::test]
async fn concurrent_submissions_get_distinct_ids() {
    let app = common::build_test_app();

    let responses = futures::future::join_all((0..8).map(|i| {
        post_json(
            app.clone(),
            "/api/v1/refactoring",
            json!({ "original_code": format!("def f{i}():\n    return {i}") }),
        )
    }))
    .await;

    let mut ids = Vec::new();
    for response in responses {
        assert_eq!(response.status(), StatusCode::CREATED);
        ids.push(body_json(response).await["data"]["id"].as_str().unwrap().to_string());
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 8);

    for id in &ids {
        assert_eq!(wait_for_terminal(&app, id).await["status"], "completed");
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_code_is_a_validation_error() {
    let app = common::build_test_app();

    let response = post_json(app, "/api/v1/refactoring", json!({ "language": "python" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "code must not be empty");
}

#[tokio::test]
async fn blank_focus_area_is_rejected() {
    let app = common::build_test_app();

    let response = post_json(
        app,
        "/api/v1/refactoring",
        json!({ "original_code": SAMPLE_CODE, "focus_areas": ["  "] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Lookup and listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_id_returns_404() {
    let app = common::build_test_app();
    let id = uuid::Uuid::now_v7();

    let response = get(app, &format!("/api/v1/refactoring/{id}")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], format!("Refactoring with id {id} not found"));
}

#[tokio::test]
async fn malformed_id_returns_404() {
    let app = common::build_test_app();

    let response = get(app, "/api/v1/refactoring/not-a-uuid").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[tokio::test]
async fn list_pages_in_creation_order() {
    let app = common::build_test_app();
    let mut ids = Vec::new();
    for i in 0..3 {
        let data = submit(
            &app,
            json!({ "original_code": format!("def f{i}():\n    return {i}") }),
        )
        .await;
        ids.push(data["id"].as_str().unwrap().to_string());
    }

    let all = body_json(get(app.clone(), "/api/v1/refactoring").await).await;
    let listed: Vec<&str> = all["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(listed, ids);

    let page = body_json(get(app, "/api/v1/refactoring?skip=1&limit=1").await).await;
    let page = page["data"].as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["id"], ids[1]);
}

#[tokio::test]
async fn languages_lists_known_table() {
    let app = common::build_test_app();

    let response = get(app, "/api/v1/refactoring/languages").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let languages = json["data"].as_object().unwrap();
    assert_eq!(languages.len(), 20);
    assert_eq!(languages["python"], ".py");
    assert_eq!(languages["rust"], ".rs");
}

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

#[tokio::test]
async fn feedback_rating_bounds() {
    let app = common::build_test_app();
    let created = submit(&app, json!({ "original_code": SAMPLE_CODE })).await;
    let uri = format!("/api/v1/refactoring/{}/feedback", created["id"].as_str().unwrap());

    for rating in [0, 6] {
        let response = post_json(app.clone(), &uri, json!({ "rating": rating })).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "rating {rating}");
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }

    let response = post_json(app.clone(), &uri, json!({ "comment": "no rating" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        app.clone(),
        &uri,
        json!({ "rating": 3, "comment": "Decent" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let entry = body_json(response).await["data"].clone();
    assert_eq!(entry["rating"], 3);
    assert_eq!(entry["comment"], "Decent");
    assert_eq!(entry["refactoring_id"], created["id"]);
}

#[tokio::test]
async fn feedback_is_listed_and_attached_to_snapshot() {
    let app = common::build_test_app();
    let created = submit(&app, json!({ "original_code": SAMPLE_CODE })).await;
    let id = created["id"].as_str().unwrap();
    let uri = format!("/api/v1/refactoring/{id}/feedback");

    post_json(app.clone(), &uri, json!({ "rating": 5 })).await;
    post_json(app.clone(), &uri, json!({ "rating": 2, "comment": "meh" })).await;

    let listed = body_json(get(app.clone(), &uri).await).await;
    let ratings: Vec<i64> = listed["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["rating"].as_i64().unwrap())
        .collect();
    assert_eq!(ratings, vec![5, 2]);

    let snapshot = wait_for_terminal(&app, id).await;
    assert_eq!(snapshot["feedback"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn feedback_for_unknown_record_returns_404() {
    let app = common::build_test_app();
    let id = uuid::Uuid::now_v7();

    let response = post_json(
        app,
        &format!("/api/v1/refactoring/{id}/feedback"),
        json!({ "rating": 4 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}
