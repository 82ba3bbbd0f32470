use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use benefits_common::ModuleVersion;
use benefits_common::test_utils::{available_module, current_module, date};
use serde_json::{Value, json};
use tower::ServiceExt;

use super::router;
use crate::domain::Clock;
use crate::domain::claims::ReceiptPolicy;
use crate::infrastructure::AppStateImpl;

const BODY_LIMIT: usize = 1024 * 1024;
const BOUNDARY: &str = "receipt-upload-boundary";

fn seed() -> Vec<ModuleVersion> {
    vec![
        available_module("Medical", "1.0.0", "1.1.0", "2025-03-10"),
        current_module("Dental", "1.2.0", "2025-03-01"),
    ]
}

fn clock() -> Clock {
    Clock::frozen(date("2025-03-12").and_hms_opt(9, 0, 0).unwrap().and_utc())
}

fn app(seed: Vec<ModuleVersion>) -> Router {
    router(AppStateImpl::in_memory(seed, clock()), BODY_LIMIT)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    read(app, request).await
}

async fn read(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), BODY_LIMIT)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn upload_request(file_name: &str, content_type: &str, bytes: &[u8], extract: bool) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(
        format!(
            "\r\n--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"extract\"\r\n\r\n{extract}\r\n--{BOUNDARY}--\r\n"
        )
        .as_bytes(),
    );

    Request::builder()
        .method(Method::POST)
        .uri("/api/claims/receipts")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn total(app: &Router) -> u64 {
    let (_, body) = send(app, Method::GET, "/api/releases", None).await;
    body["meta"]["total"].as_u64().unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let app = app(seed());

    let (status, _) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn lists_and_filters_releases() {
    let app = app(seed());

    let (status, body) = send(&app, Method::GET, "/api/releases", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 2);
    assert_eq!(body["data"][0]["moduleName"], "Medical");
    assert_eq!(body["data"][0]["newVersion"], "1.1.0");
    assert_eq!(body["data"][1]["newVersion"], Value::Null);

    let (_, body) = send(&app, Method::GET, "/api/releases?status=available", None).await;
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["status"], "available");

    let (_, body) = send(&app, Method::GET, "/api/releases?module=dental", None).await;
    assert_eq!(body["data"][0]["currentVersion"], "1.2.0");

    let (status, _) = send(&app, Method::GET, "/api/releases?status=retired", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn activation_swaps_versions_and_appends_entry() {
    let seed = seed();
    let app = app(seed.clone());
    let uri = format!("/api/releases/{}/activate", seed[0].id);

    let (status, body) = send(&app, Method::POST, &uri, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["currentVersion"], "1.1.0");
    assert_eq!(body["data"]["newVersion"], Value::Null);
    assert_eq!(body["data"]["status"], "current");
    assert_eq!(body["appended"]["status"], "current");
    assert_eq!(total(&app).await, 3);

    let (status, body) = send(&app, Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status_code"], 409);
}

#[tokio::test]
async fn schedule_outside_window_changes_nothing() {
    let seed = seed();
    let app = app(seed.clone());
    let uri = format!("/api/releases/{}/schedule", seed[0].id);

    let (status, body) = send(
        &app,
        Method::POST,
        &uri,
        Some(json!({ "date": "2025-03-26", "time": "10:00" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["data"]["message"],
        "Scheduled time must be within 14 days of the release date"
    );

    let (_, body) = send(&app, Method::GET, &format!("/api/releases/{}", seed[0].id), None).await;
    assert_eq!(body["data"]["status"], "available");
    assert_eq!(body["data"]["scheduledDate"], Value::Null);
}

#[tokio::test]
async fn schedule_within_window() {
    let seed = seed();
    let app = app(seed.clone());
    let uri = format!("/api/releases/{}/schedule", seed[0].id);

    let (status, body) = send(&app, Method::POST, &uri, Some(json!({ "date": "2025-03-20" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["data"]["message"], "Please select both date and time");

    let (status, body) = send(
        &app,
        Method::POST,
        &uri,
        Some(json!({ "date": "2025-03-20", "time": "10:00" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "scheduled");
    assert_eq!(body["data"]["scheduledDate"], "2025-03-20T10:00:00Z");
    assert_eq!(body["appended"], Value::Null);
    assert_eq!(total(&app).await, 2);
}

#[tokio::test]
async fn deactivation_needs_reason() {
    let seed = seed();
    let app = app(seed.clone());
    let uri = format!("/api/releases/{}/deactivate", seed[1].id);

    let (status, body) = send(&app, Method::POST, &uri, Some(json!({ "reason": "  " }))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["data"]["message"], "Please provide a reason for deactivation");
    assert_eq!(total(&app).await, 2);
}

#[tokio::test]
async fn malformed_bodies_use_error_envelope() {
    let seed = seed();
    let app = app(seed.clone());
    let uri = format!("/api/releases/{}/deactivate", seed[1].id);

    let (status, body) = send(&app, Method::POST, &uri, Some(json!({ "reason": 5 }))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status_code"], 422);
    assert!(body["data"]["message"].is_string());
    assert_eq!(total(&app).await, 2);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/releases")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"moduleName\":"))
        .unwrap();
    let (status, body) = read(&app, request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status_code"], 422);
    assert_eq!(total(&app).await, 2);
}

#[tokio::test]
async fn scheduled_release_date_is_fixed() {
    let seed = seed();
    let app = app(seed.clone());
    let uri = format!("/api/releases/{}", seed[0].id);
    send(
        &app,
        Method::POST,
        &format!("{uri}/schedule"),
        Some(json!({ "date": "2025-03-20", "time": "10:00" })),
    )
    .await;

    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({ "releaseDate": "2024-01-01" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status_code"], 409);

    let (_, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(body["data"]["status"], "scheduled");
    assert_eq!(body["data"]["releaseDate"], "2025-03-10");
    assert_eq!(body["data"]["scheduledDate"], "2025-03-20T10:00:00Z");
}

#[tokio::test]
async fn deactivation_appends_patch_release() {
    let seed = seed();
    let app = app(seed.clone());
    let uri = format!("/api/releases/{}/deactivate", seed[1].id);

    let (status, body) = send(
        &app,
        Method::POST,
        &uri,
        Some(json!({ "reason": "security issue" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isActive"], false);
    assert_eq!(body["data"]["deactivationReason"], "security issue");
    assert_eq!(body["appended"]["currentVersion"], "1.2.1");
    assert_eq!(body["appended"]["status"], "current");
    assert_eq!(body["appended"]["releaseDate"], "2025-03-12");
    assert_eq!(total(&app).await, 3);

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/api/releases/{}", seed[1].id),
        Some(json!({ "moduleName": "Dental Plus" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn history_groups_by_module() {
    let seed = seed();
    let app = app(seed.clone());
    send(&app, Method::POST, &format!("/api/releases/{}/activate", seed[0].id), None).await;

    let (status, body) = send(&app, Method::GET, "/api/releases/history", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["moduleName"], "Medical");
    assert_eq!(body["data"][0]["versions"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"][1]["moduleName"], "Dental");
}

#[tokio::test]
async fn creates_and_updates_releases() {
    let app = app(seed());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/releases",
        Some(json!({
            "moduleName": "Vision",
            "currentVersion": "3.0",
            "newVersion": "3.1",
            "releaseDate": "2025-03-11",
            "newVersionNotes": { "features": ["Online eye exam booking"] }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "available");
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/releases/{id}"),
        Some(json!({ "moduleName": "Vision Care" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["moduleName"], "Vision Care");
    assert_eq!(body["data"]["newVersion"], "3.1");

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/api/releases/missing",
        Some(json!({ "moduleName": "Nobody" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/releases",
        Some(json!({ "moduleName": "Life", "currentVersion": "v2", "releaseDate": "2025-03-11" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn renders_release_notes() {
    let seed = seed();
    let app = app(seed.clone());

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/releases/{}/notes/1.1.0", seed[0].id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sections"][0]["title"], "New Features");
    assert_eq!(body["sections"][0]["items"][0], "Medical 1.1.0");

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/releases/{}/notes/9.9.9", seed[0].id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn receipt_upload_and_manual_submission() {
    let app = app(seed());

    let (status, body) = read(&app, upload_request("visit.pdf", "application/pdf", b"%PDF-1.4", false)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "ready");
    assert_eq!(body["data"]["contentType"], "application/pdf");
    assert_eq!(body["data"]["extracted"], Value::Null);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/claims/receipts/{id}/submit"),
        Some(json!({ "providerName": "", "serviceDate": "2025-03-10", "amount": 40.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["data"]["message"], "Provider name is required");

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/claims/receipts/{id}/submit"),
        Some(json!({
            "providerName": "Corner Drugstore",
            "serviceDate": "2025-03-10",
            "amount": 40.0,
            "category": "pharmacy"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "submitted");

    let (status, _) = send(&app, Method::GET, &format!("/api/claims/receipts/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::DELETE, &format!("/api/claims/receipts/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn discarding_a_receipt_session() {
    let app = app(seed());

    let (_, body) = read(&app, upload_request("visit.pdf", "application/pdf", b"%PDF-1.4", false)).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(&app, Method::DELETE, &format!("/api/claims/receipts/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &format!("/api/claims/receipts/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rejects_unsupported_receipts() {
    let app = app(seed());

    let (status, body) = read(&app, upload_request("notes.txt", "text/plain", b"hello", true)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["data"]["message"],
        "Invalid file type. Please upload a JPEG, PNG, HEIC or PDF file."
    );
}

#[tokio::test]
async fn rejects_oversized_receipts() {
    let state = AppStateImpl::in_memory(seed(), clock()).with_receipt_policy(ReceiptPolicy::new(16));
    let app = router(state, BODY_LIMIT);

    let (status, body) = read(&app, upload_request("scan.png", "image/png", &[7; 64], true)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["data"]["message"], "File size must be less than 16 bytes");
}

#[tokio::test]
async fn unknown_routes() {
    let app = app(seed());

    let (status, body) = send(&app, Method::GET, "/api/dashboard", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status_code"], 404);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/dashboard").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");
}
