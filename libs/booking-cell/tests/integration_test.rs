use std::sync::Arc;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Days, Utc};
use serde_json::json;
use tower::ServiceExt;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path};

use booking_cell::router::booking_routes;
use shared_config::AppConfig;
use shared_utils::test_utils::{MockDoctorResponses, TestConfig};

async fn create_test_app(config: Arc<AppConfig>) -> Router {
    booking_routes(config)
}

async fn setup_app_with_doctors() -> (MockServer, Router) {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(MockDoctorResponses::SOURCE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockDoctorResponses::five_doctors()))
        .mount(&mock_server)
        .await;

    let app = create_test_app(TestConfig::with_mock_uri(&mock_server.uri()).to_arc()).await;
    (mock_server, app)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn booking_request(doctor_id: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/{}/booking", doctor_id))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_get_doctor_detail() {
    let (_mock_server, app) = setup_app_with_doctors().await;

    let (status, json) = send(app, get("/2")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["doctor"]["name"], "Asha Mehta");
    assert_eq!(json["doctor"]["type"], "General Physician");
    assert_eq!(json["doctor"]["location"], "Apex Multispeciality and Maternity");
    assert_eq!(json["days"].as_array().unwrap().len(), 7);
    assert_eq!(json["days"][0]["iso_date"], Utc::now().date_naive().to_string());
    assert_eq!(json["time_slots"].as_array().unwrap().len(), 18);
    assert_eq!(json["time_slots"][0], "9:00 AM");
    assert_eq!(json["prompt"], "Please select date and time to book");
}

#[tokio::test]
async fn test_get_unknown_doctor_is_not_found() {
    let (_mock_server, app) = setup_app_with_doctors().await;

    let (status, json) = send(app.clone(), get("/404")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Doctor not found");
    assert_eq!(json["back"], "/");

    let (status, _) = send(app, get("/not-a-number")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_source_failure_is_not_found() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(MockDoctorResponses::SOURCE_PATH))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let app = create_test_app(TestConfig::with_mock_uri(&mock_server.uri()).to_arc()).await;
    let (status, _) = send(app, get("/1")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_confirm_booking() {
    let (_mock_server, app) = setup_app_with_doctors().await;
    let date = Utc::now().date_naive().checked_add_days(Days::new(1)).unwrap();

    let (status, json) = send(
        app,
        booking_request("4", json!({ "date": date.to_string(), "time_slot": "3:30 PM" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(
        json["message"],
        format!("Booking confirmed for Dr. Kavya Iyer on {} at 3:30 PM", date)
    );
    assert_eq!(json["redirect"], "/");
    assert_eq!(json["booking"]["time_slot"], "3:30 PM");
}

#[tokio::test]
async fn test_confirm_with_date_only_is_rejected() {
    let (_mock_server, app) = setup_app_with_doctors().await;
    let today = Utc::now().date_naive();

    let (status, json) = send(app, booking_request("4", json!({ "date": today.to_string() }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["error"],
        "Please select both date and time slot (Please select a time slot)"
    );
}

#[tokio::test]
async fn test_confirm_rejects_out_of_window_date_and_unknown_slot() {
    let (_mock_server, app) = setup_app_with_doctors().await;
    let too_late = Utc::now().date_naive().checked_add_days(Days::new(10)).unwrap();

    let (status, _) = send(
        app.clone(),
        booking_request("1", json!({ "date": too_late.to_string(), "time_slot": "9:00 AM" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = send(
        app,
        booking_request("1", json!({ "date": Utc::now().date_naive().to_string(), "time_slot": "8:00 PM" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Unknown time slot: 8:00 PM");
}

#[tokio::test]
async fn test_confirm_unknown_doctor() {
    let (_mock_server, app) = setup_app_with_doctors().await;

    let (status, _) = send(
        app,
        booking_request("77", json!({ "date": Utc::now().date_naive().to_string(), "time_slot": "9:00 AM" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_booking_body_uses_error_shape() {
    let (_mock_server, app) = setup_app_with_doctors().await;

    let missing_content_type = Request::builder()
        .method("POST")
        .uri("/2/booking")
        .body(Body::from("date=today"))
        .unwrap();
    let (status, json) = send(app.clone(), missing_content_type).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().starts_with("Invalid booking request"));

    let broken_json = Request::builder()
        .method("POST")
        .uri("/2/booking")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"date\":"))
        .unwrap();
    let (status, json) = send(app, broken_json).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}
