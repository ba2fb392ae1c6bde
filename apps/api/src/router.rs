use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use booking_cell::router::booking_routes;
use doctor_cell::router::doctor_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Doctor directory API is running!" }))
        .nest("/doctors", doctor_routes(state.clone()))
        .nest("/doctor", booking_routes(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::{Request, StatusCode}};
    use tower::ServiceExt;

    fn app() -> Router {
        // Nothing listens here; routes that fetch fall back to empty or 404.
        create_router(Arc::new(AppConfig::with_source_url("http://127.0.0.1:9/doctors.json")))
    }

    async fn get_status(uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_liveness() {
        let (status, body) = get_status("/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"Doctor directory API is running!");
    }

    #[tokio::test]
    async fn test_cells_are_mounted() {
        let (status, body) = get_status("/doctors?search=asha").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["total"], 0);

        let (status, _) = get_status("/doctor/1").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = get_status("/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
