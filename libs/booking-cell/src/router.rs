// libs/booking-cell/src/router.rs
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use shared_config::AppConfig;

use crate::handlers;

pub fn booking_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/{doctor_id}", get(handlers::get_doctor_detail))
        .route("/{doctor_id}/booking", post(handlers::confirm_booking))
        .with_state(state)
}
