use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use doctor_cell::services::{HttpDoctorSource, MemoryNavigation, ModuloEnricher};
use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{BookingError, BookingRequest, DoctorDetailResponse};
use crate::services::DetailView;

async fn load_detail(state: &AppConfig, doctor_id: &str) -> DetailView<MemoryNavigation> {
    let mut view = DetailView::new(
        Arc::new(HttpDoctorSource::new(state)),
        Arc::new(ModuloEnricher),
        MemoryNavigation::new(format!("/doctor/{}", doctor_id)),
        doctor_id,
        Utc::now().date_naive(),
    );
    view.load().await;
    view
}

fn map_booking_error(error: BookingError) -> AppError {
    match error {
        BookingError::IncompleteSelection => AppError::ValidationError(error.to_string()),
        BookingError::DoctorNotFound => AppError::NotFound("Doctor not found".to_string()),
        BookingError::DateOutOfRange(_)
        | BookingError::InvalidDate(_)
        | BookingError::UnknownTimeSlot(_) => AppError::BadRequest(error.to_string()),
    }
}

// ==============================================================================
// PUBLIC HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_doctor_detail(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<DoctorDetailResponse>, AppError> {
    let view = load_detail(&state, &doctor_id).await;

    view.response()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Doctor not found".to_string()))
}

/// Validate a booking selection and confirm it. Nothing is persisted.
#[axum::debug_handler]
pub async fn confirm_booking(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        AppError::BadRequest(format!("Invalid booking request: {}", rejection.body_text()))
    })?;

    let mut view = load_detail(&state, &doctor_id).await;

    if view.doctor().is_none() {
        return Err(map_booking_error(BookingError::DoctorNotFound));
    }

    if let Some(date) = request.date.as_deref().filter(|d| !d.trim().is_empty()) {
        view.select_date_str(date).map_err(map_booking_error)?;
    }
    if let Some(label) = request.time_slot.as_deref().filter(|s| !s.trim().is_empty()) {
        view.select_time_slot_label(label).map_err(map_booking_error)?;
    }

    if !view.can_confirm() {
        return Err(AppError::ValidationError(format!(
            "{} ({})",
            BookingError::IncompleteSelection,
            view.prompt()
        )));
    }

    let confirmation = view.confirm().map_err(map_booking_error)?;

    Ok(Json(json!({
        "success": true,
        "booking": confirmation,
        "message": confirmation.message,
        "redirect": confirmation.redirect
    })))
}
