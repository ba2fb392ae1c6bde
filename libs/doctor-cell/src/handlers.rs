use std::sync::Arc;

use axum::{
    extract::{Query, RawQuery, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_config::AppConfig;

use crate::models::DoctorListingResponse;
use crate::services::{
    filter::filter_specialty_options,
    suggest::suggest,
    HttpDoctorSource, ListingView, MemoryNavigation, ModuloEnricher,
};

#[derive(Debug, Deserialize)]
pub struct SuggestionQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SpecialtyQuery {
    pub q: Option<String>,
}

/// Build and load a listing view for the given location. Fetch failures are
/// logged by the view and leave the list empty.
async fn load_listing(state: &AppConfig, navigation: MemoryNavigation) -> ListingView<MemoryNavigation> {
    let mut view = ListingView::new(
        Arc::new(HttpDoctorSource::new(state)),
        Arc::new(ModuloEnricher),
        navigation,
    );
    view.load().await;
    view
}

// ==============================================================================
// PUBLIC HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<AppConfig>>,
    RawQuery(query): RawQuery,
) -> Json<DoctorListingResponse> {
    let view = load_listing(&state, MemoryNavigation::from_query(query.as_deref())).await;
    Json(view.response())
}

#[axum::debug_handler]
pub async fn get_suggestions(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<SuggestionQuery>,
) -> Json<Value> {
    let partial = query.q.unwrap_or_default();
    if partial.trim().is_empty() {
        return Json(json!({
            "query": partial,
            "suggestions": []
        }));
    }

    let view = load_listing(&state, MemoryNavigation::new("/")).await;
    let names = view.doctor_names();
    let suggestions = suggest(&names[..], &partial);

    Json(json!({
        "query": partial,
        "suggestions": suggestions
    }))
}

#[axum::debug_handler]
pub async fn get_specialties(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<SpecialtyQuery>,
) -> Json<Value> {
    let view = load_listing(&state, MemoryNavigation::new("/")).await;
    let specialties = filter_specialty_options(
        &view.available_specialties(),
        query.q.as_deref().unwrap_or_default(),
    );

    Json(json!({
        "specialties": specialties,
        "total": specialties.len()
    }))
}
