// libs/doctor-cell/src/services/listing.rs
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::models::{
    ConsultationMode, DoctorListingResponse, EnrichedDoctor, FilterCriteria, SortKey,
};
use crate::services::enrichment::{enrich_all, Enricher};
use crate::services::fetch::{FetchOutcome, FetchTask};
use crate::services::filter;
use crate::services::query::{to_query_string, NavigationContext, QuerySync};
use crate::services::source::DoctorSource;
use crate::services::suggest::SearchBox;

/// View model behind the doctor listing page.
///
/// Owns the fetched list and the criteria read from the URL. Fetches run as
/// tasks under a token tied to the view; dropping the view cancels them, and
/// only the most recently issued fetch is ever applied.
pub struct ListingView<N: NavigationContext> {
    source: Arc<dyn DoctorSource>,
    enricher: Arc<dyn Enricher>,
    sync: QuerySync<N>,
    search_box: SearchBox,
    criteria: FilterCriteria,
    doctors: Vec<EnrichedDoctor>,
    lifetime: CancellationToken,
    in_flight: Option<CancellationToken>,
    issued_generation: u64,
    applied_generation: u64,
}

impl<N: NavigationContext> ListingView<N> {
    pub fn new(source: Arc<dyn DoctorSource>, enricher: Arc<dyn Enricher>, navigation: N) -> Self {
        let sync = QuerySync::new(navigation);
        let criteria = sync.read();

        Self {
            source,
            enricher,
            search_box: SearchBox::from_criteria(&criteria),
            sync,
            criteria,
            doctors: Vec::new(),
            lifetime: CancellationToken::new(),
            in_flight: None,
            issued_generation: 0,
            applied_generation: 0,
        }
    }

    // ==============================================================================
    // FETCH LIFECYCLE
    // ==============================================================================

    /// Start a new fetch, cancelling any that is still running.
    pub fn begin_fetch(&mut self) -> FetchTask {
        if let Some(previous) = self.in_flight.take() {
            debug!("Cancelling superseded doctor fetch #{}", self.issued_generation);
            previous.cancel();
        }

        self.issued_generation += 1;
        let token = self.lifetime.child_token();
        self.in_flight = Some(token.clone());

        FetchTask::spawn(self.source.clone(), token, self.issued_generation)
    }

    /// Apply a finished fetch. Returns whether the list changed.
    pub fn complete_fetch(&mut self, outcome: FetchOutcome) -> bool {
        let generation = outcome.generation();
        let is_latest = generation == self.issued_generation;
        if is_latest {
            self.in_flight = None;
        }

        match outcome {
            FetchOutcome::Loaded { records, .. } if is_latest => {
                self.doctors = enrich_all(self.enricher.as_ref(), records);
                self.applied_generation = generation;
                info!("Loaded {} doctors from fetch #{}", self.doctors.len(), generation);
                true
            }
            FetchOutcome::Loaded { .. } => {
                warn!(
                    "Discarding stale doctor list from fetch #{} (latest is #{})",
                    generation, self.issued_generation
                );
                false
            }
            FetchOutcome::Failed { error, .. } => {
                error!("Error fetching doctor data: {}", error);
                false
            }
            FetchOutcome::Cancelled { .. } => {
                debug!("Doctor fetch #{} was cancelled", generation);
                false
            }
        }
    }

    /// Fetch and apply in one step.
    pub async fn load(&mut self) -> bool {
        let task = self.begin_fetch();
        let outcome = task.join().await;
        self.complete_fetch(outcome)
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn applied_generation(&self) -> u64 {
        self.applied_generation
    }

    // ==============================================================================
    // READ SIDE
    // ==============================================================================

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Re-read the criteria after navigation the view did not initiate
    /// (back/forward, a pasted link).
    pub fn sync_from_location(&mut self) -> &FilterCriteria {
        self.criteria = self.sync.refresh();
        self.search_box = SearchBox::from_criteria(&self.criteria);
        &self.criteria
    }

    pub fn doctors(&self) -> &[EnrichedDoctor] {
        &self.doctors
    }

    pub fn visible(&self) -> Vec<EnrichedDoctor> {
        filter::apply(&self.doctors, &self.criteria)
    }

    pub fn doctor_names(&self) -> Vec<String> {
        self.doctors.iter().map(|d| d.name().to_string()).collect()
    }

    pub fn available_specialties(&self) -> Vec<String> {
        filter::available_specialties(&self.doctors)
    }

    pub fn specialty_options(&self, term: &str) -> Vec<String> {
        filter::filter_specialty_options(&self.available_specialties(), term)
    }

    pub fn summary(&self) -> String {
        filter::summary_line(self.visible().len())
    }

    pub fn search_box(&self) -> &SearchBox {
        &self.search_box
    }

    pub fn navigation(&self) -> &N {
        self.sync.navigation()
    }

    pub fn navigation_mut(&mut self) -> &mut N {
        self.sync.navigation_mut()
    }

    pub fn response(&self) -> DoctorListingResponse {
        let doctors = self.visible();

        DoctorListingResponse {
            total: doctors.len(),
            summary: filter::summary_line(doctors.len()),
            doctors,
            criteria: self.criteria.clone(),
            active_filters: self.criteria.active_filters(),
            query: to_query_string(&self.criteria),
            specialties: self.available_specialties(),
        }
    }

    // ==============================================================================
    // USER ACTIONS
    // ==============================================================================

    pub fn type_search(&mut self, value: &str) -> &[String] {
        let names = self.doctor_names();
        self.search_box.on_input(&names[..], value)
    }

    pub fn submit_search(&mut self) -> &FilterCriteria {
        self.criteria = self.search_box.submit(&mut self.sync);
        &self.criteria
    }

    pub fn select_suggestion(&mut self, index: usize) -> &FilterCriteria {
        if let Some(criteria) = self.search_box.select(&mut self.sync, index) {
            self.criteria = criteria;
        }
        &self.criteria
    }

    pub fn set_mode(&mut self, mode: Option<ConsultationMode>) -> &FilterCriteria {
        self.criteria = self.sync.set_mode(mode);
        &self.criteria
    }

    pub fn toggle_specialty(&mut self, specialty: &str, selected: bool) -> &FilterCriteria {
        self.criteria = self.sync.toggle_specialty(specialty, selected);
        &self.criteria
    }

    pub fn set_sort(&mut self, sort: Option<SortKey>) -> &FilterCriteria {
        self.criteria = self.sync.set_sort(sort);
        &self.criteria
    }

    pub fn clear_all_filters(&mut self) -> &FilterCriteria {
        self.criteria = self.sync.clear_all();
        self.search_box = SearchBox::default();
        &self.criteria
    }

    /// Go to the booking page for a doctor.
    pub fn book_appointment(&mut self, doctor_id: u64) -> String {
        let location = format!("/doctor/{}", doctor_id);
        self.sync.leave(location.clone());
        location
    }
}

impl<N: NavigationContext> Drop for ListingView<N> {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}
