// libs/booking-cell/src/services/detail.rs
use std::sync::Arc;

use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use doctor_cell::models::EnrichedDoctor;
use doctor_cell::services::{
    find_doctor, DoctorSource, Enricher, FetchOutcome, FetchTask, NavigationContext,
};

use crate::models::{
    BookingConfirmation, BookingDay, BookingError, BookingSelection, DoctorDetailResponse, TimeSlot,
};
use crate::services::slots::{is_bookable_date, next_seven_days, slot_from_label, time_slots};

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    NotFound,
    Loaded(EnrichedDoctor),
}

/// View model behind `/doctor/{id}`: one doctor plus the booking selection.
pub struct DetailView<N: NavigationContext> {
    source: Arc<dyn DoctorSource>,
    enricher: Arc<dyn Enricher>,
    navigation: N,
    doctor_id: String,
    today: NaiveDate,
    state: DetailState,
    selection: BookingSelection,
    lifetime: CancellationToken,
}

impl<N: NavigationContext> DetailView<N> {
    pub fn new(
        source: Arc<dyn DoctorSource>,
        enricher: Arc<dyn Enricher>,
        navigation: N,
        doctor_id: impl Into<String>,
        today: NaiveDate,
    ) -> Self {
        Self {
            source,
            enricher,
            navigation,
            doctor_id: doctor_id.into(),
            today,
            state: DetailState::Loading,
            selection: BookingSelection::default(),
            lifetime: CancellationToken::new(),
        }
    }

    /// Fetch the list and pick out this view's doctor. Ids that are not
    /// numeric, and fetch failures, both end in `NotFound`.
    pub async fn load(&mut self) -> &DetailState {
        self.state = DetailState::Loading;

        let Ok(id) = self.doctor_id.parse::<u64>() else {
            warn!("Doctor id '{}' is not numeric", self.doctor_id);
            self.state = DetailState::NotFound;
            return &self.state;
        };

        let task = FetchTask::spawn(self.source.clone(), self.lifetime.child_token(), 1);
        self.state = match task.join().await {
            FetchOutcome::Loaded { records, .. } => match find_doctor(records, id) {
                Ok(record) => {
                    debug!("Loaded doctor {}", id);
                    DetailState::Loaded(self.enricher.enrich(record))
                }
                Err(error) => {
                    warn!("{}", error);
                    DetailState::NotFound
                }
            },
            FetchOutcome::Failed { error, .. } => {
                error!("Error fetching doctor data: {}", error);
                DetailState::NotFound
            }
            FetchOutcome::Cancelled { .. } => DetailState::Loading,
        };

        &self.state
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn doctor(&self) -> Option<&EnrichedDoctor> {
        match &self.state {
            DetailState::Loaded(doctor) => Some(doctor),
            _ => None,
        }
    }

    pub fn days(&self) -> Vec<BookingDay> {
        next_seven_days(self.today)
    }

    pub fn time_slots(&self) -> Vec<TimeSlot> {
        time_slots()
    }

    pub fn selection(&self) -> &BookingSelection {
        &self.selection
    }

    pub fn navigation(&self) -> &N {
        &self.navigation
    }

    // ==============================================================================
    // SELECTION
    // ==============================================================================

    pub fn select_date(&mut self, date: NaiveDate) -> Result<(), BookingError> {
        if !is_bookable_date(self.today, date) {
            return Err(BookingError::DateOutOfRange(date));
        }
        self.selection.date = Some(date);
        Ok(())
    }

    /// Select a date given as `YYYY-MM-DD`.
    pub fn select_date_str(&mut self, raw: &str) -> Result<(), BookingError> {
        let date = raw
            .trim()
            .parse::<NaiveDate>()
            .map_err(|_| BookingError::InvalidDate(raw.to_string()))?;
        self.select_date(date)
    }

    pub fn select_time_slot(&mut self, slot: TimeSlot) -> Result<(), BookingError> {
        if !time_slots().contains(&slot) {
            return Err(BookingError::UnknownTimeSlot(slot.label()));
        }
        self.selection.time_slot = Some(slot);
        Ok(())
    }

    pub fn select_time_slot_label(&mut self, label: &str) -> Result<(), BookingError> {
        let slot = slot_from_label(label).ok_or_else(|| BookingError::UnknownTimeSlot(label.to_string()))?;
        self.selection.time_slot = Some(slot);
        Ok(())
    }

    /// Whether the confirm button is enabled.
    pub fn can_confirm(&self) -> bool {
        self.doctor().is_some() && self.selection.is_complete()
    }

    pub fn prompt(&self) -> String {
        self.selection.prompt()
    }

    /// Confirm the booking. Nothing is submitted anywhere; on success the view
    /// navigates back to the listing and the selection is discarded. An
    /// incomplete selection leaves the view where it is.
    pub fn confirm(&mut self) -> Result<BookingConfirmation, BookingError> {
        let doctor = self.doctor().ok_or(BookingError::DoctorNotFound)?;

        let (Some(date), Some(time_slot)) = (self.selection.date, self.selection.time_slot) else {
            warn!("Booking attempted with incomplete selection: {}", self.selection.prompt());
            return Err(BookingError::IncompleteSelection);
        };

        let confirmation = BookingConfirmation {
            doctor_id: doctor.id(),
            doctor_name: doctor.name().to_string(),
            date,
            time_slot,
            message: format!("Booking confirmed for Dr. {} on {} at {}", doctor.name(), date, time_slot),
            redirect: "/".to_string(),
        };

        info!("Booking confirmed for doctor {} on {} at {}", confirmation.doctor_id, date, time_slot);

        self.navigation.push(confirmation.redirect.clone());
        self.selection = BookingSelection::default();

        Ok(confirmation)
    }

    /// Leave the page for the listing. Available in every state, so a
    /// not-found page always has a way out.
    pub fn back_to_listing(&mut self) -> String {
        let location = "/".to_string();
        self.navigation.push(location.clone());
        self.selection = BookingSelection::default();
        location
    }

    pub fn response(&self) -> Option<DoctorDetailResponse> {
        let doctor = self.doctor()?.clone();

        Some(DoctorDetailResponse {
            doctor,
            days: self.days(),
            time_slots: self.time_slots(),
            prompt: self.prompt(),
            back: "/".to_string(),
        })
    }
}

impl<N: NavigationContext> Drop for DetailView<N> {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}
