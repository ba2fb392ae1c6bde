use std::fmt;

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use doctor_cell::models::EnrichedDoctor;

/// One selectable day in the booking calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDay {
    pub weekday: String,       // "Mon"
    pub day_of_month: u32,
    pub month: String,         // "Oct"
    pub iso_date: NaiveDate,
}

/// A half-hour appointment start, shown on a 12-hour clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlot(NaiveTime);

impl TimeSlot {
    pub fn new(start: NaiveTime) -> Self {
        Self(start)
    }

    pub fn start(&self) -> NaiveTime {
        self.0
    }

    pub fn label(&self) -> String {
        let hour = self.0.hour();
        let display_hour = if hour % 12 == 0 { 12 } else { hour % 12 };
        let meridiem = if hour < 12 { "AM" } else { "PM" };
        format!("{}:{:02} {}", display_hour, self.0.minute(), meridiem)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

/// The user's in-progress choice on the detail page. Discarded on navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingSelection {
    pub date: Option<NaiveDate>,
    pub time_slot: Option<TimeSlot>,
}

impl BookingSelection {
    pub fn is_complete(&self) -> bool {
        self.date.is_some() && self.time_slot.is_some()
    }

    /// Hint shown under the confirm button.
    pub fn prompt(&self) -> String {
        match (self.date, self.time_slot) {
            (None, None) => "Please select date and time to book".to_string(),
            (None, Some(_)) => "Please select a date".to_string(),
            (Some(_), None) => "Please select a time slot".to_string(),
            (Some(date), Some(slot)) => format!("Booking for {} at {}", date, slot),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingRequest {
    pub date: Option<String>,
    pub time_slot: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingConfirmation {
    pub doctor_id: u64,
    pub doctor_name: String,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    pub message: String,
    pub redirect: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorDetailResponse {
    pub doctor: EnrichedDoctor,
    pub days: Vec<BookingDay>,
    pub time_slots: Vec<TimeSlot>,
    pub prompt: String,
    pub back: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error("Please select both date and time slot")]
    IncompleteSelection,

    #[error("Date {0} is outside the next seven days")]
    DateOutOfRange(NaiveDate),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Unknown time slot: {0}")]
    UnknownTimeSlot(String),

    #[error("Doctor not found")]
    DoctorNotFound,
}
