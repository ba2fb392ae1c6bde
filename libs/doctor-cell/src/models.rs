use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ==============================================================================
// SOURCE RECORDS
// ==============================================================================

/// Consultation mode as published by the doctor source.
///
/// Unrecognised strings are kept verbatim so a record never fails to decode
/// because of its mode; they simply never match a mode filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConsultationMode {
    Video,
    InClinic,
    Other(String),
}

impl ConsultationMode {
    pub fn as_str(&self) -> &str {
        match self {
            ConsultationMode::Video => "video",
            ConsultationMode::InClinic => "in-clinic",
            ConsultationMode::Other(raw) => raw,
        }
    }

    /// Parse a `mode` query value. Only the two filterable modes are accepted;
    /// anything else (including the legacy "all") means no mode filter.
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "video" => Some(ConsultationMode::Video),
            "in-clinic" => Some(ConsultationMode::InClinic),
            _ => None,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ConsultationMode::Video => "Video Consultation",
            ConsultationMode::InClinic => "In-clinic Consultation",
            ConsultationMode::Other(raw) => raw,
        }
    }
}

impl From<String> for ConsultationMode {
    fn from(value: String) -> Self {
        Self::from_param(&value).unwrap_or(ConsultationMode::Other(value))
    }
}

impl From<ConsultationMode> for String {
    fn from(mode: ConsultationMode) -> Self {
        mode.as_str().to_string()
    }
}

impl fmt::Display for ConsultationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorRecord {
    pub id: u64,
    pub name: String,
    pub experience: u32,
    pub fees: f64,
    #[serde(default)]
    pub specialties: Vec<String>,
    pub mode: ConsultationMode,
}

/// A doctor record plus the display-only fields derived by an [`Enricher`](crate::services::Enricher).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedDoctor {
    #[serde(flatten)]
    pub record: DoctorRecord,
    #[serde(rename = "type")]
    pub doctor_type: String,
    pub clinic: String,
    pub location: String,
}

impl EnrichedDoctor {
    pub fn id(&self) -> u64 {
        self.record.id
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn fees(&self) -> f64 {
        self.record.fees
    }

    pub fn experience(&self) -> u32 {
        self.record.experience
    }

    pub fn mode(&self) -> &ConsultationMode {
        &self.record.mode
    }

    pub fn specialties(&self) -> &[String] {
        &self.record.specialties
    }
}

// ==============================================================================
// FILTER CRITERIA
// ==============================================================================

/// Canonical sort orders for the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    FeesAsc,
    FeesDesc,
    Experience,
}

impl SortKey {
    /// Accepts the canonical spelling and the legacy ones still found in shared links.
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "fees-asc" | "price-low" | "fees" => Some(SortKey::FeesAsc),
            "fees-desc" | "price-high" => Some(SortKey::FeesDesc),
            "experience" => Some(SortKey::Experience),
            _ => None,
        }
    }

    pub fn as_param(&self) -> &'static str {
        match self {
            SortKey::FeesAsc => "fees-asc",
            SortKey::FeesDesc => "fees-desc",
            SortKey::Experience => "experience",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::FeesAsc => "Price: Low-High",
            SortKey::FeesDesc => "Price: High-Low",
            SortKey::Experience => "Experience",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterCriteria {
    pub search_term: String,
    pub mode: Option<ConsultationMode>,
    pub specialties: BTreeSet<String>,
    pub sort: Option<SortKey>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.search_term.is_empty()
            && self.mode.is_none()
            && self.specialties.is_empty()
            && self.sort.is_none()
    }

    /// Filter chips shown above the listing, one per removable criterion.
    pub fn active_filters(&self) -> Vec<ActiveFilter> {
        let mut chips: Vec<ActiveFilter> = self
            .specialties
            .iter()
            .map(|spec| ActiveFilter {
                param: "specialty",
                value: spec.clone(),
                label: spec.clone(),
            })
            .collect();

        if let Some(mode) = &self.mode {
            chips.push(ActiveFilter {
                param: "mode",
                value: mode.as_str().to_string(),
                label: mode.label().to_string(),
            });
        }

        if let Some(sort) = self.sort {
            chips.push(ActiveFilter {
                param: "sort",
                value: sort.as_param().to_string(),
                label: sort.label().to_string(),
            });
        }

        chips
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveFilter {
    pub param: &'static str,
    pub value: String,
    pub label: String,
}

// ==============================================================================
// RESPONSES
// ==============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct DoctorListingResponse {
    pub doctors: Vec<EnrichedDoctor>,
    pub total: usize,
    pub summary: String,
    pub criteria: FilterCriteria,
    pub active_filters: Vec<ActiveFilter>,
    pub query: String,
    pub specialties: Vec<String>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum DoctorError {
    #[error("Failed to fetch doctor list: {0}")]
    Fetch(String),

    #[error("Doctor source returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode doctor list: {0}")]
    Decode(String),

    #[error("Doctor not found: {0}")]
    NotFound(String),

    #[error("Doctor fetch cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for DoctorError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            DoctorError::Decode(error.to_string())
        } else {
            DoctorError::Fetch(error.to_string())
        }
    }
}
