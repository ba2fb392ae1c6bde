// libs/doctor-cell/src/services/filter.rs
use std::collections::HashSet;

use tracing::debug;

use crate::models::{EnrichedDoctor, FilterCriteria, SortKey};

/// Narrow and order the listing for the given criteria.
///
/// Stages run in a fixed order: search, mode, specialty, sort. The sort is
/// stable, so ties keep the order the source published them in.
pub fn apply(doctors: &[EnrichedDoctor], criteria: &FilterCriteria) -> Vec<EnrichedDoctor> {
    let search = criteria.search_term.to_lowercase();

    let mut filtered: Vec<EnrichedDoctor> = doctors
        .iter()
        .filter(|doctor| search.is_empty() || matches_search(doctor, &search))
        .filter(|doctor| criteria.mode.as_ref().map_or(true, |mode| doctor.mode() == mode))
        .filter(|doctor| {
            criteria.specialties.is_empty()
                || doctor
                    .specialties()
                    .iter()
                    .any(|spec| criteria.specialties.contains(spec))
        })
        .cloned()
        .collect();

    match criteria.sort {
        Some(SortKey::FeesAsc) => filtered.sort_by(|a, b| a.fees().total_cmp(&b.fees())),
        Some(SortKey::FeesDesc) => filtered.sort_by(|a, b| b.fees().total_cmp(&a.fees())),
        Some(SortKey::Experience) => filtered.sort_by(|a, b| b.experience().cmp(&a.experience())),
        None => {}
    }

    debug!("Filtered {} doctors down to {}", doctors.len(), filtered.len());
    filtered
}

fn matches_search(doctor: &EnrichedDoctor, search: &str) -> bool {
    doctor.name().to_lowercase().contains(search)
        || doctor
            .specialties()
            .iter()
            .any(|spec| spec.to_lowercase().contains(search))
        || doctor.clinic.to_lowercase().contains(search)
        || doctor.location.to_lowercase().contains(search)
}

/// Unique specialties across the list, in first-seen order.
pub fn available_specialties(doctors: &[EnrichedDoctor]) -> Vec<String> {
    let mut seen = HashSet::new();
    doctors
        .iter()
        .flat_map(|doctor| doctor.specialties().iter())
        .filter(|spec| seen.insert(spec.as_str()))
        .cloned()
        .collect()
}

/// Narrow the specialty checklist by a free-text term; an empty term keeps all.
pub fn filter_specialty_options(specialties: &[String], term: &str) -> Vec<String> {
    if term.is_empty() {
        return specialties.to_vec();
    }

    let term = term.to_lowercase();
    specialties
        .iter()
        .filter(|spec| spec.to_lowercase().contains(&term))
        .cloned()
        .collect()
}

pub fn summary_line(count: usize) -> String {
    let noun = if count == 1 { "doctor" } else { "doctors" };
    format!("Found {} {} matching your criteria", count, noun)
}
