// libs/doctor-cell/src/services/query.rs
use tracing::debug;

use crate::models::{ConsultationMode, FilterCriteria, SortKey};

// ==============================================================================
// NAVIGATION CONTEXT
// ==============================================================================

/// The page's address bar, injected so views never reach for global state.
pub trait NavigationContext: Send {
    /// Current location: path plus optional `?query`.
    fn location(&self) -> String;

    /// Client-side navigation to `location` without a reload.
    fn push(&mut self, location: String);

    fn path(&self) -> String {
        let location = self.location();
        match location.split_once('?') {
            Some((path, _)) => path.to_string(),
            None => location,
        }
    }

    fn query(&self) -> String {
        self.location()
            .split_once('?')
            .map(|(_, query)| query.to_string())
            .unwrap_or_default()
    }
}

/// History-stack navigation context, used for request handling and tests.
#[derive(Debug, Clone)]
pub struct MemoryNavigation {
    history: Vec<String>,
}

impl MemoryNavigation {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            history: vec![location.into()],
        }
    }

    /// Listing location for a raw query string as received by a handler.
    pub fn from_query(query: Option<&str>) -> Self {
        match query {
            Some(query) if !query.is_empty() => Self::new(format!("/?{}", query)),
            _ => Self::new("/"),
        }
    }

    /// Step back one entry, like the browser back button.
    pub fn back(&mut self) -> bool {
        if self.history.len() > 1 {
            self.history.pop();
            true
        } else {
            false
        }
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl NavigationContext for MemoryNavigation {
    fn location(&self) -> String {
        self.history.last().cloned().unwrap_or_else(|| "/".to_string())
    }

    fn push(&mut self, location: String) {
        debug!("Navigating to {}", location);
        self.history.push(location);
    }
}

// ==============================================================================
// QUERY STRING CODEC
// ==============================================================================

/// Read filter criteria from a query string. Never fails: anything missing,
/// unknown or undecodable falls back to "no filter" for that field.
pub fn parse_query(query: &str) -> FilterCriteria {
    let mut criteria = FilterCriteria::default();
    let (mut search_seen, mut mode_seen, mut sort_seen) = (false, false, false);

    for (key, value) in query_pairs(query) {
        match key.as_str() {
            "search" if !search_seen => {
                search_seen = true;
                criteria.search_term = value;
            }
            "mode" if !mode_seen => {
                mode_seen = true;
                criteria.mode = ConsultationMode::from_param(&value);
            }
            "sort" if !sort_seen => {
                sort_seen = true;
                criteria.sort = SortKey::from_param(&value);
            }
            "specialty" if !value.is_empty() => {
                criteria.specialties.insert(value);
            }
            _ => {}
        }
    }

    criteria
}

/// Canonical query string for the criteria, empty fields omitted.
pub fn to_query_string(criteria: &FilterCriteria) -> String {
    let mut pairs: Vec<(&str, &str)> = Vec::new();

    if !criteria.search_term.is_empty() {
        pairs.push(("search", criteria.search_term.as_str()));
    }
    if let Some(mode) = &criteria.mode {
        pairs.push(("mode", mode.as_str()));
    }
    for spec in &criteria.specialties {
        pairs.push(("specialty", spec.as_str()));
    }
    if let Some(sort) = criteria.sort {
        pairs.push(("sort", sort.as_param()));
    }

    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

pub const LISTING_PATH: &str = "/";

/// Listing location for the criteria: `/` when nothing is selected.
pub fn listing_location(criteria: &FilterCriteria) -> String {
    let query = to_query_string(criteria);
    if query.is_empty() {
        LISTING_PATH.to_string()
    } else {
        format!("{}?{}", LISTING_PATH, query)
    }
}

fn query_pairs(query: &str) -> impl Iterator<Item = (String, String)> + '_ {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|segment| !segment.is_empty())
        .filter_map(|segment| {
            let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
            Some((decode_component(key)?, decode_component(value)?))
        })
}

fn decode_component(raw: &str) -> Option<String> {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => Some(decoded.into_owned()),
        Err(_) => {
            debug!("Ignoring undecodable query component: {}", raw);
            None
        }
    }
}

// ==============================================================================
// SYNCHRONIZER
// ==============================================================================

/// Keeps filter criteria and the navigation context's URL consistent.
///
/// Every mutation reads the current criteria, applies one change and writes
/// the whole query back, so criteria set elsewhere survive. While the context
/// is away from the listing (on a detail page), the criteria last seen on the
/// listing stand in for the URL.
pub struct QuerySync<N: NavigationContext> {
    navigation: N,
    last_listing: FilterCriteria,
}

impl<N: NavigationContext> QuerySync<N> {
    pub fn new(navigation: N) -> Self {
        let mut sync = Self {
            navigation,
            last_listing: FilterCriteria::default(),
        };
        sync.refresh();
        sync
    }

    pub fn is_on_listing(&self) -> bool {
        self.navigation.path() == LISTING_PATH
    }

    pub fn read(&self) -> FilterCriteria {
        if self.is_on_listing() {
            parse_query(&self.navigation.query())
        } else {
            self.last_listing.clone()
        }
    }

    /// Re-read the URL after navigation this synchronizer did not perform.
    pub fn refresh(&mut self) -> FilterCriteria {
        let criteria = self.read();
        self.last_listing = criteria.clone();
        criteria
    }

    /// Push the location for `criteria` and return it.
    pub fn write(&mut self, criteria: &FilterCriteria) -> String {
        let location = listing_location(criteria);
        self.navigation.push(location.clone());
        self.last_listing = criteria.clone();
        location
    }

    /// Navigate away from the listing, remembering its criteria.
    pub fn leave(&mut self, location: String) {
        self.refresh();
        self.navigation.push(location);
    }

    pub fn set_search(&mut self, term: &str) -> FilterCriteria {
        self.update(|criteria| criteria.search_term = term.to_string())
    }

    pub fn set_mode(&mut self, mode: Option<ConsultationMode>) -> FilterCriteria {
        self.update(|criteria| criteria.mode = mode)
    }

    pub fn toggle_specialty(&mut self, specialty: &str, selected: bool) -> FilterCriteria {
        self.update(|criteria| {
            if specialty.is_empty() {
                return;
            }
            if selected {
                criteria.specialties.insert(specialty.to_string());
            } else {
                criteria.specialties.remove(specialty);
            }
        })
    }

    pub fn set_sort(&mut self, sort: Option<SortKey>) -> FilterCriteria {
        self.update(|criteria| criteria.sort = sort)
    }

    pub fn clear_all(&mut self) -> FilterCriteria {
        self.update(|criteria| *criteria = FilterCriteria::default())
    }

    pub fn navigation(&self) -> &N {
        &self.navigation
    }

    pub fn navigation_mut(&mut self) -> &mut N {
        &mut self.navigation
    }

    fn update(&mut self, change: impl FnOnce(&mut FilterCriteria)) -> FilterCriteria {
        let mut criteria = self.read();
        change(&mut criteria);
        self.write(&criteria);
        criteria
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn pairs(query: &str) -> BTreeSet<String> {
        query.split('&').filter(|s| !s.is_empty()).map(str::to_string).collect()
    }

    #[test]
    fn test_parse_full_query() {
        let criteria = parse_query("?search=asha%20rao&mode=video&specialty=Dentist&specialty=General+Physician&sort=fees-desc");

        assert_eq!(criteria.search_term, "asha rao");
        assert_eq!(criteria.mode, Some(ConsultationMode::Video));
        assert_eq!(
            criteria.specialties.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["Dentist", "General Physician"]
        );
        assert_eq!(criteria.sort, Some(SortKey::FeesDesc));
    }

    #[test]
    fn test_parse_fails_open() {
        let criteria = parse_query("mode=all&sort=rating&specialty=&search=%E0%A4%A&utm_source=mail&&=x");
        assert_eq!(criteria, FilterCriteria::default());
    }

    #[test]
    fn test_parse_first_single_value_wins() {
        let criteria = parse_query("mode=in-clinic&mode=video&sort=experience&sort=fees-asc");

        assert_eq!(criteria.mode, Some(ConsultationMode::InClinic));
        assert_eq!(criteria.sort, Some(SortKey::Experience));
    }

    #[test]
    fn test_serialize_omits_empty_fields() {
        assert_eq!(to_query_string(&FilterCriteria::default()), "");
        assert_eq!(listing_location(&FilterCriteria::default()), "/");

        let criteria = FilterCriteria {
            sort: Some(SortKey::Experience),
            ..Default::default()
        };
        assert_eq!(to_query_string(&criteria), "sort=experience");
    }

    #[test]
    fn test_criteria_round_trip() {
        let criteria = FilterCriteria {
            search_term: "heart & lungs".to_string(),
            mode: Some(ConsultationMode::InClinic),
            specialties: ["Cardiologist", "Pulmonologist"].iter().map(|s| s.to_string()).collect(),
            sort: Some(SortKey::FeesAsc),
        };

        assert_eq!(parse_query(&to_query_string(&criteria)), criteria);
    }

    #[test]
    fn test_query_round_trip_normalizes() {
        let cases = [
            ("sort=price-low&specialty=Dentist&mode=video&utm=1", "mode=video&specialty=Dentist&sort=fees-asc"),
            ("search=&mode=&specialty=Dentist", "specialty=Dentist"),
            ("sort=price-high", "sort=fees-desc"),
            ("specialty=Dentist&specialty=Dentist", "specialty=Dentist"),
            ("", ""),
        ];

        for (raw, normalized) in cases {
            assert_eq!(pairs(&to_query_string(&parse_query(raw))), pairs(normalized), "query: {}", raw);
        }
    }

    #[test]
    fn test_write_is_idempotent_after_read() {
        let mut sync = QuerySync::new(MemoryNavigation::new("/?specialty=Dentist&sort=experience&mode=video"));

        let first = sync.read();
        let location = sync.write(&first);

        assert_eq!(sync.read(), first);
        assert_eq!(sync.write(&sync.read()), location);
    }

    #[test]
    fn test_mutators_preserve_other_criteria() {
        let mut sync = QuerySync::new(MemoryNavigation::new("/?mode=video"));

        sync.toggle_specialty("Dentist", true);
        sync.set_sort(Some(SortKey::FeesDesc));
        let criteria = sync.set_search("asha");

        assert_eq!(criteria.mode, Some(ConsultationMode::Video));
        assert!(criteria.specialties.contains("Dentist"));
        assert_eq!(criteria.sort, Some(SortKey::FeesDesc));
        assert_eq!(sync.read(), criteria);
        assert_eq!(sync.navigation().history().len(), 4);

        let criteria = sync.toggle_specialty("Dentist", false);
        assert!(criteria.specialties.is_empty());

        let criteria = sync.set_mode(None);
        assert_eq!(criteria.mode, None);
    }

    #[test]
    fn test_clear_all_navigates_home() {
        let mut sync = QuerySync::new(MemoryNavigation::new("/?mode=video&sort=experience"));

        assert_eq!(sync.clear_all(), FilterCriteria::default());
        assert_eq!(sync.navigation().location(), "/");
    }

    #[test]
    fn test_mutation_from_detail_page_keeps_criteria() {
        let mut sync = QuerySync::new(MemoryNavigation::new("/?mode=video&sort=experience"));
        sync.leave("/doctor/4".to_string());
        assert!(!sync.is_on_listing());

        let criteria = sync.toggle_specialty("Dentist", true);

        assert_eq!(criteria.mode, Some(ConsultationMode::Video));
        assert_eq!(criteria.sort, Some(SortKey::Experience));
        assert!(criteria.specialties.contains("Dentist"));
        assert_eq!(
            pairs(&sync.navigation().query()),
            pairs("mode=video&specialty=Dentist&sort=experience")
        );
    }

    #[test]
    fn test_refresh_follows_back_navigation() {
        let mut sync = QuerySync::new(MemoryNavigation::new("/?mode=video"));
        sync.set_sort(Some(SortKey::FeesAsc));
        sync.navigation_mut().back();

        let criteria = sync.refresh();
        assert_eq!(criteria.sort, None);

        sync.leave("/doctor/2".to_string());
        assert_eq!(sync.read(), criteria);
    }

    #[test]
    fn test_memory_navigation_back() {
        let mut navigation = MemoryNavigation::from_query(Some("mode=video"));
        navigation.push("/doctor/4".to_string());

        assert_eq!(navigation.path(), "/doctor/4");
        assert!(navigation.back());
        assert_eq!(navigation.query(), "mode=video");
        assert!(!navigation.back());
    }
}
