use crate::models::FilterCriteria;
use crate::services::query::{NavigationContext, QuerySync};

pub const MAX_SUGGESTIONS: usize = 3;

/// Autocomplete over doctor names: case-insensitive substring match, in
/// input order, capped at [`MAX_SUGGESTIONS`]. A blank partial suggests nothing.
pub fn suggest<S: AsRef<str>>(all_names: &[S], partial: &str) -> Vec<String> {
    if partial.trim().is_empty() {
        return Vec::new();
    }

    let partial = partial.to_lowercase();
    all_names
        .iter()
        .filter(|name| name.as_ref().to_lowercase().contains(&partial))
        .take(MAX_SUGGESTIONS)
        .map(|name| name.as_ref().to_string())
        .collect()
}

/// State behind the search input and its suggestion dropdown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchBox {
    input: String,
    suggestions: Vec<String>,
}

impl SearchBox {
    /// Start from the search term already in the URL.
    pub fn from_criteria(criteria: &FilterCriteria) -> Self {
        Self {
            input: criteria.search_term.clone(),
            suggestions: Vec::new(),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn on_input<S: AsRef<str>>(&mut self, all_names: &[S], value: &str) -> &[String] {
        self.input = value.to_string();
        self.suggestions = suggest(all_names, value);
        &self.suggestions
    }

    /// Enter pressed: commit whatever is typed.
    pub fn submit<N: NavigationContext>(&mut self, sync: &mut QuerySync<N>) -> FilterCriteria {
        let value = self.input.clone();
        self.commit(sync, value)
    }

    /// A suggestion was clicked. Out-of-range indexes are ignored.
    pub fn select<N: NavigationContext>(
        &mut self,
        sync: &mut QuerySync<N>,
        index: usize,
    ) -> Option<FilterCriteria> {
        let value = self.suggestions.get(index)?.clone();
        Some(self.commit(sync, value))
    }

    fn commit<N: NavigationContext>(&mut self, sync: &mut QuerySync<N>, value: String) -> FilterCriteria {
        self.suggestions.clear();
        let criteria = sync.set_search(&value);
        self.input = value;
        criteria
    }
}
