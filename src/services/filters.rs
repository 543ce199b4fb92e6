use rand::{seq::SliceRandom, Rng};

use crate::{
    models::{FilterChip, FilterKey, Filters, RecommendationQuery, SortKey},
    services::summarizer,
};

/// Longest preference text the input accepts, in characters
pub const MAX_PREFERENCE_CHARS: usize = 100;

/// Filter panel and query input state
///
/// Keeps `filters` and `chips` in lockstep: after every operation the set of
/// filter keys equals the set of chip keys, with exactly one chip per key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    filters: Filters,
    chips: Vec<FilterChip>,
    preference: String,
    sort_key: SortKey,
    show_autocomplete: bool,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn chips(&self) -> &[FilterChip] {
        &self.chips
    }

    pub fn preference(&self) -> &str {
        &self.preference
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn show_autocomplete(&self) -> bool {
        self.show_autocomplete
    }

    /// Sets a facet value, or clears the facet when `value` is empty
    pub fn add_or_update_filter(&mut self, key: FilterKey, value: &str) {
        if value.is_empty() {
            self.filters.remove(key);
            self.chips.retain(|chip| chip.key != key);
            return;
        }

        self.filters.set(key, value);
        match self.chips.iter_mut().find(|chip| chip.key == key) {
            Some(chip) => chip.value = value.to_string(),
            None => self.chips.push(FilterChip::new(key, value)),
        }
    }

    /// Removes the chip's facet; matching is by key, not value
    pub fn remove_chip(&mut self, chip: &FilterChip) {
        tracing::debug!(key = %chip.key, value = %chip.value, "Removing filter chip");
        self.chips.retain(|c| c.key != chip.key);
        self.filters.remove(chip.key);
    }

    pub fn clear_all(&mut self) {
        self.chips.clear();
        self.filters.clear();
    }

    /// Picks a random genre and platform ("Surprise me")
    pub fn randomize(&mut self) {
        self.randomize_with(&mut rand::thread_rng());
    }

    pub fn randomize_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for key in [FilterKey::Genre, FilterKey::Platform] {
            if let Some(value) = key.options().choose(rng) {
                self.add_or_update_filter(key, value);
            }
        }
    }

    /// Stores the typed preference and opens the suggestion dropdown
    ///
    /// Returns the stored (possibly truncated) text, which is the autocomplete query.
    pub fn set_preference(&mut self, text: &str) -> &str {
        self.preference = text.chars().take(MAX_PREFERENCE_CHARS).collect();
        self.show_autocomplete = true;
        &self.preference
    }

    pub fn set_sort_key(&mut self, sort_key: SortKey) {
        self.sort_key = sort_key;
    }

    pub fn hide_autocomplete(&mut self) {
        self.show_autocomplete = false;
    }

    /// Builds the query to send, or `None` when the preference is blank
    pub fn submit(&mut self) -> Option<RecommendationQuery> {
        if self.preference.trim().is_empty() {
            return None;
        }
        self.show_autocomplete = false;
        Some(RecommendationQuery {
            preference: self.preference.clone(),
            sort_key: self.sort_key,
            filters: self.filters.clone(),
        })
    }

    /// Adopts a suggestion as the preference and submits it
    pub fn select_suggestion(&mut self, name: &str) -> Option<RecommendationQuery> {
        self.set_preference(name);
        self.show_autocomplete = false;
        self.submit()
    }

    pub fn preview(&self) -> String {
        summarizer::summarize(&self.filters, &self.preference)
    }

    pub fn should_show_preview(&self) -> bool {
        !self.preference.trim().is_empty() || !self.filters.is_empty()
    }
}
