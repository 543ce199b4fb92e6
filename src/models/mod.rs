pub mod filters;
pub mod game;

pub use filters::{FilterChip, FilterKey, Filters, SortKey};
pub use game::{
    AutocompleteSuggestion, DegradedNotice, GameDetails, GameSummary, RecommendationResult,
    DEFAULT_DEGRADED_MESSAGE,
};

use serde::Serialize;

/// A submitted recommendation query, ready to send
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationQuery {
    pub preference: String,
    #[serde(rename = "sort_by")]
    pub sort_key: SortKey,
    pub filters: Filters,
}
