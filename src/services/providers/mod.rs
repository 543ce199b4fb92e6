/// Remote game data provider abstraction
///
/// The recommendation backend owns recommendation generation, preference
/// understanding, and metadata lookup. The controller only sees this trait, so
/// tests can substitute a double for the HTTP implementation.
use crate::{
    error::AppResult,
    models::{AutocompleteSuggestion, Filters, GameDetails, RecommendationResult, SortKey},
};

pub mod nexa_api;
pub mod request_id;

pub use nexa_api::NexaApiProvider;

/// Trait for game data providers
///
/// Every call issues exactly one request; implementations do not retry or cache.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait GameDataProvider: Send + Sync {
    /// Fetch recommendations for a free-text preference
    ///
    /// Fails with `AppError::RecommendationFetch` carrying the server's message.
    async fn fetch_recommendations(
        &self,
        preference: &str,
        sort_key: SortKey,
        filters: &Filters,
    ) -> AppResult<RecommendationResult>;

    /// Fetch description, screenshots and website for a game title
    ///
    /// Fails with `AppError::DetailsFetch` carrying the server's message.
    async fn fetch_game_details(&self, title: &str) -> AppResult<GameDetails>;

    /// Fetch name suggestions for a partial query
    ///
    /// Best effort: any failure yields an empty list.
    async fn fetch_autocomplete(&self, query: &str) -> Vec<AutocompleteSuggestion>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
