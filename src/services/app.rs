use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    models::{
        AutocompleteSuggestion, DegradedNotice, Filters, GameDetails, GameSummary,
        RecommendationQuery, SortKey,
    },
    services::providers::GameDataProvider,
};

/// Most games the results grid shows
pub const MAX_VISIBLE_GAMES: usize = 19;
/// Most suggestions the autocomplete dropdown shows
pub const MAX_VISIBLE_SUGGESTIONS: usize = 7;

/// Per request kind loading indicators
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingFlags {
    pub recommendations: bool,
    pub details: bool,
    pub autocomplete: bool,
}

impl LoadingFlags {
    pub fn any(&self) -> bool {
        self.recommendations || self.details || self.autocomplete
    }
}

/// Everything the presentation layer renders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppSnapshot {
    pub games: Vec<GameSummary>,
    pub explain: Option<String>,
    pub degraded: Option<DegradedNotice>,
    pub loading: LoadingFlags,
    pub error: Option<String>,
    pub selected_game: Option<GameSummary>,
    pub details: Option<GameDetails>,
    pub suggestions: Vec<AutocompleteSuggestion>,
}

impl AppSnapshot {
    pub fn visible_games(&self) -> &[GameSummary] {
        &self.games[..self.games.len().min(MAX_VISIBLE_GAMES)]
    }

    pub fn visible_suggestions(&self) -> &[AutocompleteSuggestion] {
        &self.suggestions[..self.suggestions.len().min(MAX_VISIBLE_SUGGESTIONS)]
    }
}

/// What happened to a request once it finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Guard rejected the request; nothing was sent
    Skipped,
    /// Response was applied to the state
    Applied,
    /// Request failed and the error was surfaced
    Failed,
    /// A newer request of the same kind was issued; the response was dropped
    Superseded,
}

/// Sequence fencing for one request kind
///
/// Only the response to the latest issued request is applied. `in_flight`
/// drives the loading flag so overlapping requests don't clear it early.
#[derive(Debug, Default)]
struct RequestTracker {
    issued: u64,
    in_flight: u32,
}

impl RequestTracker {
    fn begin(&mut self) -> u64 {
        self.issued += 1;
        self.in_flight += 1;
        self.issued
    }

    /// Returns whether `seq` is still the latest request
    fn finish(&mut self, seq: u64) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        seq == self.issued
    }

    fn invalidate(&mut self) {
        self.issued += 1;
    }

    fn is_loading(&self) -> bool {
        self.in_flight > 0
    }
}

/// Inner state that can be modified
#[derive(Default)]
struct AppStateInner {
    view: AppSnapshot,
    recommendations: RequestTracker,
    details: RequestTracker,
    autocomplete: RequestTracker,
}

impl AppStateInner {
    fn sync_loading(&mut self) {
        self.view.loading = LoadingFlags {
            recommendations: self.recommendations.is_loading(),
            details: self.details.is_loading(),
            autocomplete: self.autocomplete.is_loading(),
        };
    }
}

/// Root controller: owns results, selection and loading/error flags and
/// orchestrates calls to the game data provider
///
/// Clones share state. The lock is never held across a provider call, so
/// requests of different kinds interleave freely.
#[derive(Clone)]
pub struct AppController {
    provider: Arc<dyn GameDataProvider>,
    inner: Arc<RwLock<AppStateInner>>,
}

impl AppController {
    pub fn new(provider: Arc<dyn GameDataProvider>) -> Self {
        Self {
            provider,
            inner: Arc::new(RwLock::new(AppStateInner::default())),
        }
    }

    pub async fn snapshot(&self) -> AppSnapshot {
        self.inner.read().await.view.clone()
    }

    /// Sends a submitted query
    pub async fn submit(&self, query: &RecommendationQuery) -> RequestOutcome {
        self.request_recommendations(&query.preference, query.sort_key, &query.filters)
            .await
    }

    /// Fetches recommendations and replaces the result set wholesale
    ///
    /// No-op unless `preference` has non-whitespace content.
    pub async fn request_recommendations(
        &self,
        preference: &str,
        sort_key: SortKey,
        filters: &Filters,
    ) -> RequestOutcome {
        if preference.trim().is_empty() {
            tracing::debug!("Blank preference, recommendation request skipped");
            return RequestOutcome::Skipped;
        }

        let seq = {
            let mut inner = self.inner.write().await;
            let seq = inner.recommendations.begin();
            inner.view.error = None;
            inner.view.degraded = None;
            inner.sync_loading();
            seq
        };

        let result = self
            .provider
            .fetch_recommendations(preference, sort_key, filters)
            .await;

        let mut inner = self.inner.write().await;
        let latest = inner.recommendations.finish(seq);
        inner.sync_loading();

        if !latest {
            tracing::debug!(seq, "Stale recommendations response dropped");
            return RequestOutcome::Superseded;
        }

        match result {
            Ok(result) => {
                if let Some(notice) = &result.degraded {
                    tracing::warn!(message = %notice.message, "Backend AI unavailable, showing fallback games");
                }
                inner.view.games = result.games;
                inner.view.explain = result.explain;
                inner.view.degraded = result.degraded;
                RequestOutcome::Applied
            }
            Err(e) => {
                tracing::error!(error = %e, "Error getting recommendations");
                inner.view.games.clear();
                inner.view.explain = None;
                inner.view.degraded = None;
                inner.view.error = Some(e.user_message());
                RequestOutcome::Failed
            }
        }
    }

    /// Refreshes suggestions for the typed query; never surfaces an error
    pub async fn request_autocomplete(&self, query: &str) -> RequestOutcome {
        if query.is_empty() {
            let mut inner = self.inner.write().await;
            inner.autocomplete.invalidate();
            inner.view.suggestions.clear();
            return RequestOutcome::Skipped;
        }

        let seq = {
            let mut inner = self.inner.write().await;
            let seq = inner.autocomplete.begin();
            inner.sync_loading();
            seq
        };

        let suggestions = self.provider.fetch_autocomplete(query).await;

        let mut inner = self.inner.write().await;
        let latest = inner.autocomplete.finish(seq);
        inner.sync_loading();

        if !latest {
            tracing::debug!(query = %query, seq, "Stale autocomplete response dropped");
            return RequestOutcome::Superseded;
        }

        inner.view.suggestions = suggestions;
        RequestOutcome::Applied
    }

    /// Opens the detail panel for `game` and fetches its details
    ///
    /// The selection is set before the fetch starts and survives a failed fetch.
    pub async fn request_game_details(&self, game: GameSummary) -> RequestOutcome {
        let seq = {
            let mut inner = self.inner.write().await;
            inner.view.selected_game = Some(game.clone());
            inner.view.details = None;
            inner.view.error = None;
            let seq = inner.details.begin();
            inner.sync_loading();
            seq
        };

        let result = self.provider.fetch_game_details(&game.title).await;

        let mut inner = self.inner.write().await;
        let latest = inner.details.finish(seq);
        inner.sync_loading();

        if !latest {
            tracing::debug!(title = %game.title, "Stale game details response dropped");
            return RequestOutcome::Superseded;
        }

        match result {
            Ok(details) => {
                inner.view.details = Some(details);
                RequestOutcome::Applied
            }
            Err(e) => {
                tracing::error!(title = %game.title, error = %e, "Error getting game details");
                inner.view.error = Some(e.user_message());
                RequestOutcome::Failed
            }
        }
    }

    pub async fn close_details(&self) {
        let mut inner = self.inner.write().await;
        inner.details.invalidate();
        inner.view.selected_game = None;
        inner.view.details = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::{AppError, AppResult},
        models::{FilterKey, RecommendationResult},
        services::providers::MockGameDataProvider,
    };
    use std::{collections::HashMap, sync::Mutex};
    use tokio::sync::{oneshot, Notify};

    fn game(title: &str) -> GameSummary {
        GameSummary::new(title)
    }

    fn suggestion(name: &str) -> AutocompleteSuggestion {
        AutocompleteSuggestion {
            name: name.to_string(),
            cover: None,
        }
    }

    fn controller(mock: MockGameDataProvider) -> AppController {
        AppController::new(Arc::new(mock))
    }

    #[tokio::test]
    async fn test_blank_preference_is_skipped() {
        let mut mock = MockGameDataProvider::new();
        mock.expect_fetch_recommendations().never();
        let app = controller(mock);

        let outcome = app
            .request_recommendations("   ", SortKey::Metacritic, &Filters::new())
            .await;

        assert_eq!(outcome, RequestOutcome::Skipped);
        assert_eq!(app.snapshot().await, AppSnapshot::default());
    }

    #[tokio::test]
    async fn test_recommendations_success_replaces_results() {
        let mut mock = MockGameDataProvider::new();
        mock.expect_fetch_recommendations()
            .withf(|preference, sort_key, filters| {
                preference.to_string() == "dragons"
                    && *sort_key == SortKey::Rating
                    && filters.get(FilterKey::Genre) == Some("RPG")
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(RecommendationResult {
                    games: vec![game("Skyrim"), game("Dragon's Dogma 2")],
                    explain: Some("Dragons everywhere".to_string()),
                    degraded: None,
                })
            });
        let app = controller(mock);

        let mut filters = Filters::new();
        filters.set(FilterKey::Genre, "RPG");
        let outcome = app
            .request_recommendations("dragons", SortKey::Rating, &filters)
            .await;

        let state = app.snapshot().await;
        assert_eq!(outcome, RequestOutcome::Applied);
        assert_eq!(state.games.len(), 2);
        assert_eq!(state.explain.as_deref(), Some("Dragons everywhere"));
        assert_eq!(state.error, None);
        assert!(!state.loading.any());
    }

    #[tokio::test]
    async fn test_failure_then_success_clears_error() {
        let mut mock = MockGameDataProvider::new();
        let mut calls = 0;
        mock.expect_fetch_recommendations()
            .times(2)
            .returning(move |_, _, _| {
                calls += 1;
                if calls == 1 {
                    Err(AppError::RecommendationFetch("OpenAI API key not found".to_string()))
                } else {
                    Ok(RecommendationResult {
                        games: vec![game("Hades")],
                        ..Default::default()
                    })
                }
            });
        let app = controller(mock);

        let outcome = app
            .request_recommendations("roguelike", SortKey::Metacritic, &Filters::new())
            .await;
        let state = app.snapshot().await;
        assert_eq!(outcome, RequestOutcome::Failed);
        assert!(state.games.is_empty());
        assert_eq!(state.error.as_deref(), Some("OpenAI API key not found"));
        assert_eq!(state.degraded, None);
        assert!(!state.loading.recommendations);

        let outcome = app
            .request_recommendations("roguelike", SortKey::Metacritic, &Filters::new())
            .await;
        let state = app.snapshot().await;
        assert_eq!(outcome, RequestOutcome::Applied);
        assert_eq!(state.error, None);
        assert_eq!(state.games, vec![game("Hades")]);
    }

    #[tokio::test]
    async fn test_failure_clears_previous_results() {
        let mut mock = MockGameDataProvider::new();
        let mut calls = 0;
        mock.expect_fetch_recommendations()
            .returning(move |_, _, _| {
                calls += 1;
                if calls == 1 {
                    Ok(RecommendationResult {
                        games: vec![game("Celeste")],
                        explain: Some("Precision platformers".to_string()),
                        degraded: None,
                    })
                } else {
                    Err(AppError::RecommendationFetch("Failed to fetch recommendations".to_string()))
                }
            });
        let app = controller(mock);

        app.request_recommendations("platformer", SortKey::Rating, &Filters::new())
            .await;
        app.request_recommendations("platformer", SortKey::Rating, &Filters::new())
            .await;

        let state = app.snapshot().await;
        assert!(state.games.is_empty());
        assert_eq!(state.explain, None);
        assert_eq!(state.error.as_deref(), Some("Failed to fetch recommendations"));
    }

    #[tokio::test]
    async fn test_degraded_response_sets_notice() {
        let mut mock = MockGameDataProvider::new();
        mock.expect_fetch_recommendations().returning(|_, _, _| {
            Ok(RecommendationResult {
                games: vec![game("Portal 2")],
                explain: None,
                degraded: Some(DegradedNotice {
                    message: "AI is offline".to_string(),
                }),
            })
        });
        let app = controller(mock);

        let query = RecommendationQuery {
            preference: "puzzles".to_string(),
            sort_key: SortKey::default(),
            filters: Filters::new(),
        };
        assert_eq!(app.submit(&query).await, RequestOutcome::Applied);

        let state = app.snapshot().await;
        assert_eq!(state.degraded.map(|d| d.message).as_deref(), Some("AI is offline"));
        assert_eq!(state.games.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_autocomplete_query_skips_network() {
        let mut mock = MockGameDataProvider::new();
        mock.expect_fetch_autocomplete()
            .withf(|query| query.to_string() == "sky")
            .times(1)
            .returning(|_| vec![suggestion("Skyrim")]);
        let app = controller(mock);

        assert_eq!(app.request_autocomplete("sky").await, RequestOutcome::Applied);
        assert_eq!(app.snapshot().await.suggestions.len(), 1);

        assert_eq!(app.request_autocomplete("").await, RequestOutcome::Skipped);
        assert!(app.snapshot().await.suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_autocomplete_failure_yields_empty_list_without_error() {
        let mut mock = MockGameDataProvider::new();
        mock.expect_fetch_autocomplete().returning(|_| Vec::new());
        let app = controller(mock);

        app.request_autocomplete("zzz").await;

        let state = app.snapshot().await;
        assert!(state.suggestions.is_empty());
        assert_eq!(state.error, None);
        assert!(!state.loading.autocomplete);
    }

    #[tokio::test]
    async fn test_details_failure_keeps_selection() {
        let mut mock = MockGameDataProvider::new();
        mock.expect_fetch_game_details()
            .withf(|title| title.to_string() == "Hollow Knight")
            .returning(|_| Err(AppError::DetailsFetch("Game not found".to_string())));
        let app = controller(mock);

        let outcome = app.request_game_details(game("Hollow Knight")).await;

        let state = app.snapshot().await;
        assert_eq!(outcome, RequestOutcome::Failed);
        assert_eq!(state.selected_game, Some(game("Hollow Knight")));
        assert_eq!(state.details, None);
        assert_eq!(state.error.as_deref(), Some("Game not found"));
        assert!(!state.loading.details);
    }

    #[tokio::test]
    async fn test_details_success_and_close() {
        let mut mock = MockGameDataProvider::new();
        mock.expect_fetch_game_details().returning(|_| {
            Ok(GameDetails {
                description: Some("Bug kingdom".to_string()),
                ..Default::default()
            })
        });
        let app = controller(mock);

        app.request_game_details(game("Hollow Knight")).await;
        let state = app.snapshot().await;
        assert_eq!(
            state.details.and_then(|d| d.description).as_deref(),
            Some("Bug kingdom")
        );

        app.close_details().await;
        let state = app.snapshot().await;
        assert_eq!(state.selected_game, None);
        assert_eq!(state.details, None);
    }

    #[test]
    fn test_visible_lists_are_capped() {
        let snapshot = AppSnapshot {
            games: (0..25).map(|i| game(&format!("Game {}", i))).collect(),
            suggestions: (0..10).map(|i| suggestion(&format!("S{}", i))).collect(),
            ..Default::default()
        };
        assert_eq!(snapshot.visible_games().len(), MAX_VISIBLE_GAMES);
        assert_eq!(snapshot.visible_suggestions().len(), MAX_VISIBLE_SUGGESTIONS);
        assert_eq!(AppSnapshot::default().visible_games().len(), 0);
    }

    /// Provider whose responses are released by the test through oneshot channels
    #[derive(Default)]
    struct ScriptedProvider {
        entered: Notify,
        autocomplete: Mutex<HashMap<String, oneshot::Receiver<Vec<AutocompleteSuggestion>>>>,
        details: Mutex<Option<oneshot::Receiver<AppResult<GameDetails>>>>,
    }

    impl ScriptedProvider {
        fn script_autocomplete(&self, query: &str) -> oneshot::Sender<Vec<AutocompleteSuggestion>> {
            let (tx, rx) = oneshot::channel();
            self.autocomplete
                .lock()
                .unwrap()
                .insert(query.to_string(), rx);
            tx
        }

        fn script_details(&self) -> oneshot::Sender<AppResult<GameDetails>> {
            let (tx, rx) = oneshot::channel();
            *self.details.lock().unwrap() = Some(rx);
            tx
        }
    }

    #[async_trait::async_trait]
    impl GameDataProvider for ScriptedProvider {
        async fn fetch_recommendations(
            &self,
            _preference: &str,
            _sort_key: SortKey,
            _filters: &Filters,
        ) -> AppResult<RecommendationResult> {
            Ok(RecommendationResult::default())
        }

        async fn fetch_game_details(&self, _title: &str) -> AppResult<GameDetails> {
            let rx = self.details.lock().unwrap().take().expect("details not scripted");
            self.entered.notify_one();
            rx.await
                .unwrap_or_else(|_| Err(AppError::DetailsFetch("dropped".to_string())))
        }

        async fn fetch_autocomplete(&self, query: &str) -> Vec<AutocompleteSuggestion> {
            let rx = self
                .autocomplete
                .lock()
                .unwrap()
                .remove(query)
                .expect("autocomplete not scripted");
            self.entered.notify_one();
            rx.await.unwrap_or_default()
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    #[tokio::test]
    async fn test_selected_game_is_set_before_details_resolve() {
        let provider = Arc::new(ScriptedProvider::default());
        let release = provider.script_details();
        let app = AppController::new(provider.clone());

        let task = {
            let app = app.clone();
            tokio::spawn(async move { app.request_game_details(game("Outer Wilds")).await })
        };
        provider.entered.notified().await;

        let state = app.snapshot().await;
        assert_eq!(state.selected_game, Some(game("Outer Wilds")));
        assert!(state.loading.details);

        release
            .send(Err(AppError::DetailsFetch("Rawg API key not found".to_string())))
            .unwrap();
        assert_eq!(task.await.unwrap(), RequestOutcome::Failed);

        let state = app.snapshot().await;
        assert_eq!(state.selected_game, Some(game("Outer Wilds")));
        assert_eq!(state.error.as_deref(), Some("Rawg API key not found"));
        assert!(!state.loading.details);
    }

    #[tokio::test]
    async fn test_late_autocomplete_response_is_dropped() {
        let provider = Arc::new(ScriptedProvider::default());
        let older = provider.script_autocomplete("sk");
        let newer = provider.script_autocomplete("sky");
        let app = AppController::new(provider.clone());

        let first = {
            let app = app.clone();
            tokio::spawn(async move { app.request_autocomplete("sk").await })
        };
        provider.entered.notified().await;
        let second = {
            let app = app.clone();
            tokio::spawn(async move { app.request_autocomplete("sky").await })
        };
        provider.entered.notified().await;
        assert!(app.snapshot().await.loading.autocomplete);

        newer.send(vec![suggestion("Skyrim")]).unwrap();
        assert_eq!(second.await.unwrap(), RequestOutcome::Applied);
        assert!(app.snapshot().await.loading.autocomplete);

        older.send(vec![suggestion("Skate 3")]).unwrap();
        assert_eq!(first.await.unwrap(), RequestOutcome::Superseded);

        let state = app.snapshot().await;
        assert_eq!(state.suggestions, vec![suggestion("Skyrim")]);
        assert!(!state.loading.autocomplete);
    }

    #[tokio::test]
    async fn test_details_arriving_after_close_are_dropped() {
        let provider = Arc::new(ScriptedProvider::default());
        let release = provider.script_details();
        let app = AppController::new(provider.clone());

        let task = {
            let app = app.clone();
            tokio::spawn(async move { app.request_game_details(game("Tunic")).await })
        };
        provider.entered.notified().await;

        app.close_details().await;
        release.send(Ok(GameDetails::default())).unwrap();
        assert_eq!(task.await.unwrap(), RequestOutcome::Superseded);

        let state = app.snapshot().await;
        assert_eq!(state.selected_game, None);
        assert_eq!(state.details, None);
    }
}
