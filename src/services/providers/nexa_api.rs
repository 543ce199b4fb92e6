/// Nexa recommendation backend provider
///
/// Talks to the FastAPI backend over JSON:
/// 1. Recommendations: POST /recommendations → games + explanation (+ degraded flag)
/// 2. Details: POST /game-details → description, screenshots, website
/// 3. Autocomplete: GET /igdb-autocomplete?q= → IGDB name suggestions
///
/// Error bodies carry a `detail` (FastAPI) or `error` field, surfaced verbatim.
use crate::{
    error::{AppError, AppResult},
    models::{
        AutocompleteSuggestion, DegradedNotice, Filters, GameDetails, GameSummary,
        RecommendationResult, SortKey, DEFAULT_DEGRADED_MESSAGE,
    },
    services::providers::{
        request_id::{RequestId, REQUEST_ID_HEADER},
        GameDataProvider,
    },
};
use reqwest::{Client as HttpClient, Response};
use serde_json::{json, Value};

const RECOMMENDATIONS_FALLBACK: &str = "Failed to fetch recommendations";
const DETAILS_FALLBACK: &str = "Failed to fetch game details";

#[derive(Clone)]
pub struct NexaApiProvider {
    http_client: HttpClient,
    api_url: String,
}

impl NexaApiProvider {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(HttpClient::new(), api_url)
    }

    pub fn with_client(http_client: HttpClient, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self {
            http_client,
            api_url,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path)
    }
}

/// Server-supplied error message, `detail` preferred over `error`
fn error_message(payload: &Value) -> Option<String> {
    ["detail", "error"]
        .iter()
        .find_map(|field| payload.get(*field).and_then(Value::as_str))
        .filter(|msg| !msg.is_empty())
        .map(String::from)
}

/// Reads the body as JSON; an unreadable or non-JSON body becomes `Null`
async fn read_payload(response: Response) -> Value {
    response.json::<Value>().await.unwrap_or(Value::Null)
}

/// Converts a recommendations payload, tolerating a missing or malformed `games` field
fn decode_recommendations(payload: &Value) -> RecommendationResult {
    let games: Vec<GameSummary> = match payload.get("games").and_then(Value::as_array) {
        Some(items) => {
            let games: Vec<GameSummary> = items
                .iter()
                .filter_map(|item| serde_json::from_value::<GameSummary>(item.clone()).ok())
                .collect();
            if games.len() != items.len() {
                tracing::warn!(
                    received = items.len(),
                    kept = games.len(),
                    "Dropped malformed game entries"
                );
            }
            games
        }
        None => {
            tracing::warn!("Recommendations response had no games list");
            Vec::new()
        }
    };

    let explain = payload
        .get("explain")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from);

    let ai_down = payload
        .get("ai_down")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let degraded = ai_down.then(|| DegradedNotice {
        message: payload
            .get("message")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_DEGRADED_MESSAGE)
            .to_string(),
    });

    RecommendationResult {
        games,
        explain,
        degraded,
    }
}

fn decode_suggestions(payload: &Value) -> Vec<AutocompleteSuggestion> {
    payload
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    serde_json::from_value::<AutocompleteSuggestion>(item.clone()).ok()
                })
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait::async_trait]
impl GameDataProvider for NexaApiProvider {
    async fn fetch_recommendations(
        &self,
        preference: &str,
        sort_key: SortKey,
        filters: &Filters,
    ) -> AppResult<RecommendationResult> {
        let request_id = RequestId::new();
        let body = json!({
            "preference": preference,
            "sort_by": sort_key,
            "filters": filters,
        });

        let response = self
            .http_client
            .post(self.endpoint("recommendations"))
            .header(REQUEST_ID_HEADER, request_id.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(request_id = %request_id, error = %e, "Recommendations request failed");
                AppError::RecommendationFetch(RECOMMENDATIONS_FALLBACK.to_string())
            })?;

        let status = response.status();
        let payload = read_payload(response).await;

        if !status.is_success() {
            tracing::warn!(
                request_id = %request_id,
                status = %status,
                "Recommendations API returned an error"
            );
            return Err(AppError::RecommendationFetch(
                error_message(&payload).unwrap_or_else(|| RECOMMENDATIONS_FALLBACK.to_string()),
            ));
        }

        if payload.get("games").is_none() {
            if let Some(message) = error_message(&payload) {
                tracing::warn!(request_id = %request_id, "Recommendations API returned an error payload");
                return Err(AppError::RecommendationFetch(message));
            }
        }

        let result = decode_recommendations(&payload);

        tracing::info!(
            request_id = %request_id,
            preference = %preference,
            sort_by = %sort_key,
            filters = filters.len(),
            results = result.games.len(),
            degraded = result.degraded.is_some(),
            provider = self.name(),
            "Recommendations fetched"
        );

        Ok(result)
    }

    async fn fetch_game_details(&self, title: &str) -> AppResult<GameDetails> {
        let request_id = RequestId::new();

        let response = self
            .http_client
            .post(self.endpoint("game-details"))
            .header(REQUEST_ID_HEADER, request_id.as_str())
            .json(&json!({ "title": title }))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(request_id = %request_id, error = %e, "Game details request failed");
                AppError::DetailsFetch(DETAILS_FALLBACK.to_string())
            })?;

        let status = response.status();
        let payload = read_payload(response).await;

        if !status.is_success() {
            tracing::warn!(
                request_id = %request_id,
                status = %status,
                title = %title,
                "Game details API returned an error"
            );
            return Err(AppError::DetailsFetch(
                error_message(&payload).unwrap_or_else(|| DETAILS_FALLBACK.to_string()),
            ));
        }

        if payload.get("description").is_none() && payload.get("screenshots").is_none() {
            if let Some(message) = error_message(&payload) {
                return Err(AppError::DetailsFetch(message));
            }
        }

        let details: GameDetails = serde_json::from_value(payload).map_err(|e| {
            tracing::error!(request_id = %request_id, error = %e, "Failed to parse game details");
            AppError::DetailsFetch(DETAILS_FALLBACK.to_string())
        })?;

        tracing::info!(
            request_id = %request_id,
            title = %title,
            screenshots = details.screenshots.len(),
            provider = self.name(),
            "Game details fetched"
        );

        Ok(details)
    }

    async fn fetch_autocomplete(&self, query: &str) -> Vec<AutocompleteSuggestion> {
        let request_id = RequestId::new();

        let response = match self
            .http_client
            .get(self.endpoint("igdb-autocomplete"))
            .header(REQUEST_ID_HEADER, request_id.as_str())
            .query(&[("q", query)])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(request_id = %request_id, error = %e, "Autocomplete request failed");
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            tracing::warn!(
                request_id = %request_id,
                status = %response.status(),
                "Autocomplete API returned an error"
            );
            return Vec::new();
        }

        let suggestions = decode_suggestions(&read_payload(response).await);

        tracing::debug!(
            request_id = %request_id,
            query = %query,
            results = suggestions.len(),
            "Autocomplete completed"
        );

        suggestions
    }

    fn name(&self) -> &'static str {
        "nexa_api"
    }
}
