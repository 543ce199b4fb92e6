use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One recommended game, as listed in the results grid
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameSummary {
    pub title: String,
    #[serde(default, deserialize_with = "present_string")]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub platforms: Vec<String>,
    #[serde(default, deserialize_with = "optional_f64")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "string_list")]
    pub genres: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub developers: Vec<String>,
    #[serde(default, deserialize_with = "optional_u32")]
    pub metacritic: Option<u32>,
    #[serde(default, deserialize_with = "present_string")]
    pub background_image: Option<String>,
    /// Live Twitch viewers at the time the list was built
    #[serde(default, rename = "twitch_viewers", deserialize_with = "optional_u64")]
    pub live_viewers: Option<u64>,
}

impl GameSummary {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            release_date: None,
            platforms: Vec::new(),
            rating: None,
            genres: Vec::new(),
            developers: Vec::new(),
            metacritic: None,
            background_image: None,
            live_viewers: None,
        }
    }

    /// Compact viewer count ("850", "12.4K"); `None` when nobody is watching
    pub fn viewer_label(&self) -> Option<String> {
        match self.live_viewers {
            None | Some(0) => None,
            Some(count) if count >= 1000 => Some(format!("{:.1}K", count as f64 / 1000.0)),
            Some(count) => Some(count.to_string()),
        }
    }
}

/// Lazily fetched extra information for one game
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GameDetails {
    #[serde(default, deserialize_with = "present_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub screenshots: Vec<String>,
    #[serde(default, deserialize_with = "present_string")]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub publishers: Vec<String>,
    #[serde(default, deserialize_with = "present_string")]
    pub esrb_rating: Option<String>,
}

/// Candidate game name offered while typing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AutocompleteSuggestion {
    pub name: String,
    #[serde(default, deserialize_with = "present_string")]
    pub cover: Option<String>,
}

impl AutocompleteSuggestion {
    /// Cover URL resized from IGDB thumbnail to the small cover format
    pub fn cover_small(&self) -> Option<String> {
        self.cover
            .as_ref()
            .map(|url| url.replace("t_thumb", "t_cover_small"))
    }
}

/// Backend signalled that its AI dependency is down and example data is shown
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DegradedNotice {
    pub message: String,
}

pub const DEFAULT_DEGRADED_MESSAGE: &str =
    "AI recommendations are temporarily unavailable. Showing example games.";

/// Outcome of one recommendation request
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResult {
    pub games: Vec<GameSummary>,
    pub explain: Option<String>,
    pub degraded: Option<DegradedNotice>,
}

// The backend fills absent values with "N/A", empty strings, or joins lists with ", ".

fn present_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() && s != "N/A" => Some(s),
        _ => None,
    })
}

fn string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(String::from)
            .collect(),
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn optional_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn optional_u64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn optional_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    Ok(optional_u64(d)?.and_then(|n| u32::try_from(n).ok()))
}
