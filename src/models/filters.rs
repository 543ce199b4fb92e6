use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use crate::error::AppError;

/// Facet a recommendation can be narrowed by
///
/// Variant order is the order facets are summarized in, so iterating a
/// [`Filters`] map yields keys in that order too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKey {
    Genre,
    Platform,
    Year,
    Mode,
    ArtStyle,
    Perspective,
    Difficulty,
    Popularity,
    Price,
    Score,
}

impl FilterKey {
    pub const ALL: [FilterKey; 10] = [
        FilterKey::Genre,
        FilterKey::Platform,
        FilterKey::Year,
        FilterKey::Mode,
        FilterKey::ArtStyle,
        FilterKey::Perspective,
        FilterKey::Difficulty,
        FilterKey::Popularity,
        FilterKey::Price,
        FilterKey::Score,
    ];

    /// Wire name, as sent in the `filters` object
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKey::Genre => "genre",
            FilterKey::Platform => "platform",
            FilterKey::Year => "year",
            FilterKey::Mode => "mode",
            FilterKey::ArtStyle => "art_style",
            FilterKey::Perspective => "perspective",
            FilterKey::Difficulty => "difficulty",
            FilterKey::Popularity => "popularity",
            FilterKey::Price => "price",
            FilterKey::Score => "score",
        }
    }

    /// Human label for the facet selector
    pub fn label(&self) -> &'static str {
        match self {
            FilterKey::Genre => "Genre",
            FilterKey::Platform => "Platform",
            FilterKey::Year => "Year",
            FilterKey::Mode => "Mode",
            FilterKey::ArtStyle => "Art Style",
            FilterKey::Perspective => "Perspective",
            FilterKey::Difficulty => "Difficulty",
            FilterKey::Popularity => "Popularity",
            FilterKey::Price => "Price",
            FilterKey::Score => "Score",
        }
    }

    /// Values offered by the facet selector
    pub fn options(&self) -> &'static [&'static str] {
        match self {
            FilterKey::Genre => &["Action", "RPG", "Strategy", "Horror", "Shooter", "Adventure"],
            FilterKey::Platform => &["PC", "PlayStation", "Xbox", "Switch", "Mobile"],
            FilterKey::Year => &[
                "2024",
                "2023",
                "2022",
                "2021",
                "2020",
                "2010-2019",
                "2000-2009",
            ],
            FilterKey::Mode => &["Singleplayer", "Multiplayer", "Co-op", "MMO"],
            FilterKey::ArtStyle => &["Pixel", "3D", "Cartoon", "Realistic"],
            FilterKey::Perspective => &["First-person", "Third-person", "Top-down"],
            FilterKey::Difficulty => &["Casual", "Hardcore", "Challenging"],
            FilterKey::Popularity => &["Trending", "Hidden Gems", "Critically Acclaimed"],
            FilterKey::Price => &["Free", "Under $20", "$20-$40", "$40+"],
            FilterKey::Score => &["80+", "70+", "60+", "Any"],
        }
    }

    /// Advanced facets are hidden behind a toggle in the filter panel
    pub fn is_advanced(&self) -> bool {
        !matches!(
            self,
            FilterKey::Genre | FilterKey::Platform | FilterKey::Year | FilterKey::Mode
        )
    }
}

impl Display for FilterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FilterKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| AppError::InvalidInput(format!("unknown filter key: {}", s)))
    }
}

/// Active facet constraints, at most one value per key
///
/// A key is present only while its filter is active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filters(BTreeMap<FilterKey, String>);

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: FilterKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    pub fn set(&mut self, key: FilterKey, value: impl Into<String>) {
        self.0.insert(key, value.into());
    }

    pub fn remove(&mut self, key: FilterKey) -> Option<String> {
        self.0.remove(&key)
    }

    pub fn contains(&self, key: FilterKey) -> bool {
        self.0.contains_key(&key)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = FilterKey> + '_ {
        self.0.keys().copied()
    }

    /// Iterates in summary priority order
    pub fn iter(&self) -> impl Iterator<Item = (FilterKey, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl FromIterator<(FilterKey, String)> for Filters {
    fn from_iter<T: IntoIterator<Item = (FilterKey, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Display token for one active filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterChip {
    pub key: FilterKey,
    pub value: String,
}

impl FilterChip {
    pub fn new(key: FilterKey, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }

    pub fn label(&self) -> String {
        format!("{}: {}", self.key, self.value)
    }
}

/// Ordering the backend applies to the recommendation list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    ReleaseDate,
    Rating,
    #[default]
    Metacritic,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::ReleaseDate => "release_date",
            SortKey::Rating => "rating",
            SortKey::Metacritic => "metacritic",
        }
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "release_date" => Ok(SortKey::ReleaseDate),
            "rating" => Ok(SortKey::Rating),
            "metacritic" => Ok(SortKey::Metacritic),
            other => Err(AppError::InvalidInput(format!("unknown sort key: {}", other))),
        }
    }
}
