use crate::models::{FilterKey, Filters};

/// Builds the one-sentence prompt preview for the active filters and preference
///
/// Filters are rendered in facet priority order and joined as a natural-language
/// list (Oxford comma for three or more). Never fails; empty values count as absent.
pub fn summarize(filters: &Filters, preference: &str) -> String {
    let parts: Vec<String> = filters
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| render_filter(key, value))
        .collect();

    let filter_clause = natural_list(&parts);

    match (filter_clause.is_empty(), preference.is_empty()) {
        (false, false) => format!(
            "Showing recommendations for {} and your interest \"{}\".",
            filter_clause, preference
        ),
        (false, true) => format!("Showing recommendations for {}.", filter_clause),
        (true, false) => format!(
            "Showing recommendations for your interest \"{}\".",
            preference
        ),
        (true, true) => "Showing recommendations.".to_string(),
    }
}

fn render_filter(key: FilterKey, value: &str) -> String {
    match key {
        FilterKey::Genre => format!("{} games", value),
        FilterKey::Platform => format!("for {}", value),
        FilterKey::Year => format!("released in {}", value),
        FilterKey::Mode => cap_first(value),
        FilterKey::ArtStyle => format!("{} art style", value),
        FilterKey::Perspective => format!("{} perspective", value),
        FilterKey::Difficulty => format!("{} difficulty", cap_first(value)),
        FilterKey::Popularity => format!("Popularity: {}", value.to_uppercase()),
        FilterKey::Price => format!("priced {}", value.to_uppercase()),
        FilterKey::Score => format!("with score above {}", value),
    }
}

/// Upper-cases the first character and lower-cases the rest
fn cap_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn natural_list(parts: &[String]) -> String {
    match parts {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{} and {}", first, second),
        [init @ .., last] => format!("{}, and {}", init.join(", "), last),
    }
}
