use std::fmt::Write;

use crate::{
    models::{AutocompleteSuggestion, FilterChip, GameDetails, GameSummary},
    services::app::AppSnapshot,
};

fn join_or_na(items: &[String]) -> String {
    if items.is_empty() {
        "N/A".to_string()
    } else {
        items.join(", ")
    }
}

/// One result card
pub fn game_card(game: &GameSummary) -> String {
    let mut out = String::new();
    let _ = write!(out, "{}", game.title);
    if let Some(score) = game.metacritic {
        let _ = write!(out, " [{}]", score);
    }
    out.push('\n');
    if let Some(viewers) = game.viewer_label() {
        let _ = writeln!(out, "  {} watching", viewers);
    }
    let _ = writeln!(
        out,
        "  Released:  {}",
        game.release_date.as_deref().unwrap_or("N/A")
    );
    let _ = writeln!(out, "  Platforms: {}", join_or_na(&game.platforms));
    let _ = writeln!(
        out,
        "  Rating:    {}",
        game.rating
            .map(|r| format!("{:.2}", r))
            .unwrap_or_else(|| "N/A".to_string())
    );
    let _ = writeln!(out, "  Genres:    {}", join_or_na(&game.genres));
    out
}

/// Detail panel; falls back to the summary when details are missing
pub fn details_panel(game: &GameSummary, details: Option<&GameDetails>) -> String {
    let mut out = game_card(game);
    let _ = writeln!(out, "  Developers: {}", join_or_na(&game.developers));

    match details {
        Some(details) => {
            let _ = writeln!(
                out,
                "\n{}",
                details
                    .description
                    .as_deref()
                    .unwrap_or("No description available.")
            );
            if !details.publishers.is_empty() {
                let _ = writeln!(out, "\nPublishers: {}", details.publishers.join(", "));
            }
            if let Some(esrb) = &details.esrb_rating {
                let _ = writeln!(out, "ESRB: {}", esrb);
            }
            if let Some(website) = &details.website {
                let _ = writeln!(out, "Website: {}", website);
            }
            if !details.screenshots.is_empty() {
                let _ = writeln!(out, "Screenshots:");
                for shot in &details.screenshots {
                    let _ = writeln!(out, "  {}", shot);
                }
            }
        }
        None => {
            let _ = writeln!(out, "\nNo additional details available.");
        }
    }
    out
}

pub fn suggestion_list(suggestions: &[AutocompleteSuggestion]) -> String {
    let mut out = String::new();
    for suggestion in suggestions {
        match suggestion.cover_small() {
            Some(cover) => {
                let _ = writeln!(out, "{}  ({})", suggestion.name, cover);
            }
            None => {
                let _ = writeln!(out, "{}", suggestion.name);
            }
        }
    }
    out
}

pub fn chip_line(chips: &[FilterChip]) -> String {
    chips
        .iter()
        .map(|chip| format!("[{}]", chip.label()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Results view: degraded notice or explanation, then the capped game grid
pub fn results(snapshot: &AppSnapshot) -> String {
    let mut out = String::new();
    match (&snapshot.degraded, &snapshot.explain) {
        (Some(notice), _) => {
            let _ = writeln!(out, "{}\n", notice.message);
        }
        (None, Some(explain)) => {
            let _ = writeln!(out, "{}\n", explain);
        }
        (None, None) => {}
    }
    for game in snapshot.visible_games() {
        out.push_str(&game_card(game));
        out.push('\n');
    }
    out
}
