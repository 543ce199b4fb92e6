use std::sync::Arc;

use anyhow::bail;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use nexa::{
    models::{FilterKey, GameSummary, SortKey},
    render,
    services::{AppController, FilterState, NexaApiProvider, RequestOutcome},
    Config,
};

#[derive(Debug, Parser)]
#[command(name = "nexa", version, about = "Discover your next favorite game")]
struct Cli {
    /// Override the API base URL (otherwise chosen by APP_ENV / API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Get recommendations for a free-text preference
    Recommend(RecommendArgs),
    /// Show details for one game title
    Details { title: String },
    /// List autocomplete suggestions for a partial name
    Suggest { query: String },
    /// Print the natural-language summary of a query without sending it
    Preview(PreviewArgs),
}

#[derive(Debug, Args)]
struct FilterArgs {
    #[arg(long)]
    genre: Option<String>,
    #[arg(long)]
    platform: Option<String>,
    #[arg(long)]
    year: Option<String>,
    #[arg(long)]
    mode: Option<String>,
    #[arg(long)]
    art_style: Option<String>,
    #[arg(long)]
    perspective: Option<String>,
    #[arg(long)]
    difficulty: Option<String>,
    #[arg(long)]
    popularity: Option<String>,
    #[arg(long)]
    price: Option<String>,
    #[arg(long)]
    score: Option<String>,
    /// Pick a random genre and platform
    #[arg(long)]
    surprise: bool,
}

impl FilterArgs {
    fn apply(&self, state: &mut FilterState) {
        if self.surprise {
            state.randomize();
        }
        let pairs = [
            (FilterKey::Genre, &self.genre),
            (FilterKey::Platform, &self.platform),
            (FilterKey::Year, &self.year),
            (FilterKey::Mode, &self.mode),
            (FilterKey::ArtStyle, &self.art_style),
            (FilterKey::Perspective, &self.perspective),
            (FilterKey::Difficulty, &self.difficulty),
            (FilterKey::Popularity, &self.popularity),
            (FilterKey::Price, &self.price),
            (FilterKey::Score, &self.score),
        ];
        for (key, value) in pairs {
            if let Some(value) = value {
                if !key.options().contains(&value.as_str()) {
                    tracing::warn!(key = %key, value = %value, "Value is not one of the listed options");
                }
                state.add_or_update_filter(key, value);
            }
        }
    }
}

#[derive(Debug, Args)]
struct RecommendArgs {
    /// What kind of games you like (max 100 characters)
    preference: String,
    #[arg(long, default_value_t = SortKey::Metacritic)]
    sort_by: SortKey,
    #[command(flatten)]
    filters: FilterArgs,
}

#[derive(Debug, Args)]
struct PreviewArgs {
    #[arg(default_value = "")]
    preference: String,
    #[command(flatten)]
    filters: FilterArgs,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nexa=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = Config::from_env()?;
    let api_url = cli.api_url.clone().unwrap_or_else(|| config.api_base_url());
    tracing::debug!(api_url = %api_url, "Using API base URL");

    let app = AppController::new(Arc::new(NexaApiProvider::new(api_url)));

    match cli.command {
        Command::Recommend(args) => {
            let mut state = FilterState::new();
            args.filters.apply(&mut state);
            state.set_sort_key(args.sort_by);
            state.set_preference(&args.preference);

            if !state.chips().is_empty() {
                println!("{}", render::chip_line(state.chips()));
            }
            println!("{}\n", state.preview());

            let Some(query) = state.submit() else {
                bail!("Please describe what kind of games you like");
            };
            let outcome = app.submit(&query).await;
            let snapshot = app.snapshot().await;

            if outcome == RequestOutcome::Failed {
                bail!(snapshot
                    .error
                    .unwrap_or_else(|| "Failed to get recommendations. Please try again.".to_string()));
            }
            print!("{}", render::results(&snapshot));
        }
        Command::Details { title } => {
            let outcome = app.request_game_details(GameSummary::new(title)).await;
            let snapshot = app.snapshot().await;
            if let Some(game) = &snapshot.selected_game {
                print!("{}", render::details_panel(game, snapshot.details.as_ref()));
            }
            if outcome == RequestOutcome::Failed {
                if let Some(error) = snapshot.error {
                    eprintln!("{}", error);
                }
            }
        }
        Command::Suggest { query } => {
            app.request_autocomplete(&query).await;
            let snapshot = app.snapshot().await;
            print!("{}", render::suggestion_list(snapshot.visible_suggestions()));
        }
        Command::Preview(args) => {
            let mut state = FilterState::new();
            args.filters.apply(&mut state);
            state.set_preference(&args.preference);
            println!("{}", state.preview());
        }
    }

    Ok(())
}
