pub mod app;
pub mod filters;
pub mod providers;
pub mod summarizer;

pub use app::{AppController, AppSnapshot, LoadingFlags, RequestOutcome};
pub use filters::FilterState;
pub use providers::{GameDataProvider, NexaApiProvider};
pub use summarizer::summarize;
