/// Client-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Recommendation request failed; carries the message shown to the user
    #[error("{0}")]
    RecommendationFetch(String),

    /// Game details request failed; carries the message shown to the user
    #[error("{0}")]
    DetailsFetch(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AppError {
    /// Message suitable for display in the error banner
    pub fn user_message(&self) -> String {
        match self {
            AppError::RecommendationFetch(msg) | AppError::DetailsFetch(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
