use serde::Deserialize;

/// Base URL used when no environment is selected or `APP_ENV=development`
pub const DEVELOPMENT_API_URL: &str = "http://localhost:8000/api";

/// Which backend deployment the client talks to
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApiEnvironment {
    Production,
    #[default]
    Development,
}

/// Client configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Target deployment (`production` or `development`)
    #[serde(default)]
    pub app_env: ApiEnvironment,

    /// Production API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_api_url() -> String {
    "https://your-app-name.railway.app/api".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_env: ApiEnvironment::default(),
            api_url: default_api_url(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Resolves the API base URL for the selected environment
    ///
    /// `api_url` only applies to production; development always targets the local backend.
    pub fn api_base_url(&self) -> String {
        match self.app_env {
            ApiEnvironment::Production => self.api_url.trim_end_matches('/').to_string(),
            ApiEnvironment::Development => DEVELOPMENT_API_URL.to_string(),
        }
    }
}
