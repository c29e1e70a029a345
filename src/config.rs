//! Application configuration loaded from environment variables.
//!
//! Nothing here is secret: access tokens arrive inside state segments and
//! are passed straight through to the upstream APIs.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL (CORS origin)
    pub frontend_url: String,
    /// Origin used when building absolute share links
    pub public_base_url: String,
    /// GitHub GraphQL endpoint
    pub github_graphql_url: String,
    /// GitLab REST API base (without trailing slash)
    pub gitlab_api_url: String,
    /// Timeout applied to every upstream request
    pub http_timeout_secs: u64,
    /// Server port
    pub port: u16,
}

pub const DEFAULT_GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";
pub const DEFAULT_GITLAB_API_URL: &str = "https://gitlab.com/api/v4";

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());
        let public_base_url = env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| frontend_url.clone());

        Ok(Self {
            public_base_url: trim_base(&public_base_url),
            frontend_url,
            github_graphql_url: env::var("GITHUB_GRAPHQL_URL")
                .unwrap_or_else(|_| DEFAULT_GITHUB_GRAPHQL_URL.to_string()),
            gitlab_api_url: trim_base(
                &env::var("GITLAB_API_URL")
                    .unwrap_or_else(|_| DEFAULT_GITLAB_API_URL.to_string()),
            ),
            http_timeout_secs: parse_var("HTTP_TIMEOUT_SECS", 20)?,
            port: parse_var("PORT", 8080)?,
        })
    }

    /// Config for tests. Upstreams point at a closed port until a test
    /// swaps in its mock server.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            public_base_url: "https://contributions.example.com".to_string(),
            github_graphql_url: "http://127.0.0.1:9/graphql".to_string(),
            gitlab_api_url: "http://127.0.0.1:9/api/v4".to_string(),
            http_timeout_secs: 5,
            port: 8080,
        }
    }
}

fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(name)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
