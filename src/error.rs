// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Session is read-only")]
    ReadOnly,

    #[error("Access token required for {0}")]
    MissingToken(&'static str),

    #[error("GitHub API error: {0}")]
    GithubApi(String),

    #[error("GitLab API error: {0}")]
    GitlabApi(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Whether the error came from one of the upstream platform APIs.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            AppError::GithubApi(_) | AppError::GitlabApi(_) | AppError::MissingToken(_)
        )
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::ReadOnly => (StatusCode::FORBIDDEN, "read_only", None),
            AppError::MissingToken(platform) => (
                StatusCode::BAD_REQUEST,
                "missing_token",
                Some(platform.to_string()),
            ),
            AppError::GithubApi(msg) => {
                (StatusCode::BAD_GATEWAY, "github_error", Some(msg.clone()))
            }
            AppError::GitlabApi(msg) => {
                (StatusCode::BAD_GATEWAY, "gitlab_error", Some(msg.clone()))
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
