// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Git Contributions API Server
//!
//! Serves the combined GitHub/GitLab contribution calendar for sessions
//! encoded entirely in the URL.

use git_contributions::{config::Config, services::ContributionService, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Git Contributions API");

    // Shared upstream clients
    let contributions = ContributionService::from_config(&config)?;
    tracing::info!(
        github = %config.github_graphql_url,
        gitlab = %config.gitlab_api_url,
        "Upstream clients initialized"
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        contributions,
    });

    // Build router
    let app = git_contributions::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("git_contributions=debug,info")),
        )
        .with(format)
        .init();
}
