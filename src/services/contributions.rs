// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fetch contributions for every tracked account at once.

use crate::config::Config;
use crate::error::AppError;
use crate::models::{Account, AccountKey, ContributionDay, Platform};
use crate::services::{GithubClient, GitlabClient};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Result of fetching one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountContributions {
    pub key: AccountKey,
    pub days: Vec<ContributionDay>,
    /// Why the account came back empty, if it failed.
    pub error: Option<String>,
}

impl AccountContributions {
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Dispatches accounts to the right platform client.
#[derive(Clone)]
pub struct ContributionService {
    github: GithubClient,
    gitlab: GitlabClient,
}

impl ContributionService {
    pub fn new(github: GithubClient, gitlab: GitlabClient) -> Self {
        Self { github, gitlab }
    }

    /// Build both clients on a shared connection pool.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let http = build_http_client(config)?;
        Ok(Self::new(
            GithubClient::new(http.clone(), config.github_graphql_url.clone()),
            GitlabClient::new(http, config.gitlab_api_url.clone()),
        ))
    }

    /// Fetch one account. Failures become an empty series plus an error note.
    pub async fn fetch_account(&self, account: &Account) -> AccountContributions {
        let token = account.token.as_deref();
        let result = match account.platform {
            Platform::Github => self.github.try_fetch(&account.username, token).await,
            Platform::Gitlab => self.gitlab.try_fetch(&account.username, token).await,
        };

        match result {
            Ok(days) => AccountContributions {
                key: account.key(),
                days,
                error: None,
            },
            Err(e) => {
                tracing::warn!(
                    platform = %account.platform,
                    username = %account.username,
                    error = %e,
                    "Failed to fetch contributions"
                );
                AccountContributions {
                    key: account.key(),
                    days: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Fetch all accounts concurrently and wait for every one to settle.
    /// Results keep the order of `accounts`.
    pub async fn fetch_all(&self, accounts: &[Account]) -> Vec<AccountContributions> {
        let results = join_all(accounts.iter().map(|a| self.fetch_account(a))).await;

        let failed = results.iter().filter(|r| r.failed()).count();
        tracing::info!(accounts = accounts.len(), failed, "Contributions fetched");
        results
    }
}

/// Shared HTTP client for upstream calls.
pub fn build_http_client(config: &Config) -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder()
        .user_agent(concat!("git-contributions/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {}", e)))
}
