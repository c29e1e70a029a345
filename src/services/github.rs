// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GitHub GraphQL client for contribution calendars.
//!
//! One request per account: the contribution calendar for the trailing
//! window comes back grouped by week and is flattened into a day list.

use crate::error::AppError;
use crate::models::ContributionDay;
use crate::time_utils::{format_utc_rfc3339, one_year_ago, trailing_window};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

const CALENDAR_QUERY: &str = r#"
query($login: String!, $from: DateTime!, $to: DateTime!) {
  user(login: $login) {
    contributionsCollection(from: $from, to: $to) {
      contributionCalendar {
        totalContributions
        weeks {
          contributionDays {
            contributionCount
            date
          }
        }
      }
    }
  }
}
"#;

/// GitHub API client.
#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    graphql_url: String,
}

impl GithubClient {
    pub fn new(http: reqwest::Client, graphql_url: impl Into<String>) -> Self {
        Self {
            http,
            graphql_url: graphql_url.into(),
        }
    }

    /// Contribution days for the trailing year. Empty on any failure.
    pub async fn fetch(&self, username: &str, token: Option<&str>) -> Vec<ContributionDay> {
        match self.try_fetch(username, token).await {
            Ok(days) => days,
            Err(e) => {
                tracing::warn!(username, error = %e, "GitHub contributions unavailable");
                Vec::new()
            }
        }
    }

    /// Contribution days for the trailing year ending now.
    pub async fn try_fetch(
        &self,
        username: &str,
        token: Option<&str>,
    ) -> Result<Vec<ContributionDay>, AppError> {
        self.try_fetch_at(username, token, Utc::now()).await
    }

    /// Contribution days for the trailing year ending at `now`.
    pub async fn try_fetch_at(
        &self,
        username: &str,
        token: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Vec<ContributionDay>, AppError> {
        let body = serde_json::json!({
            "query": CALENDAR_QUERY,
            "variables": {
                "login": username,
                "from": format_utc_rfc3339(one_year_ago(now)),
                "to": format_utc_rfc3339(now),
            }
        });

        let mut request = self.http.post(&self.graphql_url).json(&body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::GithubApi(e.to_string()))?;

        let payload: GraphqlResponse = check_response_json(response).await?;
        let days = payload.into_days(username)?;

        let (start, end) = trailing_window(now);
        let days: Vec<ContributionDay> = days
            .into_iter()
            .filter(|d| d.date >= start && d.date <= end)
            .collect();

        tracing::debug!(username, days = days.len(), "Fetched GitHub calendar");
        Ok(days)
    }
}

/// Check response status and parse the JSON body.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.as_u16() == 401 {
            return Err(AppError::GithubApi("Bad credentials".to_string()));
        }

        return Err(AppError::GithubApi(format!("HTTP {}: {}", status, body)));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::GithubApi(format!("JSON parse error: {}", e)))
}

// ─── Response shapes ─────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<GraphqlData>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GraphqlData {
    user: Option<GithubUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GithubUser {
    contributions_collection: ContributionsCollection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionsCollection {
    contribution_calendar: ContributionCalendar,
}

/// Week-grouped calendar as returned by GitHub.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionCalendar {
    #[serde(default)]
    pub total_contributions: u64,
    pub weeks: Vec<CalendarWeek>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarWeek {
    pub contribution_days: Vec<CalendarDay>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub contribution_count: u64,
    pub date: NaiveDate,
}

impl ContributionCalendar {
    /// Flatten weeks into a single day list, oldest first.
    pub fn flatten(self) -> Vec<ContributionDay> {
        self.weeks
            .into_iter()
            .flat_map(|week| week.contribution_days)
            .map(|day| ContributionDay::new(day.date, day.contribution_count))
            .collect()
    }
}

impl GraphqlResponse {
    fn into_days(self, username: &str) -> Result<Vec<ContributionDay>, AppError> {
        if let Some(err) = self.errors.first() {
            return Err(AppError::GithubApi(err.message.clone()));
        }

        let user = self.data.and_then(|d| d.user).ok_or_else(|| {
            AppError::GithubApi(format!("Could not resolve user '{}'", username))
        })?;

        Ok(user
            .contributions_collection
            .contribution_calendar
            .flatten())
    }
}
