// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GitLab events client.
//!
//! GitLab has no calendar endpoint, so contributions are rebuilt from the
//! user's event feed: newest first, 100 events per page, at most
//! `MAX_PAGES` pages. Each event counts once, except pushes, which count
//! their commits.

use crate::error::AppError;
use crate::models::contribution::days_from_map;
use crate::models::ContributionDay;
use crate::time_utils::{one_year_ago, utc_date_of};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Events requested per page; a shorter page is the last one.
pub const PER_PAGE: usize = 100;

/// Hard ceiling on pages fetched per account.
pub const MAX_PAGES: u32 = 10;

/// GitLab API client.
#[derive(Clone)]
pub struct GitlabClient {
    http: reqwest::Client,
    base_url: String,
}

impl GitlabClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Contribution days for the trailing year. Empty on any failure,
    /// including a missing token.
    pub async fn fetch(&self, username: &str, token: Option<&str>) -> Vec<ContributionDay> {
        match self.try_fetch(username, token).await {
            Ok(days) => days,
            Err(e) => {
                tracing::warn!(username, error = %e, "GitLab contributions unavailable");
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

    /// Contribution days for events after the cutoff one year before `now`.
    pub async fn try_fetch_at(
        &self,
        username: &str,
        token: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Vec<ContributionDay>, AppError> {
        let token = token.ok_or(AppError::MissingToken("GitLab"))?;
        let after = one_year_ago(now).date_naive();

        let mut counts = BTreeMap::new();
        let mut pages = 0;

        for page in 1..=MAX_PAGES {
            let batch = self.list_events(token, username, after, page).await?;
            pages = page;
            add_events(&mut counts, &batch.events);

            if batch.len < PER_PAGE {
                break;
            }
        }

        tracing::debug!(username, pages, days = counts.len(), "Fetched GitLab events");
        Ok(days_from_map(counts))
    }

    /// List one page of a user's events, newest first.
    pub async fn list_events(
        &self,
        token: &str,
        username: &str,
        after: NaiveDate,
        page: u32,
    ) -> Result<EventPage, AppError> {
        let url = format!(
            "{}/users/{}/events",
            self.base_url,
            urlencoding::encode(username)
        );

        let response = self
            .http
            .get(&url)
            .header("PRIVATE-TOKEN", token)
            .query(&[
                ("after", after.format("%Y-%m-%d").to_string()),
                ("per_page", PER_PAGE.to_string()),
                ("page", page.to_string()),
                ("sort", "desc".to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::GitlabApi(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 401 {
                return Err(AppError::GitlabApi("Invalid private token".to_string()));
            }

            return Err(AppError::GitlabApi(format!("HTTP {}: {}", status, body)));
        }

        let entries: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| AppError::GitlabApi(format!("JSON parse error: {}", e)))?;

        Ok(EventPage::from_entries(entries))
    }
}

/// One page of the events feed.
#[derive(Debug, Default)]
pub struct EventPage {
    /// Entries on the page, unreadable ones included
    pub len: usize,
    pub events: Vec<GitlabEvent>,
}

impl EventPage {
    /// Keep the entries that read as events; `null`s and mistyped fields are skipped.
    pub fn from_entries(entries: Vec<serde_json::Value>) -> Self {
        let len = entries.len();
        let events: Vec<GitlabEvent> = entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect();

        if events.len() < len {
            tracing::debug!(skipped = len - events.len(), "Skipped unreadable GitLab events");
        }
        Self { len, events }
    }
}

/// One entry of the events feed. Only the fields used for counting.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitlabEvent {
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub push_data: Option<PushData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushData {
    #[serde(default)]
    pub commit_count: Option<u64>,
}

impl GitlabEvent {
    /// UTC calendar day of the event.
    pub fn date(&self) -> Option<NaiveDate> {
        self.created_at.as_deref().and_then(utc_date_of)
    }

    /// Commits for a push with a non-zero count, otherwise 1.
    pub fn weight(&self) -> u64 {
        match self.push_data.as_ref().and_then(|p| p.commit_count) {
            Some(count) if count > 0 => count,
            _ => 1,
        }
    }
}

/// Accumulate events into a date → count map. Undated events are skipped.
pub fn add_events(counts: &mut BTreeMap<NaiveDate, u64>, events: &[GitlabEvent]) {
    for event in events {
        if let Some(date) = event.date() {
            *counts.entry(date).or_insert(0) += event.weight();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(created_at: &str, commits: Option<u64>) -> GitlabEvent {
        GitlabEvent {
            created_at: Some(created_at.to_string()),
            push_data: commits.map(|c| PushData {
                commit_count: Some(c),
            }),
        }
    }

    #[test]
    fn test_push_and_plain_event_same_day() {
        let mut counts = BTreeMap::new();
        add_events(
            &mut counts,
            &[
                event("2025-04-10T08:00:00Z", Some(3)),
                event("2025-04-10T21:15:00.123Z", None),
            ],
        );

        let days = days_from_map(counts);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].count, 4);
    }

    #[test]
    fn test_page_skips_unreadable_entries() {
        let entries: Vec<serde_json::Value> = serde_json::from_str(
            r#"[
                {"created_at": "2025-04-10T08:00:00Z", "push_data": {"commit_count": 3}},
                null,
                {"created_at": 1744272000},
                {"created_at": "2025-04-10T09:00:00Z", "push_data": {"commit_count": null}},
                "pushed"
            ]"#,
        )
        .unwrap();

        let page = EventPage::from_entries(entries);
        assert_eq!(page.len, 5);
        assert_eq!(page.events.len(), 2);

        let mut counts = BTreeMap::new();
        add_events(&mut counts, &page.events);
        assert_eq!(days_from_map(counts)[0].count, 4);
    }

    #[test]
    fn test_zero_commit_push_counts_once() {
        assert_eq!(event("2025-04-10T08:00:00Z", Some(0)).weight(), 1);
    }

    #[test]
    fn test_undated_events_skipped() {
        let mut counts = BTreeMap::new();
        add_events(
            &mut counts,
            &[
                GitlabEvent::default(),
                event("not a timestamp", Some(9)),
                event("2025-04-11T00:00:00Z", None),
            ],
        );
        assert_eq!(counts.values().sum::<u64>(), 1);
    }

    #[test]
    fn test_days_sorted_by_date() {
        let mut counts = BTreeMap::new();
        add_events(
            &mut counts,
            &[
                event("2025-05-02T10:00:00Z", None),
                event("2025-01-20T10:00:00Z", None),
                event("2025-03-15T10:00:00Z", None),
            ],
        );
        let dates: Vec<String> = days_from_map(counts)
            .iter()
            .map(|d| d.date.to_string())
            .collect();
        assert_eq!(dates, vec!["2025-01-20", "2025-03-15", "2025-05-02"]);
    }

    #[test]
    fn test_event_deserializes_with_extra_fields() {
        let json = r#"{"id":1,"action_name":"pushed to","created_at":"2025-04-10T08:00:00.000Z","push_data":{"commit_count":2,"ref":"main"}}"#;
        let event: GitlabEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.weight(), 2);
    }
}
