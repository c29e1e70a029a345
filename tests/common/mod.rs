// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared test helpers: a local mock of both upstream APIs.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, Utc};
use git_contributions::config::Config;
use git_contributions::routes::create_router;
use git_contributions::services::{ContributionService, GithubClient, GitlabClient};
use git_contributions::AppState;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

/// Token the mock GitLab accepts.
#[allow(dead_code)]
pub const GITLAB_TOKEN: &str = "glpat-test";

/// GitHub login the mock reports as unknown.
#[allow(dead_code)]
pub const UNKNOWN_GITHUB_USER: &str = "ghost";

/// Shape of the mock GitLab feed for one user.
#[derive(Clone, Debug)]
pub struct Feed {
    /// Pages returned with a full 100 events
    pub full_pages: u32,
    /// Length of the page after the full ones
    pub last_page_len: usize,
    /// Timestamp given to every event
    pub created_at: String,
    /// Commit count for push events; `None` serves plain events
    pub commit_count: Option<u64>,
}

impl Feed {
    #[allow(dead_code)]
    pub fn new(full_pages: u32, last_page_len: usize) -> Self {
        Self {
            full_pages,
            last_page_len,
            created_at: (Utc::now() - Duration::days(3)).to_rfc3339(),
            commit_count: None,
        }
    }
}

/// Mock state, inspectable by tests.
#[derive(Default)]
pub struct MockUpstream {
    pub feeds: Mutex<HashMap<String, Feed>>,
    /// Raw event pages by username, served instead of generated feeds
    pub raw_pages: Mutex<HashMap<String, Vec<Value>>>,
    pub gitlab_requests: AtomicU32,
    pub github_requests: AtomicU32,
    pub last_github_auth: Mutex<Option<String>>,
    pub last_gitlab_query: Mutex<Option<EventsQuery>>,
}

impl MockUpstream {
    #[allow(dead_code)]
    pub fn set_feed(&self, username: &str, feed: Feed) {
        self.feeds
            .lock()
            .unwrap()
            .insert(username.to_string(), feed);
    }

    #[allow(dead_code)]
    pub fn set_raw_page(&self, username: &str, events: Value) {
        self.set_raw_pages(username, vec![events]);
    }

    /// Serve these pages in order; later pages are empty.
    #[allow(dead_code)]
    pub fn set_raw_pages(&self, username: &str, pages: Vec<Value>) {
        self.raw_pages
            .lock()
            .unwrap()
            .insert(username.to_string(), pages);
    }

    #[allow(dead_code)]
    pub fn gitlab_requests(&self) -> u32 {
        self.gitlab_requests.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn github_requests(&self) -> u32 {
        self.github_requests.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct EventsQuery {
    pub after: String,
    pub per_page: usize,
    pub page: u32,
    pub sort: String,
}

async fn gitlab_events(
    State(mock): State<Arc<MockUpstream>>,
    Path(username): Path<String>,
    Query(query): Query<EventsQuery>,
    headers: HeaderMap,
) -> Response {
    mock.gitlab_requests.fetch_add(1, Ordering::SeqCst);
    *mock.last_gitlab_query.lock().unwrap() = Some(query.clone());

    let token = headers
        .get("PRIVATE-TOKEN")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if token != GITLAB_TOKEN {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "401 Unauthorized"})),
        )
            .into_response();
    }

    if let Some(pages) = mock.raw_pages.lock().unwrap().get(&username) {
        let page = pages
            .get(query.page as usize - 1)
            .cloned()
            .unwrap_or_else(|| json!([]));
        return Json(page).into_response();
    }

    let Some(feed) = mock.feeds.lock().unwrap().get(&username).cloned() else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "404 User Not Found"})),
        )
            .into_response();
    };

    let len = if query.page <= feed.full_pages {
        query.per_page
    } else if query.page == feed.full_pages.saturating_add(1) {
        feed.last_page_len
    } else {
        0
    };

    let events: Vec<Value> = (0..len)
        .map(|i| {
            let mut event = json!({
                "id": i,
                "action_name": "commented on",
                "created_at": feed.created_at,
            });
            if let Some(count) = feed.commit_count {
                event["action_name"] = json!("pushed to");
                event["push_data"] = json!({"commit_count": count, "ref": "main"});
            }
            event
        })
        .collect();

    Json(events).into_response()
}

async fn github_graphql(
    State(mock): State<Arc<MockUpstream>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    mock.github_requests.fetch_add(1, Ordering::SeqCst);
    *mock.last_github_auth.lock().unwrap() = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let login = body["variables"]["login"].as_str().unwrap_or_default();
    if login == UNKNOWN_GITHUB_USER {
        return Json(json!({
            "data": { "user": null },
            "errors": [{ "message": format!("Could not resolve to a User with the login of '{}'.", login) }]
        }))
        .into_response();
    }

    if login == "broken" {
        return (StatusCode::BAD_GATEWAY, "upstream down").into_response();
    }

    let today = Utc::now().date_naive();
    let day = |offset: i64, count: u64| {
        json!({
            "contributionCount": count,
            "date": (today - Duration::days(offset)).format("%Y-%m-%d").to_string(),
        })
    };

    // The two oldest days fall outside the trailing window; offset 365 is
    // the first date before it
    Json(json!({
        "data": { "user": { "contributionsCollection": { "contributionCalendar": {
            "totalContributions": 25,
            "weeks": [
                { "contributionDays": [day(400, 9), day(365, 7), day(2, 0)] },
                { "contributionDays": [day(1, 4), day(0, 5)] }
            ]
        }}}}
    }))
    .into_response()
}

/// Start the mock upstream on an ephemeral port. Returns its base URL.
#[allow(dead_code)]
pub async fn spawn_upstream() -> (String, Arc<MockUpstream>) {
    let mock = Arc::new(MockUpstream::default());
    let router = Router::new()
        .route("/api/v4/users/{username}/events", get(gitlab_events))
        .route("/graphql", post(github_graphql))
        .with_state(mock.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock upstream");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{}", addr), mock)
}

/// Config pointing both upstreams at the mock.
#[allow(dead_code)]
pub fn test_config(base_url: &str) -> Config {
    Config {
        github_graphql_url: format!("{}/graphql", base_url),
        gitlab_api_url: format!("{}/api/v4", base_url),
        ..Config::test_default()
    }
}

#[allow(dead_code)]
pub fn github_client(base_url: &str) -> GithubClient {
    GithubClient::new(reqwest::Client::new(), format!("{}/graphql", base_url))
}

#[allow(dead_code)]
pub fn gitlab_client(base_url: &str) -> GitlabClient {
    GitlabClient::new(reqwest::Client::new(), format!("{}/api/v4", base_url))
}

/// Create a test app backed by the mock upstream.
/// Returns the router, the shared state and the mock.
#[allow(dead_code)]
pub async fn create_test_app() -> (axum::Router, Arc<AppState>, Arc<MockUpstream>) {
    let (base_url, mock) = spawn_upstream().await;
    let config = test_config(&base_url);
    let contributions =
        ContributionService::from_config(&config).expect("Failed to build HTTP client");

    let state = Arc::new(AppState {
        config,
        contributions,
    });

    (create_router(state.clone()), state, mock)
}
