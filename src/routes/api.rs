// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for the contributions view.
//!
//! Every request carries its whole session in the path; nothing is stored
//! between requests.

use crate::codec;
use crate::controller::calendar::{account_calendar, combined_calendar, CalendarView};
use crate::controller::share::{share_link, ShareLink};
use crate::controller::{Action, Controls, Edit, Effect, Phase, Store};
use crate::error::Result;
use crate::models::{Platform, Profile};
use crate::time_utils::trailing_window;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/contributions", get(get_empty_session))
        .route("/api/contributions/{state}", get(get_session))
        .route("/api/contributions/actions", post(apply_to_empty_session))
        .route("/api/contributions/{state}/actions", post(apply_to_session))
        .route("/api/share/{state}", get(get_share))
}

// ─── Contributions View ──────────────────────────────────────

/// One tracked account as shown to the browser. Tokens never leave the
/// state segment.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AccountView {
    pub platform: Platform,
    pub username: String,
    pub has_token: bool,
    pub calendar: CalendarView,
}

/// Full view of a session.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ContributionsResponse {
    /// Canonical browser path of the session
    pub path: String,
    pub profile: Profile,
    pub controls: Controls,
    pub phase: Phase,
    pub accounts: Vec<AccountView>,
    pub combined: CalendarView,
    /// Transient error notices, one per account that could not be fetched
    pub notifications: Vec<String>,
}

impl ContributionsResponse {
    fn from_store(store: &Store) -> Self {
        let state = store.state();
        let session = store.session();
        let window = trailing_window(chrono::Utc::now());

        let accounts = session
            .accounts
            .iter()
            .map(|account| AccountView {
                platform: account.platform,
                username: account.username.clone(),
                has_token: account.token.is_some(),
                calendar: account_calendar(account, state.days_for(&account.key()), window),
            })
            .collect();

        Self {
            path: state.path(),
            profile: session.profile.clone(),
            controls: store.controls(),
            phase: state.phase,
            accounts,
            combined: combined_calendar(&session.accounts, &state.contributions, window),
            notifications: state.notifications.clone(),
        }
    }
}

async fn get_empty_session(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ContributionsResponse>> {
    load_session(&state, None).await
}

async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(segment): Path<String>,
) -> Result<Json<ContributionsResponse>> {
    load_session(&state, Some(&segment)).await
}

/// Navigate to a segment and run the fetch it requests.
async fn load_session(
    state: &AppState,
    segment: Option<&str>,
) -> Result<Json<ContributionsResponse>> {
    let (mut store, effects) = Store::navigate(segment);

    for effect in effects {
        if let Effect::FetchContributions(accounts) = effect {
            let results = state.contributions.fetch_all(&accounts).await;
            store.dispatch(Action::FetchCompleted { results })?;
        }
    }

    Ok(Json(ContributionsResponse::from_store(&store)))
}

// ─── Session Edits ───────────────────────────────────────────

/// New state after an edit. The browser replaces its URL with `path`.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EditResponse {
    pub state: String,
    pub path: String,
    pub controls: Controls,
}

async fn apply_to_empty_session(Json(edit): Json<Edit>) -> Result<Json<EditResponse>> {
    apply_edit(None, edit)
}

async fn apply_to_session(
    Path(segment): Path<String>,
    Json(edit): Json<Edit>,
) -> Result<Json<EditResponse>> {
    apply_edit(Some(&segment), edit)
}

fn apply_edit(segment: Option<&str>, edit: Edit) -> Result<Json<EditResponse>> {
    let mut store = Store::with_session(codec::parse_path_segment(segment));

    tracing::debug!(edit = edit_name(&edit), "Applying session edit");

    // Fetches are left to the browser, which loads the new path next.
    let effects = store.dispatch(Action::Edit(edit))?;
    let path = effects
        .into_iter()
        .find_map(|effect| match effect {
            Effect::ReplaceUrl(path) => Some(path),
            Effect::FetchContributions(_) => None,
        })
        .unwrap_or_else(|| store.state().path());

    Ok(Json(EditResponse {
        state: codec::encode_session(store.session()),
        path,
        controls: store.controls(),
    }))
}

fn edit_name(edit: &Edit) -> &'static str {
    match edit {
        Edit::AddAccount { .. } => "add_account",
        Edit::RemoveAccount { .. } => "remove_account",
        Edit::SetFirstName { .. } => "set_first_name",
        Edit::SetLastName { .. } => "set_last_name",
    }
}

// ─── Sharing ─────────────────────────────────────────────────

/// Read-only link for any segment. An empty session still shares: the
/// link simply opens an empty read-only view.
async fn get_share(
    State(state): State<Arc<AppState>>,
    Path(segment): Path<String>,
) -> Json<ShareLink> {
    let session = codec::decode(&segment);
    Json(share_link(&session, &state.config.public_base_url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, Session};

    #[test]
    fn test_apply_edit_returns_decodable_state() {
        let Json(response) = apply_edit(
            None,
            Edit::AddAccount {
                platform: Platform::Github,
                username: "alice".to_string(),
                token: None,
            },
        )
        .unwrap();

        let session = codec::decode(&response.state);
        assert_eq!(session.accounts[0].username, "alice");
        assert_eq!(response.path, format!("/contributions/{}", response.state));
    }

    #[test]
    fn test_duplicate_add_keeps_path() {
        let session = Session::new(
            vec![Account::new(Platform::Github, "alice", None)],
            Profile::default(),
        );
        let segment = codec::encode_session(&session);

        let Json(response) = apply_edit(
            Some(&segment),
            Edit::AddAccount {
                platform: Platform::Github,
                username: "alice".to_string(),
                token: None,
            },
        )
        .unwrap();

        assert_eq!(response.state, segment);
    }
}
