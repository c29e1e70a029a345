// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! View controller: session state and its update cycle.
//!
//! All state lives in a [`ViewState`] owned by a [`Store`]. Actions go in
//! through [`Store::dispatch`], which mutates the state and returns the
//! effects the caller must run (replace the URL, fetch contributions).
//! Fetch results come back in as another action.

pub mod calendar;
pub mod share;

use crate::codec;
use crate::error::{AppError, Result};
use crate::models::{Account, AccountKey, ContributionDay, Platform, Session};
use crate::services::AccountContributions;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Data freshness of the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Fetch in flight; the calendar shows a placeholder.
    Loading,
    /// Counts are rendered.
    Ready,
}

/// Edits a user can make to a session.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Edit {
    AddAccount {
        platform: Platform,
        username: String,
        #[serde(default)]
        token: Option<String>,
    },
    RemoveAccount {
        index: usize,
    },
    SetFirstName {
        value: String,
    },
    SetLastName {
        value: String,
    },
}

impl Edit {
    fn changes_accounts(&self) -> bool {
        matches!(self, Edit::AddAccount { .. } | Edit::RemoveAccount { .. })
    }
}

/// Everything that can happen to the store.
#[derive(Debug, Clone)]
pub enum Action {
    /// The URL changed (page load or navigation).
    Navigate { segment: Option<String> },
    Edit(Edit),
    /// A fetch batch settled.
    FetchCompleted { results: Vec<AccountContributions> },
    DismissNotifications,
}

/// Side effects requested by the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Replace the current URL without adding a history entry.
    ReplaceUrl(String),
    /// Fetch contributions for these accounts.
    FetchContributions(Vec<Account>),
}

/// Which mutation controls are live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Controls {
    pub can_add_account: bool,
    pub can_remove_account: bool,
    /// When false the name fields render as static text.
    pub name_fields_editable: bool,
}

impl Controls {
    pub fn for_session(session: &Session) -> Self {
        let editable = !session.is_readonly();
        Self {
            can_add_account: editable,
            can_remove_account: editable && !session.accounts.is_empty(),
            name_fields_editable: editable,
        }
    }
}

/// Transient UI state.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub session: Session,
    pub phase: Phase,
    pub contributions: HashMap<AccountKey, Vec<ContributionDay>>,
    pub notifications: Vec<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            session: Session::default(),
            phase: Phase::Ready,
            contributions: HashMap::new(),
            notifications: Vec::new(),
        }
    }
}

impl ViewState {
    /// Browser path for the current session.
    pub fn path(&self) -> String {
        codec::state_path(&self.session.accounts, &self.session.profile)
    }

    /// Series for one account, empty if nothing has arrived yet.
    pub fn days_for(&self, key: &AccountKey) -> &[ContributionDay] {
        self.contributions
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Owner of the view state.
#[derive(Debug, Clone, Default)]
pub struct Store {
    state: ViewState,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store for an already decoded session, with nothing loaded.
    pub fn with_session(session: Session) -> Self {
        Self {
            state: ViewState {
                session,
                ..ViewState::default()
            },
        }
    }

    /// Store for a URL segment, plus the effects of navigating to it.
    pub fn navigate(segment: Option<&str>) -> (Self, Vec<Effect>) {
        let mut store = Self::new();
        let effects = store.apply_navigate(segment);
        (store, effects)
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn session(&self) -> &Session {
        &self.state.session
    }

    pub fn controls(&self) -> Controls {
        Controls::for_session(&self.state.session)
    }

    /// Apply an action and return the effects to run.
    pub fn dispatch(&mut self, action: Action) -> Result<Vec<Effect>> {
        match action {
            Action::Navigate { segment } => Ok(self.apply_navigate(segment.as_deref())),
            Action::Edit(edit) => self.apply_edit(edit),
            Action::FetchCompleted { results } => {
                self.apply_results(results);
                Ok(Vec::new())
            }
            Action::DismissNotifications => {
                self.state.notifications.clear();
                Ok(Vec::new())
            }
        }
    }

    fn apply_navigate(&mut self, segment: Option<&str>) -> Vec<Effect> {
        self.state.session = codec::parse_path_segment(segment);
        self.state.notifications.clear();

        tracing::debug!(
            accounts = self.state.session.accounts.len(),
            readonly = self.state.session.is_readonly(),
            "Session decoded"
        );

        self.start_fetch().into_iter().collect()
    }

    fn apply_edit(&mut self, edit: Edit) -> Result<Vec<Effect>> {
        if self.state.session.is_readonly() {
            return Err(AppError::ReadOnly);
        }

        let refetch = edit.changes_accounts();
        let session = &mut self.state.session;

        match edit {
            Edit::AddAccount {
                platform,
                username,
                token,
            } => {
                let username = username.trim();
                if username.is_empty() {
                    return Err(AppError::BadRequest("Username is required".to_string()));
                }

                let account = Account::new(platform, username, token.map(|t| t.trim().to_string()));
                if session.accounts.iter().any(|a| a.key() == account.key()) {
                    return Ok(Vec::new());
                }
                session.accounts.push(account);
            }
            Edit::RemoveAccount { index } => {
                if index >= session.accounts.len() {
                    return Err(AppError::BadRequest(format!(
                        "No account at index {}",
                        index
                    )));
                }
                session.accounts.remove(index);
            }
            Edit::SetFirstName { value } => session.profile.first_name = value,
            Edit::SetLastName { value } => session.profile.last_name = value,
        }

        let mut effects = vec![Effect::ReplaceUrl(self.state.path())];
        if refetch {
            effects.extend(self.start_fetch());
        }
        Ok(effects)
    }

    /// Enter `Loading` and request a fetch, or go straight to `Ready` when
    /// there is nothing to fetch.
    fn start_fetch(&mut self) -> Option<Effect> {
        if self.state.session.accounts.is_empty() {
            self.state.contributions.clear();
            self.state.phase = Phase::Ready;
            return None;
        }

        self.state.phase = Phase::Loading;
        Some(Effect::FetchContributions(
            self.state.session.accounts.clone(),
        ))
    }

    /// Last write wins: a settled batch replaces whatever was shown before.
    fn apply_results(&mut self, results: Vec<AccountContributions>) {
        let mut contributions = HashMap::with_capacity(results.len());
        for result in results {
            if result.failed() {
                self.state
                    .notifications
                    .push(format!("Unable to retrieve contributions for {}", result.key));
            }
            contributions.insert(result.key, result.days);
        }

        self.state.contributions = contributions;
        self.state.phase = Phase::Ready;
    }
}
