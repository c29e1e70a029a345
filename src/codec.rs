// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shareable state segment codec.
//!
//! A session is written as a JSON record, percent-encoded and then base64
//! encoded with the URL-safe alphabet, so the segment never contains `,`,
//! `/`, `+` or `=`.
//!
//! Older links used a flat format instead: each account was base64 of
//! `platform:username:firstName:lastName:token:readonly` and accounts were
//! joined with `,`. Decoding accepts both. Anything else decodes to an empty
//! session.

use crate::models::{Account, Platform, Profile, Session};
use base64::{
    engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD},
    Engine as _,
};
use serde::{Deserialize, Serialize};

/// Path prefix of the browser route that carries a state segment.
pub const CONTRIBUTIONS_PATH: &str = "/contributions";

/// Serialize accounts and profile into a URL-safe state segment.
pub fn encode(accounts: &[Account], profile: &Profile) -> String {
    let record = StateRecord {
        profile: ProfileRecord::from(profile),
        accounts: accounts.iter().map(AccountRecord::from).collect(),
    };

    // Serializing plain strings and bools cannot fail.
    let json = serde_json::to_string(&record).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(urlencoding::encode(&json).as_bytes())
}

/// Serialize a whole session.
pub fn encode_session(session: &Session) -> String {
    encode(&session.accounts, &session.profile)
}

/// Parse a state segment. Never fails: malformed input is an empty session.
pub fn decode(segment: &str) -> Session {
    match EncodedState::parse(segment) {
        Some(state) => state.into_session(),
        None => {
            tracing::debug!(len = segment.len(), "Unrecognized state segment");
            Session::default()
        }
    }
}

/// Browser path (`/contributions/<segment>`) for a session.
pub fn state_path(accounts: &[Account], profile: &Profile) -> String {
    format!("{}/{}", CONTRIBUTIONS_PATH, encode(accounts, profile))
}

/// Decode an optional path segment; absent or blank means a fresh editable session.
pub fn parse_path_segment(segment: Option<&str>) -> Session {
    match segment.map(str::trim) {
        Some(s) if !s.is_empty() => decode(s),
        _ => Session::default(),
    }
}

// ─── Wire records ────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct StateRecord {
    #[serde(default)]
    profile: ProfileRecord,
    #[serde(default)]
    accounts: Vec<AccountRecord>,
}

/// Profile as written into segments; field names are fixed by links
/// already in circulation.
#[derive(Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileRecord {
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    readonly: bool,
}

impl From<&Profile> for ProfileRecord {
    fn from(profile: &Profile) -> Self {
        Self {
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            readonly: profile.readonly,
        }
    }
}

impl From<ProfileRecord> for Profile {
    fn from(record: ProfileRecord) -> Self {
        Self {
            first_name: record.first_name,
            last_name: record.last_name,
            readonly: record.readonly,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct AccountRecord {
    platform: Platform,
    username: String,
    #[serde(default)]
    token: String,
}

impl From<&Account> for AccountRecord {
    fn from(account: &Account) -> Self {
        Self {
            platform: account.platform,
            username: account.username.clone(),
            token: account.token.clone().unwrap_or_default(),
        }
    }
}

/// One account of the legacy flat format.
#[derive(Debug, PartialEq)]
struct LegacyRecord {
    platform: Platform,
    username: String,
    first_name: String,
    last_name: String,
    token: Option<String>,
    readonly: bool,
}

impl LegacyRecord {
    fn parse(text: &str) -> Option<Self> {
        let fields: Vec<&str> = text.split(':').collect();
        let platform = Platform::from_name(fields.first()?)?;
        let username = fields.get(1).filter(|u| !u.is_empty())?.to_string();
        let field = |i: usize| fields.get(i).copied().unwrap_or_default().to_string();

        // The old encoder dropped the token field entirely when there was no
        // token, leaving the readonly flag in the token slot.
        let (token, readonly) = match &fields[fields.len().min(4)..] {
            [flag] if *flag == "true" || *flag == "false" => (None, *flag == "true"),
            rest => (
                rest.first().filter(|t| !t.is_empty()).map(|t| t.to_string()),
                rest.get(1) == Some(&"true"),
            ),
        };

        Some(Self {
            platform,
            username,
            first_name: field(2),
            last_name: field(3),
            token,
            readonly,
        })
    }
}

/// The two accepted segment layouts.
enum EncodedState {
    Structured(StateRecord),
    Legacy(Vec<LegacyRecord>),
}

impl EncodedState {
    fn parse(segment: &str) -> Option<Self> {
        let segment = segment.trim();
        parse_structured(segment)
            .map(EncodedState::Structured)
            .or_else(|| parse_legacy(segment).map(EncodedState::Legacy))
    }

    fn into_session(self) -> Session {
        match self {
            EncodedState::Structured(record) => Session {
                accounts: record
                    .accounts
                    .into_iter()
                    .map(|a| Account::new(a.platform, a.username, Some(a.token)))
                    .collect(),
                profile: record.profile.into(),
            },
            EncodedState::Legacy(records) => {
                // Profile comes from the first record
                let profile = records
                    .first()
                    .map(|r| Profile {
                        first_name: r.first_name.clone(),
                        last_name: r.last_name.clone(),
                        readonly: r.readonly,
                    })
                    .unwrap_or_default();

                Session {
                    accounts: records
                        .into_iter()
                        .map(|r| Account::new(r.platform, r.username, r.token))
                        .collect(),
                    profile,
                }
            }
        }
    }
}

fn parse_structured(segment: &str) -> Option<StateRecord> {
    let bytes = decode_base64(segment)?;
    let text = String::from_utf8(bytes).ok()?;
    let json = urlencoding::decode(&text).ok()?;
    let record: StateRecord = serde_json::from_str(&json).ok()?;

    if record.accounts.iter().any(|a| a.username.trim().is_empty()) {
        return None;
    }
    Some(record)
}

fn parse_legacy(segment: &str) -> Option<Vec<LegacyRecord>> {
    segment
        .split(',')
        .map(|piece| LegacyRecord::parse(&legacy_text(decode_base64(piece)?)))
        .collect()
}

/// Legacy records were written one byte per character (Latin-1), so a name
/// like "Zoë" is not valid UTF-8. Newer writers may have used UTF-8.
fn legacy_text(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes)
        .unwrap_or_else(|e| e.into_bytes().iter().map(|&b| char::from(b)).collect())
}

/// Base64 with either alphabet, padding optional.
fn decode_base64(input: &str) -> Option<Vec<u8>> {
    let trimmed = input.trim().trim_end_matches('=');
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.contains(['+', '/']) {
        STANDARD_NO_PAD.decode(trimmed).ok()
    } else {
        URL_SAFE_NO_PAD.decode(trimmed).ok()
    }
}
