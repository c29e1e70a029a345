// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The editable session: everything a state segment carries.

use crate::models::{Account, Profile};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Tracked accounts plus the profile shared by all of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Session {
    pub accounts: Vec<Account>,
    pub profile: Profile,
}

impl Session {
    pub fn new(accounts: Vec<Account>, profile: Profile) -> Self {
        Self { accounts, profile }
    }

    pub fn is_readonly(&self) -> bool {
        self.profile.readonly
    }

    /// Copy of this session with the readonly flag forced on.
    pub fn as_readonly(&self) -> Self {
        let mut copy = self.clone();
        copy.profile.readonly = true;
        copy
    }
}
