// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod account;
pub mod contribution;
pub mod session;

pub use account::{Account, AccountKey, Platform, Profile};
pub use contribution::ContributionDay;
pub use session::Session;
