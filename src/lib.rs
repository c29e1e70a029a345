// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Git Contributions: one calendar for GitHub and GitLab activity
//!
//! This crate provides the backend API for decoding shareable session
//! segments, fetching contribution counts from both platforms and building
//! the calendar view the browser renders.

pub mod codec;
pub mod config;
pub mod controller;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::ContributionService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub contributions: ContributionService,
}
