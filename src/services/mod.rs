// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - upstream platform clients.

pub mod contributions;
pub mod github;
pub mod gitlab;

pub use contributions::{AccountContributions, ContributionService};
pub use github::GithubClient;
pub use gitlab::GitlabClient;
