// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-day contribution counts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Number of contributions an account made on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ContributionDay {
    /// Calendar date (ISO 8601, `YYYY-MM-DD`)
    pub date: NaiveDate,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub count: u64,
}

impl ContributionDay {
    pub fn new(date: NaiveDate, count: u64) -> Self {
        Self { date, count }
    }
}

/// Emit a date → count map as a date-sorted day list.
pub fn days_from_map(map: BTreeMap<NaiveDate, u64>) -> Vec<ContributionDay> {
    map.into_iter()
        .map(|(date, count)| ContributionDay { date, count })
        .collect()
}
