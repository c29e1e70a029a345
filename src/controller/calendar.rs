// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calendar view model: color classes, palettes and merged series.
//!
//! The combined calendar does not remember which account a day came from.
//! [`owner_of`] re-derives it by scanning accounts in order for an identical
//! `(date, count)` pair, so when two accounts share the same pair the first
//! account wins.

use crate::models::{Account, AccountKey, ContributionDay, Platform};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Intensity bucket for a day's count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ColorClass {
    #[serde(rename = "color-empty")]
    Empty,
    #[serde(rename = "color-scale-1")]
    Scale1,
    #[serde(rename = "color-scale-2")]
    Scale2,
    #[serde(rename = "color-scale-3")]
    Scale3,
    #[serde(rename = "color-scale-4")]
    Scale4,
}

impl ColorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorClass::Empty => "color-empty",
            ColorClass::Scale1 => "color-scale-1",
            ColorClass::Scale2 => "color-scale-2",
            ColorClass::Scale3 => "color-scale-3",
            ColorClass::Scale4 => "color-scale-4",
        }
    }
}

/// Bucket a count: 0, 1-2, 3-5, 6-10, more.
pub fn color_class(count: u64) -> ColorClass {
    match count {
        0 => ColorClass::Empty,
        1..=2 => ColorClass::Scale1,
        3..=5 => ColorClass::Scale2,
        6..=10 => ColorClass::Scale3,
        _ => ColorClass::Scale4,
    }
}

/// Fill colors for one calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Palette {
    pub empty: &'static str,
    pub scale: [&'static str; 4],
}

const EMPTY_FILL: &str = "#ebedf0";

pub const COMBINED_PALETTE: Palette = Palette {
    empty: EMPTY_FILL,
    scale: ["#cce4ff", "#99c9ff", "#66adff", "#3392ff"],
};

pub const GITHUB_PALETTE: Palette = Palette {
    empty: EMPTY_FILL,
    scale: ["#dddddd", "#aaaaaa", "#666666", "#333333"],
};

pub const GITLAB_PALETTE: Palette = Palette {
    empty: EMPTY_FILL,
    scale: ["#ffead7", "#ffc591", "#ff9d4d", "#ff7400"],
};

impl Palette {
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Github => GITHUB_PALETTE,
            Platform::Gitlab => GITLAB_PALETTE,
        }
    }

    pub fn fill(&self, class: ColorClass) -> &'static str {
        match class {
            ColorClass::Empty => self.empty,
            ColorClass::Scale1 => self.scale[0],
            ColorClass::Scale2 => self.scale[1],
            ColorClass::Scale3 => self.scale[2],
            ColorClass::Scale4 => self.scale[3],
        }
    }
}

/// One rendered day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CalendarCell {
    pub date: NaiveDate,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub count: u64,
    pub class: ColorClass,
    pub fill: &'static str,
    pub title: String,
    pub owner: Option<AccountKey>,
}

/// A heatmap over the trailing window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CalendarView {
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total: u64,
    pub palette: Palette,
    pub cells: Vec<CalendarCell>,
}

fn title_for(day: &ContributionDay) -> String {
    if day.count == 0 {
        "No contributions".to_string()
    } else {
        format!("{} contributions on {}", day.count, day.date)
    }
}

fn in_window(day: &ContributionDay, (start, end): (NaiveDate, NaiveDate)) -> bool {
    day.date >= start && day.date <= end
}

/// Every account's days, concatenated in account order. Dates repeat once
/// per account that has them.
pub fn combined_series(
    accounts: &[Account],
    contributions: &HashMap<AccountKey, Vec<ContributionDay>>,
) -> Vec<ContributionDay> {
    accounts
        .iter()
        .filter_map(|a| contributions.get(&a.key()))
        .flatten()
        .copied()
        .collect()
}

/// First account whose series holds exactly this `(date, count)` pair.
pub fn owner_of<'a>(
    accounts: &'a [Account],
    contributions: &HashMap<AccountKey, Vec<ContributionDay>>,
    day: &ContributionDay,
) -> Option<&'a Account> {
    accounts.iter().find(|a| {
        contributions
            .get(&a.key())
            .is_some_and(|days| days.iter().any(|d| d == day))
    })
}

/// Calendar of a single account, colored with its platform palette.
pub fn account_calendar(
    account: &Account,
    days: &[ContributionDay],
    window: (NaiveDate, NaiveDate),
) -> CalendarView {
    let palette = Palette::for_platform(account.platform);
    let key = account.key();

    let cells: Vec<CalendarCell> = days
        .iter()
        .filter(|d| in_window(d, window))
        .map(|day| {
            let class = color_class(day.count);
            CalendarCell {
                date: day.date,
                count: day.count,
                class,
                fill: palette.fill(class),
                title: title_for(day),
                owner: Some(key.clone()),
            }
        })
        .collect();

    CalendarView {
        start: window.0,
        end: window.1,
        total: cells.iter().map(|c| c.count).sum(),
        palette,
        cells,
    }
}

/// Calendar of all accounts together. Each cell is tinted with the palette
/// of the account [`owner_of`] attributes it to.
pub fn combined_calendar(
    accounts: &[Account],
    contributions: &HashMap<AccountKey, Vec<ContributionDay>>,
    window: (NaiveDate, NaiveDate),
) -> CalendarView {
    let cells: Vec<CalendarCell> = combined_series(accounts, contributions)
        .iter()
        .filter(|d| in_window(d, window))
        .map(|day| {
            let class = color_class(day.count);
            let owner = owner_of(accounts, contributions, day);
            let palette = owner
                .map(|a| Palette::for_platform(a.platform))
                .unwrap_or(COMBINED_PALETTE);

            CalendarCell {
                date: day.date,
                count: day.count,
                class,
                fill: palette.fill(class),
                title: title_for(day),
                owner: owner.map(Account::key),
            }
        })
        .collect();

    CalendarView {
        start: window.0,
        end: window.1,
        total: cells.iter().map(|c| c.count).sum(),
        palette: COMBINED_PALETTE,
        cells,
    }
}
