// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recap profiles: which activities count and which highlights are shown.

use crate::models::ActivityRecord;
use serde::Serialize;

/// Selects the category filter and highlight set for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecapProfile {
    /// Every activity type, base highlights only.
    AllActivities,
    /// Runs only, base highlights plus consistency highlights.
    RunningOnly,
}

impl RecapProfile {
    pub fn from_running_only(running_only: bool) -> Self {
        if running_only {
            RecapProfile::RunningOnly
        } else {
            RecapProfile::AllActivities
        }
    }

    /// Category filter applied to fetched records.
    pub fn includes(self, record: &ActivityRecord) -> bool {
        record.is_valid()
            && match self {
                RecapProfile::AllActivities => true,
                RecapProfile::RunningOnly => record.is_run(),
            }
    }

    /// Whether consistency highlights (streaks, paces, habits) are computed.
    pub fn has_consistency_stats(self) -> bool {
        matches!(self, RecapProfile::RunningOnly)
    }

    /// Repository path of the rendered recap.
    pub fn output_path(self, year: i32) -> String {
        match self {
            RecapProfile::AllActivities => format!("recaps/{}.md", year),
            RecapProfile::RunningOnly => format!("recaps/{}-running.md", year),
        }
    }

    pub fn commit_message(self, year: i32) -> String {
        format!("Update {} {} recap", year, self.noun())
    }

    pub fn title(self, year: i32) -> String {
        match self {
            RecapProfile::AllActivities => format!("{} Activity Recap", year),
            RecapProfile::RunningOnly => format!("{} Running Recap", year),
        }
    }

    /// Singular noun for the counted records.
    pub fn noun(self) -> &'static str {
        match self {
            RecapProfile::AllActivities => "activity",
            RecapProfile::RunningOnly => "running",
        }
    }
}
