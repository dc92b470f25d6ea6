// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod profile;
pub mod stats;

pub use activity::ActivityRecord;
pub use profile::RecapProfile;
pub use stats::{
    ActivityHighlight, AggregatedStats, BusiestDay, CategoryBreakdown, CategoryCount,
    ConsistencyStats, HabitCount, Highlights, PaceHighlight, Streak, Totals,
};
