// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Aggregated statistics for one recap year.
//!
//! Built once by `services::stats::compute_stats` and never mutated
//! afterwards. Distances are miles rounded to one decimal, times are whole
//! minutes and elevation is whole feet.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::RecapProfile;

/// Immutable snapshot of a year's activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedStats {
    pub year: i32,
    pub profile: RecapProfile,
    pub totals: Totals,
    /// Ordered by descending count, first-seen category first on ties
    pub categories: Vec<CategoryBreakdown>,
    pub highlights: Highlights,
    /// Present only for profiles that carry consistency highlights
    pub consistency: Option<ConsistencyStats>,
}

/// Rounded totals over a set of activities.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Totals {
    pub count: u32,
    pub distance_miles: f64,
    pub moving_minutes: u64,
    pub elevation_feet: u64,
}

/// Totals for a single category label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub category: String,
    pub totals: Totals,
    /// Average pace or speed, per the category's display mode
    pub average_effort: Option<String>,
    /// Longest activity by distance within the category
    pub longest: Option<ActivityHighlight>,
}

/// Base highlights, each absent for an empty year.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Highlights {
    pub longest_by_distance: Option<ActivityHighlight>,
    pub longest_by_time: Option<ActivityHighlight>,
    pub busiest_day: Option<BusiestDay>,
    pub most_frequent_category: Option<CategoryCount>,
}

/// A single activity called out in the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityHighlight {
    pub id: u64,
    pub name: String,
    pub category: String,
    /// Local calendar date
    pub date: NaiveDate,
    pub distance_miles: f64,
    pub moving_seconds: u64,
    pub effort: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusiestDay {
    pub date: NaiveDate,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: u32,
}

/// Running-only highlights.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConsistencyStats {
    /// 5K time estimated from the activity's average pace
    pub fastest_5k: Option<PaceHighlight>,
    /// Fastest average pace among runs of at least three miles
    pub fastest_pace: Option<PaceHighlight>,
    pub longest_streak: Option<Streak>,
    /// `value` counts days from Sunday (Sunday = 0)
    pub most_common_weekday: Option<HabitCount>,
    /// `value` is the local start hour, 0-23
    pub most_common_hour: Option<HabitCount>,
}

/// An activity plus the derived time that made it notable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaceHighlight {
    pub activity: ActivityHighlight,
    /// Estimated 5K seconds, or seconds per mile for pace highlights
    pub seconds: f64,
}

/// Consecutive local calendar days with at least one activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Streak {
    pub days: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Mode of a small integer-valued attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitCount {
    pub value: u32,
    pub count: u32,
}

impl HabitCount {
    pub fn weekday_name(&self) -> &'static str {
        const NAMES: [&str; 7] = [
            "Sunday",
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
        ];
        NAMES.get(self.value as usize).copied().unwrap_or("Unknown")
    }
}

impl AggregatedStats {
    pub fn is_empty(&self) -> bool {
        self.totals.count == 0
    }
}
