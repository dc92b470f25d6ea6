// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava activity record as returned by the athlete activities endpoint.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary activity fetched from Strava. Read-only once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Strava activity ID
    pub id: u64,
    /// Activity name/title
    pub name: String,
    /// Legacy activity type (Ride, Run, Hike, etc.)
    #[serde(rename = "type", default)]
    pub activity_type: String,
    /// Sport type, finer grained than `type` (TrailRun, GravelRide, etc.)
    #[serde(default)]
    pub sport_type: String,
    /// Start time in UTC
    pub start_date: DateTime<Utc>,
    /// Start time on the athlete's wall clock
    #[serde(with = "crate::units::local_datetime")]
    pub start_date_local: NaiveDateTime,
    /// Distance in meters
    #[serde(default)]
    pub distance: f64,
    /// Moving time in seconds
    #[serde(default)]
    pub moving_time: u64,
    /// Elapsed time in seconds
    #[serde(default)]
    pub elapsed_time: u64,
    /// Elevation gain in meters
    #[serde(default)]
    pub total_elevation_gain: f64,
    /// Average speed in m/s
    #[serde(default)]
    pub average_speed: f64,
    /// Max speed in m/s
    #[serde(default)]
    pub max_speed: f64,
}

impl ActivityRecord {
    /// Category label used for grouping: sport type, falling back to type.
    pub fn category(&self) -> &str {
        if self.sport_type.is_empty() {
            &self.activity_type
        } else {
            &self.sport_type
        }
    }

    /// Records without moving time are GPS glitches or manual stubs.
    pub fn is_valid(&self) -> bool {
        self.moving_time > 0
    }

    /// Whether either classification field marks this as a run.
    pub fn is_run(&self) -> bool {
        self.activity_type == "Run" || self.sport_type.ends_with("Run")
    }

    /// Calendar date on the athlete's local clock.
    pub fn local_date(&self) -> NaiveDate {
        self.start_date_local.date()
    }

    pub fn moving_seconds(&self) -> f64 {
        self.moving_time as f64
    }
}
