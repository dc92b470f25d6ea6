// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Unit conversions and display formatting.
//!
//! Strava reports meters, seconds and meters per second; the recap is
//! written in miles, feet and minutes.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub const METERS_PER_MILE: f64 = 1609.344;
pub const FEET_PER_METER: f64 = 3.28084;
pub const METERS_PER_5K: f64 = 5000.0;

pub fn meters_to_miles(meters: f64) -> f64 {
    meters / METERS_PER_MILE
}

pub fn meters_to_feet(meters: f64) -> f64 {
    meters * FEET_PER_METER
}

pub fn seconds_to_minutes(seconds: f64) -> f64 {
    seconds / 60.0
}

pub fn mps_to_mph(meters_per_second: f64) -> f64 {
    meters_per_second * 3600.0 / METERS_PER_MILE
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Pace in seconds per mile, `None` for zero distance.
pub fn pace_seconds_per_mile(distance_meters: f64, moving_seconds: f64) -> Option<f64> {
    let miles = meters_to_miles(distance_meters);
    (miles > 0.0).then(|| moving_seconds / miles)
}

/// Average speed in miles per hour, `None` for zero moving time.
pub fn speed_mph(distance_meters: f64, moving_seconds: f64) -> Option<f64> {
    (moving_seconds > 0.0).then(|| mps_to_mph(distance_meters / moving_seconds))
}

/// How a category's effort is best presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// minutes:seconds per mile
    Pace,
    /// miles per hour
    Speed,
}

impl DisplayMode {
    /// Foot-powered categories read as pace; everything else as speed.
    pub fn for_category(category: &str) -> Self {
        let lower = category.to_ascii_lowercase();
        if ["run", "walk", "hike"].iter().any(|k| lower.contains(k)) {
            DisplayMode::Pace
        } else {
            DisplayMode::Speed
        }
    }

    /// Format the effort of `distance_meters` covered in `moving_seconds`.
    pub fn format_effort(self, distance_meters: f64, moving_seconds: f64) -> Option<String> {
        match self {
            DisplayMode::Pace => {
                pace_seconds_per_mile(distance_meters, moving_seconds).map(format_pace)
            }
            DisplayMode::Speed => speed_mph(distance_meters, moving_seconds).map(format_speed),
        }
    }
}

/// Format a pace such as `8:05 /mi`.
pub fn format_pace(seconds_per_mile: f64) -> String {
    let total = seconds_per_mile.round() as i64;
    format!("{}:{:02} /mi", total / 60, total % 60)
}

/// Format a speed such as `15.3 mph`.
pub fn format_speed(mph: f64) -> String {
    format!("{:.1} mph", mph)
}

/// Format a duration as `1h 05m` or `27m 30s`.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.round() as i64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    if hours > 0 {
        format!("{}h {:02}m", hours, minutes)
    } else {
        format!("{}m {:02}s", minutes, total % 60)
    }
}

/// Format a whole number with thousands separators.
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a calendar date as `Mar 9, 2024`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Serde helper for Strava's `start_date_local`.
///
/// Strava serialises the athlete's wall-clock time with a `Z` suffix even
/// though it is not UTC, so the offset is discarded.
pub mod local_datetime {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_local(&raw).map_err(serde::de::Error::custom)
    }

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format("%Y-%m-%dT%H:%M:%SZ").to_string())
    }
}

/// Parse a wall-clock timestamp, ignoring any offset suffix.
pub fn parse_local(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Ok(dt.naive_local()),
        Err(_) => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"),
    }
}
