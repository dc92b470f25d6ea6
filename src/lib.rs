// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity Recap: a yearly Strava summary published to GitHub
//!
//! This crate fetches a year of Strava activities, aggregates them into
//! summary statistics, renders a Markdown report, and commits it to a
//! repository as a GitHub App installation.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod units;

pub use config::Config;
pub use error::{AppError, Result};
