// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.
//!
//! Every variant is fatal for a run; the only automatic recovery is the
//! single refresh-and-retry on a Strava 401 inside the API client.

use crate::config::ConfigError;

/// Application error type surfaced to `main`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Strava API error: {0}")]
    StravaApi(String),

    #[error("GitHub App authentication error: {0}")]
    Auth(String),

    #[error("Publish error: {0}")]
    Publish(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Message used when Strava rejects the bearer token (HTTP 401).
    pub const STRAVA_TOKEN_ERROR: &'static str = "Invalid or expired Strava access token";

    /// Message used when Strava throttles the client (HTTP 429).
    pub const STRAVA_RATE_LIMIT: &'static str = "Strava rate limit exceeded";

    /// Whether this error is Strava rejecting the bearer token (HTTP 401).
    pub fn is_strava_token_error(&self) -> bool {
        matches!(self, AppError::StravaApi(msg) if msg == Self::STRAVA_TOKEN_ERROR)
    }

    /// Whether this error is a Strava rate limit rejection.
    pub fn is_strava_rate_limit(&self) -> bool {
        matches!(self, AppError::StravaApi(msg) if msg == Self::STRAVA_RATE_LIMIT)
    }
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;
