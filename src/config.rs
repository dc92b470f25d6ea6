// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Run configuration loaded from environment variables.
//!
//! A `.env` file is honoured for local runs. Publishing settings are only
//! required when the run is not a dry run.

use chrono::{Datelike, Utc};
use std::env;
use std::path::PathBuf;

const DEFAULT_STRAVA_API_URL: &str = "https://www.strava.com/api/v3";
const DEFAULT_STRAVA_OAUTH_URL: &str = "https://www.strava.com/oauth/token";
const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Configuration for a single recap run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Calendar year to summarise
    pub year: i32,
    /// Strava OAuth credentials and endpoints
    pub strava: StravaConfig,
    /// GitHub App identity and target repository (absent for dry runs)
    pub publish: Option<PublishConfig>,
    /// Restrict the recap to runs and add consistency highlights
    pub running_only: bool,
    /// Render and print instead of publishing
    pub dry_run: bool,
}

/// Strava API credentials.
#[derive(Debug, Clone)]
pub struct StravaConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Long-lived refresh token for the athlete
    pub refresh_token: String,
    /// Optional starting access token; a refresh is forced when absent
    pub access_token: Option<String>,
    pub api_url: String,
    pub oauth_url: String,
}

/// GitHub App identity and target repository.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    pub app_id: String,
    pub installation_id: u64,
    pub private_key_path: PathBuf,
    pub owner: String,
    pub repo: String,
    /// Target branch; the repository default branch when unset
    pub branch: Option<String>,
    pub api_url: String,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |name: &'static str| var(name).ok_or(ConfigError::Missing(name));

        let year = match var("RECAP_YEAR") {
            Some(value) => parse_year(&value)?,
            None => Utc::now().year(),
        };

        let strava = StravaConfig {
            client_id: required("STRAVA_CLIENT_ID")?,
            client_secret: required("STRAVA_CLIENT_SECRET")?,
            refresh_token: required("STRAVA_REFRESH_TOKEN")?,
            access_token: var("STRAVA_ACCESS_TOKEN"),
            api_url: var("STRAVA_API_URL").unwrap_or_else(|| DEFAULT_STRAVA_API_URL.to_string()),
            oauth_url: var("STRAVA_OAUTH_URL")
                .unwrap_or_else(|| DEFAULT_STRAVA_OAUTH_URL.to_string()),
        };

        // The App id gates the whole publish block; once it is set, the
        // rest of the identity must be too.
        let publish = match var("GITHUB_APP_ID") {
            None => None,
            Some(app_id) => {
                let installation_id = required("GITHUB_INSTALLATION_ID")?;
                Some(PublishConfig {
                    app_id,
                    installation_id: installation_id.parse().map_err(|_| {
                        ConfigError::Invalid {
                            name: "GITHUB_INSTALLATION_ID",
                            value: installation_id.clone(),
                        }
                    })?,
                    private_key_path: PathBuf::from(required("GITHUB_PRIVATE_KEY_PATH")?),
                    owner: required("GITHUB_OWNER")?,
                    repo: required("GITHUB_REPO")?,
                    branch: var("GITHUB_BRANCH"),
                    api_url: var("GITHUB_API_URL")
                        .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
                })
            }
        };

        Ok(Self {
            year,
            strava,
            publish,
            running_only: parse_flag("RECAP_RUNNING_ONLY", var("RECAP_RUNNING_ONLY"))?,
            dry_run: parse_flag("DRY_RUN", var("DRY_RUN"))?,
        })
    }

    /// Publishing settings, required for any run that is not a dry run.
    pub fn require_publish(&self) -> Result<&PublishConfig, ConfigError> {
        self.publish
            .as_ref()
            .ok_or(ConfigError::Missing("GITHUB_APP_ID"))
    }

    /// Override the recap year, applying the same range check as `RECAP_YEAR`.
    pub fn set_year(&mut self, year: i32) -> Result<(), ConfigError> {
        self.year = check_year(year, &year.to_string())?;
        Ok(())
    }

    /// Fail fast on settings that would only be noticed after fetching.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_year(self.year, &self.year.to_string())?;
        if !self.dry_run {
            self.require_publish()?;
        }
        Ok(())
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            year: 2024,
            strava: StravaConfig {
                client_id: "test_client_id".to_string(),
                client_secret: "test_secret".to_string(),
                refresh_token: "test_refresh".to_string(),
                access_token: Some("test_access".to_string()),
                api_url: DEFAULT_STRAVA_API_URL.to_string(),
                oauth_url: DEFAULT_STRAVA_OAUTH_URL.to_string(),
            },
            publish: None,
            running_only: false,
            dry_run: true,
        }
    }
}

const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1970..=9999;

fn parse_year(value: &str) -> Result<i32, ConfigError> {
    let year = value.parse::<i32>().map_err(|_| ConfigError::Invalid {
        name: "RECAP_YEAR",
        value: value.to_string(),
    })?;
    check_year(year, value)
}

fn check_year(year: i32, raw: &str) -> Result<i32, ConfigError> {
    if YEAR_RANGE.contains(&year) {
        Ok(year)
    } else {
        Err(ConfigError::Invalid {
            name: "RECAP_YEAR",
            value: raw.to_string(),
        })
    }
}

fn parse_flag(name: &'static str, value: Option<String>) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(false);
    };
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::Invalid { name, value }),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
