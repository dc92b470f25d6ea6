// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for fetching a year of activities.
//!
//! Handles:
//! - Paginated activity listing over a calendar year
//! - Token refresh when the token is absent or about to expire
//! - One refresh-and-retry when Strava rejects the token (401)
//! - Rate limit detection (surfaced, not retried)

use crate::config::StravaConfig;
use crate::error::{AppError, Result};
use crate::models::{ActivityRecord, RecapProfile};
use chrono::{DateTime, Duration, TimeZone, Utc};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Strava's maximum page size for the activities endpoint.
pub const DEFAULT_PAGE_SIZE: u32 = 200;

/// Margin before token expiration when we proactively refresh (5 minutes).
const TOKEN_REFRESH_MARGIN_SECS: i64 = 5 * 60;

/// Bearer token state for one run.
///
/// Owned by the caller and passed by `&mut` into every request, so a
/// refresh replaces the whole token in one place.
#[derive(Clone)]
pub struct StravaToken {
    access_token: Option<String>,
    refresh_token: String,
    expires_at: Option<DateTime<Utc>>,
}

impl StravaToken {
    /// Start from an optional access token of unknown expiry.
    pub fn new(access_token: Option<String>, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_at: None,
        }
    }

    pub fn from_config(config: &StravaConfig) -> Self {
        Self::new(config.access_token.clone(), config.refresh_token.clone())
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// A token of unknown expiry is trusted until Strava rejects it.
    fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        match (&self.access_token, self.expires_at) {
            (None, _) => true,
            (Some(_), Some(expires_at)) => {
                now + Duration::seconds(TOKEN_REFRESH_MARGIN_SECS) >= expires_at
            }
            (Some(_), None) => false,
        }
    }

    fn replace(&mut self, refreshed: TokenRefreshResponse) {
        *self = Self {
            access_token: Some(refreshed.access_token),
            refresh_token: refreshed.refresh_token,
            expires_at: DateTime::from_timestamp(refreshed.expires_at, 0),
        };
    }
}

impl std::fmt::Debug for StravaToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StravaToken")
            .field("has_access_token", &self.access_token.is_some())
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
    oauth_url: String,
    client_id: String,
    client_secret: String,
    page_size: u32,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: "https://www.strava.com/api/v3".to_string(),
            oauth_url: "https://www.strava.com/oauth/token".to_string(),
            client_id,
            client_secret,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn from_config(config: &StravaConfig) -> Self {
        Self::new(config.client_id.clone(), config.client_secret.clone())
            .with_urls(&config.api_url, &config.oauth_url)
    }

    /// Point the client at different API and token endpoints.
    pub fn with_urls(mut self, base_url: &str, oauth_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self.oauth_url = oauth_url.to_string();
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Fetch every activity in `year` that `profile` includes.
    ///
    /// Pages are requested until one comes back empty or shorter than the
    /// page size.
    pub async fn fetch_records_for_year(
        &self,
        token: &mut StravaToken,
        year: i32,
        profile: RecapProfile,
    ) -> Result<Vec<ActivityRecord>> {
        let (after, before) = year_bounds(year)?;
        let mut records = Vec::new();
        let mut page = 1;

        loop {
            let batch = self
                .list_activities(token, after, before, page, self.page_size)
                .await?;
            let fetched = batch.len();
            tracing::debug!(year, page, fetched, "Fetched activity page");

            if fetched == 0 {
                break;
            }

            records.extend(batch.into_iter().filter(|r| profile.includes(r)));

            if fetched < self.page_size as usize {
                break;
            }
            page += 1;
        }

        tracing::info!(year, count = records.len(), pages = page, "Fetched activities");
        Ok(records)
    }

    /// List one page of activities between two Unix timestamps (both
    /// exclusive, as Strava defines them).
    ///
    /// A 404 is treated as an empty page.
    pub async fn list_activities(
        &self,
        token: &mut StravaToken,
        after: i64,
        before: i64,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<ActivityRecord>> {
        let url = format!("{}/athlete/activities", self.base_url);
        let query = [
            ("after", after.to_string()),
            ("before", before.to_string()),
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];

        let activities = self
            .get_authorized(token, |access_token| {
                self.http
                    .get(&url)
                    .bearer_auth(access_token)
                    .query(&query)
            })
            .await?;

        Ok(activities.unwrap_or_default())
    }

    /// Exchange the refresh token for a new access token.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenRefreshResponse> {
        let response = self
            .http
            .post(&self.oauth_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(format!("Token refresh request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Strava token refresh failed");
            return Err(AppError::StravaApi(format!(
                "Token refresh failed with status {}",
                status
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::StravaApi(format!("Failed to parse token response: {}", e)))
    }

    /// Refresh `token` in place.
    async fn refresh(&self, token: &mut StravaToken) -> Result<()> {
        let refreshed = self.refresh_token(token.refresh_token()).await?;
        token.replace(refreshed);
        tracing::info!(expires_at = ?token.expires_at(), "Strava token refreshed");
        Ok(())
    }

    /// Send an authorized GET, refreshing and re-sending once on a 401.
    ///
    /// Returns `Ok(None)` for a 404. A second 401 is fatal.
    async fn get_authorized<T, F>(&self, token: &mut StravaToken, build: F) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        F: Fn(&str) -> reqwest::RequestBuilder,
    {
        if token.needs_refresh(Utc::now()) {
            tracing::info!("Access token missing or expiring, refreshing");
            self.refresh(token).await?;
        }

        let mut retried = false;
        loop {
            let access_token = token.access_token().unwrap_or_default().to_string();
            let response = build(&access_token)
                .send()
                .await
                .map_err(|e| AppError::StravaApi(e.to_string()))?;

            match response.status() {
                StatusCode::UNAUTHORIZED if !retried => {
                    tracing::info!("Strava rejected access token, refreshing and retrying");
                    self.refresh(token).await?;
                    retried = true;
                }
                StatusCode::NOT_FOUND => return Ok(None),
                _ => return self.check_response_json(response).await.map(Some),
            }
        }
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status == StatusCode::TOO_MANY_REQUESTS {
                tracing::warn!("Strava rate limit hit (429)");
                return Err(AppError::StravaApi(AppError::STRAVA_RATE_LIMIT.to_string()));
            }

            if status == StatusCode::UNAUTHORIZED {
                return Err(AppError::StravaApi(
                    AppError::STRAVA_TOKEN_ERROR.to_string(),
                ));
            }

            return Err(AppError::StravaApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::StravaApi(format!("JSON parse error: {}", e)))
    }
}

/// Unix timestamps bounding `year` for Strava's exclusive `after`/`before`.
///
/// `after` is one second before midnight on January 1 so that activities
/// starting exactly at midnight are included.
pub fn year_bounds(year: i32) -> Result<(i64, i64)> {
    let start = |y: i32| {
        Utc.with_ymd_and_hms(y, 1, 1, 0, 0, 0)
            .single()
            .map(|dt| dt.timestamp())
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Invalid year: {}", y)))
    };
    Ok((start(year)? - 1, start(year + 1)?))
}

/// Token refresh response from Strava.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}
