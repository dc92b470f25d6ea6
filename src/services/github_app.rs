// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GitHub App authentication.
//!
//! Signs a short-lived RS256 app assertion with the App's private key and
//! exchanges it for an installation access token. A rejected exchange is
//! fatal; nothing here retries.

use crate::config::PublishConfig;
use crate::error::{AppError, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Backdating of `iat` to absorb clock skew with GitHub.
const CLOCK_SKEW_SECS: i64 = 60;
/// Assertion lifetime; GitHub rejects anything over ten minutes.
const ASSERTION_TTL_SECS: i64 = 600;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";
const CLIENT_USER_AGENT: &str = concat!("activity-recap/", env!("CARGO_PKG_VERSION"));

/// Claims of the App assertion.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppClaims {
    /// Issued at (Unix timestamp, backdated)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issuer (GitHub App ID)
    pub iss: String,
}

/// Installation access token returned by the exchange.
#[derive(Clone, Deserialize)]
pub struct InstallationToken {
    pub token: String,
    #[serde(default)]
    pub expires_at: Option<String>,
}

impl std::fmt::Debug for InstallationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstallationToken")
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Signs App assertions and exchanges them for installation tokens.
pub struct GitHubAppAuth {
    http: reqwest::Client,
    api_url: String,
    app_id: String,
    installation_id: u64,
    encoding_key: EncodingKey,
}

impl GitHubAppAuth {
    /// Create from a PEM-encoded RSA private key.
    pub fn new(
        app_id: impl Into<String>,
        installation_id: u64,
        private_key_pem: &[u8],
        api_url: &str,
    ) -> Result<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem)
            .map_err(|e| AppError::Auth(format!("Invalid GitHub App private key: {}", e)))?;

        Ok(Self {
            http: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            app_id: app_id.into(),
            installation_id,
            encoding_key,
        })
    }

    /// Create from publish settings, reading the key file.
    pub fn from_config(config: &PublishConfig) -> Result<Self> {
        let pem = read_private_key(&config.private_key_path)?;
        Self::new(
            config.app_id.clone(),
            config.installation_id,
            &pem,
            &config.api_url,
        )
    }

    /// Claims for an assertion issued at `now`.
    pub fn claims_at(&self, now: DateTime<Utc>) -> AppClaims {
        AppClaims {
            iat: (now - Duration::seconds(CLOCK_SKEW_SECS)).timestamp(),
            exp: (now + Duration::seconds(ASSERTION_TTL_SECS)).timestamp(),
            iss: self.app_id.clone(),
        }
    }

    /// Sign an App assertion issued at `now`.
    pub fn create_assertion(&self, now: DateTime<Utc>) -> Result<String> {
        encode(
            &Header::new(Algorithm::RS256),
            &self.claims_at(now),
            &self.encoding_key,
        )
        .map_err(|e| AppError::Auth(format!("Failed to sign App assertion: {}", e)))
    }

    /// Exchange a fresh assertion for an installation access token.
    pub async fn get_installation_token(&self) -> Result<InstallationToken> {
        let assertion = self.create_assertion(Utc::now())?;
        let url = format!(
            "{}/app/installations/{}/access_tokens",
            self.api_url, self.installation_id
        );

        let response = github_request(self.http.post(&url))
            .bearer_auth(assertion)
            .send()
            .await
            .map_err(|e| AppError::Auth(format!("Token exchange request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "GitHub installation token exchange failed");
            return Err(AppError::Auth(format!(
                "Token exchange failed with status {}",
                status
            )));
        }

        let token: InstallationToken = response
            .json()
            .await
            .map_err(|e| AppError::Auth(format!("Failed to parse token response: {}", e)))?;

        tracing::info!(
            installation_id = self.installation_id,
            expires_at = ?token.expires_at,
            "Obtained GitHub installation token"
        );
        Ok(token)
    }
}

/// Read the App private key from disk.
pub fn read_private_key(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| {
        AppError::Auth(format!(
            "Failed to read private key {}: {}",
            path.display(),
            e
        ))
    })
}

/// Attach the headers GitHub expects on every REST call.
pub(crate) fn github_request(builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    builder
        .header(ACCEPT, GITHUB_ACCEPT)
        .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
        .header(USER_AGENT, CLIENT_USER_AGENT)
}
