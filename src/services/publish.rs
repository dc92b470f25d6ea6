// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Idempotent publishing through the GitHub contents API.
//!
//! The current document is always read before writing: identical content
//! skips the commit, and an existing document's blob SHA is supplied as the
//! optimistic-concurrency precondition on update.

use crate::config::PublishConfig;
use crate::error::{AppError, Result};
use crate::services::github_app::github_request;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// A file as stored in the target repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDocument {
    pub path: String,
    /// Blob SHA, required when overwriting
    pub sha: String,
    /// Decoded file bytes
    pub content: Vec<u8>,
}

/// What `publish` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Created,
    Updated,
    Unchanged,
}

/// File body returned by `GET /repos/{owner}/{repo}/contents/{path}`.
#[derive(Debug, Deserialize)]
struct ContentResponse {
    sha: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: Option<String>,
}

/// Body for `PUT /repos/{owner}/{repo}/contents/{path}`.
#[derive(Debug, Serialize)]
struct PutContentRequest<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<&'a str>,
}

/// Client for one target repository, authorized by an installation token.
pub struct ContentsClient {
    http: reqwest::Client,
    api_url: String,
    owner: String,
    repo: String,
    branch: Option<String>,
    token: String,
}

impl ContentsClient {
    pub fn new(api_url: &str, owner: &str, repo: &str, token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch: None,
            token,
        }
    }

    pub fn from_config(config: &PublishConfig, token: String) -> Self {
        let mut client = Self::new(&config.api_url, &config.owner, &config.repo, token);
        client.branch = config.branch.clone();
        client
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    fn contents_url(&self, path: &str) -> String {
        let encoded: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| urlencoding::encode(s).into_owned())
            .collect();
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_url,
            urlencoding::encode(&self.owner),
            urlencoding::encode(&self.repo),
            encoded.join("/")
        )
    }

    /// Read a document, `None` if it does not exist yet.
    pub async fn get_document(&self, path: &str) -> Result<Option<RemoteDocument>> {
        let mut request = github_request(self.http.get(self.contents_url(path)))
            .bearer_auth(&self.token);
        if let Some(ref branch) = self.branch {
            request = request.query(&[("ref", branch.as_str())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Publish(format!("Read of {} failed: {}", path, e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, path, "GitHub content read failed");
            return Err(AppError::Publish(format!(
                "Read of {} failed with status {}",
                path, status
            )));
        }

        let body: ContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::Publish(format!("Failed to parse content of {}: {}", path, e)))?;

        if let Some(ref encoding) = body.encoding {
            if encoding != "base64" {
                return Err(AppError::Publish(format!(
                    "Unsupported content encoding for {}: {}",
                    path, encoding
                )));
            }
        }

        Ok(Some(RemoteDocument {
            path: path.to_string(),
            content: decode_content(&body.content)?,
            sha: body.sha,
        }))
    }

    /// Create (`sha` is `None`) or overwrite a document in one commit.
    pub async fn put_document(
        &self,
        path: &str,
        content: &[u8],
        message: &str,
        sha: Option<&str>,
    ) -> Result<()> {
        let body = PutContentRequest {
            message,
            content: BASE64.encode(content),
            sha,
            branch: self.branch.as_deref(),
        };

        let response = github_request(self.http.put(self.contents_url(path)))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Publish(format!("Write of {} failed: {}", path, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, path, "GitHub content write failed");
            return Err(AppError::Publish(format!(
                "Write of {} failed with status {}",
                path, status
            )));
        }

        Ok(())
    }

    /// Write `content` to `path` unless it is already there byte for byte.
    pub async fn publish(
        &self,
        path: &str,
        content: &str,
        message: &str,
    ) -> Result<PublishOutcome> {
        let existing = self.get_document(path).await?;

        let outcome = match existing {
            Some(ref doc) if doc.content == content.as_bytes() => {
                tracing::info!(path, sha = %doc.sha, "Content unchanged, skipping commit");
                return Ok(PublishOutcome::Unchanged);
            }
            Some(_) => PublishOutcome::Updated,
            None => PublishOutcome::Created,
        };

        let sha = existing.as_ref().map(|doc| doc.sha.as_str());
        self.put_document(path, content.as_bytes(), message, sha)
            .await?;

        tracing::info!(
            path,
            owner = %self.owner,
            repo = %self.repo,
            outcome = ?outcome,
            "Published recap"
        );
        Ok(outcome)
    }
}

/// Decode GitHub's base64 payload, which is wrapped with newlines.
pub fn decode_content(encoded: &str) -> Result<Vec<u8>> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    BASE64
        .decode(compact)
        .map_err(|e| AppError::Publish(format!("Invalid base64 content: {}", e)))
}
