// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end recap job.
//!
//! Handles the whole run:
//! 1. Fetch the year's activities from Strava
//! 2. Aggregate them into statistics
//! 3. Render the Markdown report
//! 4. Unless dry-running, obtain a GitHub installation token
//! 5. Publish the report if it changed

use crate::config::{Config, PublishConfig};
use crate::error::Result;
use crate::models::{AggregatedStats, RecapProfile};
use crate::services::publish::{ContentsClient, PublishOutcome};
use crate::services::strava::{StravaClient, StravaToken};
use crate::services::{report, stats, GitHubAppAuth};

/// One run of the recap pipeline.
pub struct RecapJob {
    config: Config,
    strava: StravaClient,
}

/// Result of a completed run.
#[derive(Debug)]
pub struct RecapResult {
    pub stats: AggregatedStats,
    pub report: String,
    /// Repository path the report belongs at
    pub path: String,
    /// `None` for dry runs
    pub outcome: Option<PublishOutcome>,
}

impl RecapJob {
    pub fn new(config: Config) -> Self {
        let strava = StravaClient::from_config(&config.strava);
        Self { config, strava }
    }

    /// Replace the Strava client (page size, endpoints).
    pub fn with_strava_client(mut self, strava: StravaClient) -> Self {
        self.strava = strava;
        self
    }

    pub fn profile(&self) -> RecapProfile {
        RecapProfile::from_running_only(self.config.running_only)
    }

    /// Run the pipeline. Configuration is checked before any network call.
    pub async fn run(&self) -> Result<RecapResult> {
        self.config.validate()?;

        let year = self.config.year;
        let profile = self.profile();
        tracing::info!(year, profile = ?profile, dry_run = self.config.dry_run, "Starting recap");

        let (stats, report) = self.build_report().await?;
        let path = profile.output_path(year);

        if self.config.dry_run {
            tracing::info!(path = %path, "Dry run, skipping publish");
            return Ok(RecapResult {
                stats,
                report,
                path,
                outcome: None,
            });
        }

        let publish = self.config.require_publish()?;
        let outcome =
            publish_report(publish, &path, &report, &profile.commit_message(year)).await?;

        Ok(RecapResult {
            stats,
            report,
            path,
            outcome: Some(outcome),
        })
    }

    /// Fetch, aggregate and render without publishing.
    pub async fn build_report(&self) -> Result<(AggregatedStats, String)> {
        let year = self.config.year;
        let profile = self.profile();

        let mut token = StravaToken::from_config(&self.config.strava);
        let records = self
            .strava
            .fetch_records_for_year(&mut token, year, profile)
            .await?;

        let stats = stats::compute_stats(&records, year, profile);
        tracing::info!(
            year,
            activities = stats.totals.count,
            categories = stats.categories.len(),
            distance_miles = stats.totals.distance_miles,
            "Computed stats"
        );

        let report = report::render(&stats);
        Ok((stats, report))
    }
}

/// Authenticate as the GitHub App installation and publish `report`.
pub async fn publish_report(
    config: &PublishConfig,
    path: &str,
    report: &str,
    message: &str,
) -> Result<PublishOutcome> {
    let auth = GitHubAppAuth::from_config(config)?;
    let installation = auth.get_installation_token().await?;

    ContentsClient::from_config(config, installation.token)
        .publish(path, report, message)
        .await
}
