// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod github_app;
pub mod publish;
pub mod recap;
pub mod report;
pub mod stats;
pub mod strava;

pub use github_app::{GitHubAppAuth, InstallationToken};
pub use publish::{ContentsClient, PublishOutcome, RemoteDocument};
pub use recap::{RecapJob, RecapResult};
pub use stats::compute_stats;
pub use strava::{StravaClient, StravaToken};
