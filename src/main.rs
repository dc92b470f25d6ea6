// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity Recap CLI
//!
//! Fetches a year of Strava activities, renders the recap, and publishes it
//! to GitHub unless `--dry-run` is given.
//!
//! Usage:
//! ```bash
//! # Publish this year's recap
//! activity-recap
//!
//! # Preview last year's running recap without publishing
//! activity-recap --year 2024 --running-only --dry-run
//! ```

use activity_recap::{config::Config, services::RecapJob};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "activity-recap",
    about = "Publish a yearly Strava activity recap to GitHub"
)]
struct Cli {
    /// Year to summarise (overrides RECAP_YEAR)
    #[arg(long)]
    year: Option<i32>,

    /// Print the report instead of publishing it
    #[arg(long)]
    dry_run: bool,

    /// Only count runs and include consistency highlights
    #[arg(long)]
    running_only: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Load configuration from environment
    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };
    if let Some(year) = cli.year {
        if let Err(e) = config.set_year(year) {
            tracing::error!(error = %e, "Invalid --year");
            return ExitCode::FAILURE;
        }
    }
    config.dry_run |= cli.dry_run;
    config.running_only |= cli.running_only;

    match RecapJob::new(config).run().await {
        Ok(result) => {
            match result.outcome {
                None => println!("{}", result.report),
                Some(outcome) => tracing::info!(
                    path = %result.path,
                    outcome = ?outcome,
                    "Recap complete"
                ),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Recap failed");
            ExitCode::FAILURE
        }
    }
}

/// Filter used when `RUST_LOG` is unset: this crate at debug with `--verbose`,
/// everything else at info.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "activity_recap=debug,info"
    } else {
        "info"
    }
}

/// Initialize logging: JSON when `LOG_FORMAT=json`, compact text otherwise.
fn init_logging(verbose: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter(verbose)));

    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
