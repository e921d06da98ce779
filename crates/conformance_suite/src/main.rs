//! Conformance runner binary for the booking service.
//!
//! ## Usage
//!
//! ```bash
//! # Check the public demo instance
//! cargo run --bin conformance_suite
//!
//! # Check a local instance and write a markdown report
//! cargo run --bin conformance_suite -- --base-url http://localhost:3001 --report report.md
//! ```
//!
//! ## Environment Variables
//!
//! - `BOOKER_BASE_URL`, `BOOKER_USERNAME`, `BOOKER_PASSWORD`
//! - `BOOKER_REQUEST_TIMEOUT_SECS`, `BOOKER_PING_CEILING_MS`
//! - `RUST_LOG` controls log verbosity (default `info`)

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use conformance_suite::{StepOutcome, SuiteConfig, SuiteRunner, write_report};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "conformance_suite")]
#[command(about = "Check a restful-booker deployment against its API contract", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Base URL of the booking service; overrides file and environment
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Write a markdown report to this path
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    init_logging();

    let cli = Cli::parse();

    match run(&cli).await {
        Ok(true) => info!("All conformance steps passed"),
        Ok(false) => process::exit(1),
        Err(e) => {
            error!(error = %format!("{:#}", e), "Conformance run aborted");
            process::exit(1);
        }
    }
}

async fn run(cli: &Cli) -> Result<bool> {
    let config = SuiteConfig::resolve(cli.config.as_deref(), cli.base_url.as_deref())
        .context("Failed to load suite configuration")?;

    let runner = SuiteRunner::from_config(&config).context("Failed to initialize suite runner")?;

    let report = runner
        .run_all()
        .await
        .context("Conformance suite could not start")?;

    info!("=== Conformance Results ===");
    for result in &report.results {
        let duration_ms = result.duration.as_millis();
        match &result.outcome {
            StepOutcome::Passed => info!(
                step = result.step.name(),
                status = result.outcome.label(),
                duration_ms = duration_ms,
                "Step result"
            ),
            StepOutcome::Failed(failure) => error!(
                step = result.step.name(),
                status = result.outcome.label(),
                duration_ms = duration_ms,
                error = %failure,
                "Step result"
            ),
            StepOutcome::Blocked(reason) => info!(
                step = result.step.name(),
                status = result.outcome.label(),
                reason = %reason,
                "Step result"
            ),
        }
    }

    if let Some(path) = &cli.report {
        write_report(&report, path).context("Failed to write conformance report")?;
    }

    if !report.is_success() {
        error!(
            failed = report.failed(),
            blocked = report.blocked(),
            "Conformance suite failed"
        );
    }

    Ok(report.is_success())
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_without_flags() {
        let cli = Cli::try_parse_from(["conformance_suite"]).unwrap();
        assert!(cli.config.is_none());
        assert!(cli.base_url.is_none());
        assert!(cli.report.is_none());
    }

    #[test]
    fn test_cli_with_all_flags() {
        let cli = Cli::try_parse_from([
            "conformance_suite",
            "--config",
            "booker.toml",
            "--base-url",
            "http://localhost:3001",
            "--report",
            "report.md",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("booker.toml")));
        assert_eq!(cli.base_url.as_deref(), Some("http://localhost:3001"));
        assert_eq!(cli.report, Some(PathBuf::from("report.md")));
    }
}
