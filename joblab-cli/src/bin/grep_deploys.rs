// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! grep-deploys - search CI deployment job logs by regular expression.
//!
//! Fetches one page of deployment records (newest first), downloads each
//! job's trace into the local cache, and prints a summary plus every
//! matching line for traces that match the filter. Cache entries for
//! non-matching traces are deleted; matching ones are kept under the
//! cache directory for later inspection.

use anyhow::{Context, Result};
use clap::Parser;
use joblab_cli::{ConnectionArgs, exit_with, parse_or_exit, setup_logging};
use joblab_fetch::{ApiClient, DeploymentFilter, LogCache, LogReport, fetch_deployments};
use regex::Regex;
use tracing::info;

/// Search deployment job logs by regular expression.
#[derive(Debug, Parser)]
#[command(name = "grep-deploys")]
#[command(about = "Search CI deployment job logs by regular expression")]
#[command(version)]
struct Cli {
    /// Regular expression to search for; the default matches every line.
    #[arg(long, short = 'r', default_value = "")]
    regex: String,

    /// Only deployments to this environment.
    #[arg(long, short = 'e')]
    env: Option<String>,

    /// Only deployments with this status (e.g. success, failed).
    #[arg(long, short = 's')]
    status: Option<String>,

    #[command(flatten)]
    connection: ConnectionArgs,
}

#[tokio::main]
async fn main() {
    let cli: Cli = parse_or_exit();
    setup_logging(cli.connection.debug);

    let debug = cli.connection.debug;
    if let Err(e) = run(cli).await {
        exit_with(&e, debug);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.connection.resolve()?;
    let filter = Regex::new(&cli.regex).context("invalid --regex pattern")?;

    let client = ApiClient::new(config)?;
    let deployments = fetch_deployments(
        &client,
        &DeploymentFilter {
            environment: cli.env,
            status: cli.status,
        },
    )
    .await?;

    info!(count = deployments.len(), "scanning deployment traces");

    let cache = LogCache::open(filter)?;

    // Every record is scanned; a match never short-circuits later ones.
    for deployment in &deployments {
        if let Some(report) = cache.scan(&client, deployment).await? {
            print_report(&report);
        }
    }

    Ok(())
}

fn print_report(report: &LogReport) {
    println!(
        "job #{} deployed to {} by {} {}",
        report.job_id, report.environment_slug, report.user_name, report.age
    );
    println!("{}", report.job_url);
    for line in &report.lines {
        println!("{line}");
    }
    println!();
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_usage_error_maps_to_failure_exit() {
        // use_stderr() is what parse_or_exit keys the exit code on:
        // usage errors must exit 1, help/version must exit 0
        let err = Cli::try_parse_from(["grep-deploys", "--no-such-flag"]).unwrap_err();
        assert!(err.use_stderr());

        let err = Cli::try_parse_from(["grep-deploys", "--help"]).unwrap_err();
        assert!(!err.use_stderr());
    }

    #[test]
    fn test_cli_parses_all_flags() {
        let cli = Cli::parse_from([
            "grep-deploys",
            "--regex",
            "ERROR",
            "--env",
            "production",
            "--status",
            "success",
            "--token",
            "tok",
            "--server",
            "https://gitlab.example.com",
            "--repo",
            "group/proj",
            "--debug",
        ]);

        assert_eq!(cli.regex, "ERROR");
        assert_eq!(cli.env.as_deref(), Some("production"));
        assert_eq!(cli.status.as_deref(), Some("success"));
        assert_eq!(cli.connection.token.as_deref(), Some("tok"));
        assert!(cli.connection.debug);
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["grep-deploys"]);
        assert_eq!(cli.regex, "");
        assert!(cli.env.is_none());
        assert!(cli.status.is_none());
        assert!(!cli.connection.debug);
    }

    #[test]
    fn test_cli_rejects_positional_arguments() {
        assert!(Cli::try_parse_from(["grep-deploys", "stray"]).is_err());
    }
}
