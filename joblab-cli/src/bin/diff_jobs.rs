// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! diff-jobs - diff a named artifact file between two job runs.
//!
//! Fetches the artifact for the left job, then the right job, into the
//! local cache. If a preprocess command is given, each cache file is piped
//! through it (content on stdin, replacement captured from stdout) before
//! the diff viewer is launched on the pair.

use anyhow::Result;
use clap::Parser;
use joblab_cli::{ConnectionArgs, exit_with, parse_or_exit, setup_logging};
use joblab_fetch::{ApiClient, ArtifactDiffer, DEFAULT_DIFFTOOL};

/// Diff one artifact file between two CI jobs.
#[derive(Debug, Parser)]
#[command(name = "diff-jobs")]
#[command(about = "Diff a named artifact file between two CI job runs")]
#[command(version)]
struct Cli {
    /// Job id on the left side of the diff.
    job_id_left: u64,

    /// Job id on the right side of the diff.
    job_id_right: u64,

    /// Artifact path relative to the job's artifact archive.
    artifact_path: String,

    /// Diff viewer invoked with both cached files as trailing arguments.
    #[arg(long, default_value = DEFAULT_DIFFTOOL)]
    difftool: String,

    /// Filter command each file is piped through before diffing
    /// (stdin: file content, stdout: replacement content).
    #[arg(long)]
    preprocess: Option<String>,

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
    let client = ApiClient::new(config)?;

    let differ = ArtifactDiffer::new(&cli.difftool, cli.preprocess.as_deref())?;
    differ
        .run(
            &client,
            cli.job_id_left,
            cli.job_id_right,
            &cli.artifact_path,
        )
        .await?;

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
