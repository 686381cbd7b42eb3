// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Shared plumbing for the joblab binaries.
//!
//! Both `grep-deploys` and `diff-jobs` flatten [`ConnectionArgs`] into
//! their CLI, resolve it into a [`Config`](joblab_core::Config) once at
//! startup, and map every failure to exit code 1.

use clap::Args;
use joblab_core::{Config, ConfigError, ConfigOverrides};
use joblab_fetch::NetworkError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Connection options shared by both tools.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// API token (overrides GITLAB_TOKEN).
    #[arg(long, short = 't')]
    pub token: Option<String>,

    /// Server base URL (overrides GITLAB_SERVER and git-remote detection).
    #[arg(long)]
    pub server: Option<String>,

    /// Repository slug, e.g. group/project (overrides GITLAB_REPO and
    /// git-remote detection).
    #[arg(long)]
    pub repo: Option<String>,

    /// Print the equivalent request command before each API call.
    #[arg(long, short = 'd')]
    pub debug: bool,
}

impl ConnectionArgs {
    /// Resolves these flags plus environment and git context into a config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when token or repository stay empty after
    /// every source.
    pub fn resolve(&self) -> Result<Config, ConfigError> {
        Config::resolve(ConfigOverrides {
            server: self.server.clone(),
            repo: self.repo.clone(),
            token: self.token.clone(),
            debug: self.debug,
        })
    }
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// Configuration, usage, request, or process failure.
    Error = 1,
}

/// Parses the command line, terminating on failure with exit code 1.
///
/// clap's own `parse()` exits with code 2 on a usage error; both tools
/// reserve a single failure code, so the rendered message is printed and
/// the process exits 1 instead. `--help` and `--version` surface as clap
/// "errors" too but are successful exits.
pub fn parse_or_exit<C: clap::Parser>() -> C {
    match C::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            let code = if e.use_stderr() {
                ExitCode::Error
            } else {
                ExitCode::Success
            };
            std::process::exit(code as i32);
        }
    }
}

/// Installs the tracing subscriber: stderr, no timestamps.
pub fn setup_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("joblab_core=debug,joblab_fetch=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Reports a fatal error and terminates with exit code 1.
///
/// When the failure was a network error and debug mode is off, suggests
/// re-running with `--debug` so the operator can see the exact request.
pub fn exit_with(err: &anyhow::Error, debug: bool) -> ! {
    eprintln!("error: {err}");
    for cause in err.chain().skip(1) {
        eprintln!("  caused by: {cause}");
    }
    if !debug && is_network_error(err) {
        eprintln!("hint: re-run with --debug to inspect the underlying request");
    }
    std::process::exit(ExitCode::Error as i32);
}

fn is_network_error(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|cause| cause.downcast_ref::<NetworkError>().is_some())
}

// ============================================================================
// Tests
// ============================================================================
