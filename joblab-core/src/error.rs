//! Core error types for joblab.

use thiserror::Error;

/// Error type for configuration resolution.
///
/// Raised only after every source (explicit flag, environment variable,
/// git-remote detection, built-in default) has been exhausted. Detection
/// failures on their own never produce an error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No API token from any source.
    #[error("no API token: pass --token or set {}", crate::config::ENV_TOKEN)]
    MissingToken,

    /// No repository identifier from any source.
    #[error(
        "no repository: pass --repo, set {}, or run inside a clone with a recognizable remote",
        crate::config::ENV_REPO
    )]
    MissingRepo,
}
