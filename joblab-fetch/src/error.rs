//! Fetch error types.
//!
//! Every error here is fatal for the run: there is no retry, partial
//! recovery, or degraded continuation. The first failure aborts.

use thiserror::Error;

use crate::command::CommandSpecError;

// ============================================================================
// Aggregate Fetch Error
// ============================================================================

/// Error type for fetch operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request failed at the transport or HTTP level.
    ///
    /// Not `transparent`: the inner error must stay visible as `source()`
    /// so the CLI can recognize network failures anywhere in a chain.
    #[error("{0}")]
    Network(#[from] NetworkError),

    /// Response body could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// External filter program failed.
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    /// Diff viewer could not be launched.
    #[error(transparent)]
    DiffTool(#[from] DiffToolError),

    /// Cache file could not be written or removed.
    #[error("cache IO error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Network Error
// ============================================================================

/// A failed HTTP request: transport error or non-2xx status.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Transport-level failure (connection, TLS, timeout).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("unexpected status {status} from {url}")]
    Status {
        /// HTTP status code returned.
        status: reqwest::StatusCode,
        /// The requested URL.
        url: String,
    },
}

// ============================================================================
// Parse Error
// ============================================================================

/// A response body that is not the JSON the tools expect.
///
/// Kept distinct from [`NetworkError`]: the request itself succeeded.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Malformed or unexpected JSON payload.
    #[error("malformed deployments payload: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Preprocess Error
// ============================================================================

/// Error type for the optional artifact filter program.
#[derive(Debug, Error)]
pub enum PreprocessError {
    /// The `--preprocess` string could not be split into a command.
    #[error(transparent)]
    InvalidSpec(#[from] CommandSpecError),

    /// Filter program not found on PATH.
    #[error("filter command not found: {0}")]
    NotFound(String),

    /// Filter program exited with a non-zero code.
    #[error("filter exited with code {code}: {stderr}")]
    NonZeroExit {
        /// Exit code from the filter.
        code: i32,
        /// Standard error output.
        stderr: String,
    },

    /// IO failure while piping or replacing the cache file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Diff Tool Error
// ============================================================================

/// Error type for launching the diff viewer.
///
/// The viewer's exit status is never interpreted; only a failure to start
/// it is an error.
#[derive(Debug, Error)]
pub enum DiffToolError {
    /// The `--difftool` string could not be split into a command.
    #[error(transparent)]
    InvalidSpec(#[from] CommandSpecError),

    /// Diff program not found on PATH.
    #[error("diff tool not found: {0}")]
    NotFound(String),

    /// Spawning the diff program failed.
    #[error("failed to launch diff tool: {0}")]
    Io(#[from] std::io::Error),
}
