// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # joblab Fetch
//!
//! Request orchestration and local caching for the joblab tools.
//!
//! This crate does the actual work behind `grep-deploys` and `diff-jobs`:
//!
//! - [`client::ApiClient`] - one authenticated GET per call, no retry;
//!   non-2xx or transport failure is fatal
//! - [`deployments`] - fetches one page of deployment records, already
//!   ordered newest-first by the service
//! - [`trace::LogCache`] - caches job traces on disk, scans them with a
//!   regex, and retains a cache entry only when it matched
//! - [`artifacts::ArtifactDiffer`] - fetches an artifact for two jobs,
//!   optionally pipes each through a filter program, and hands both files
//!   to an external diff viewer
//! - [`command::CommandSpec`] - shell-word parsing of user-supplied
//!   external commands
//!
//! All network and subprocess calls are awaited one at a time; nothing in
//! this crate runs concurrently, so records are always processed in the
//! order the service returned them.

pub mod artifacts;
pub mod cache;
pub mod client;
pub mod command;
pub mod deployments;
pub mod error;
pub mod trace;

// Re-export key types at crate root

// Errors
pub use error::{DiffToolError, FetchError, NetworkError, ParseError, PreprocessError};

// Client & operations
pub use artifacts::{ArtifactDiffer, DEFAULT_DIFFTOOL};
pub use client::ApiClient;
pub use command::CommandSpec;
pub use deployments::{DeploymentFilter, fetch_deployments};
pub use trace::{LogCache, LogReport};
