// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # joblab Core
//!
//! Core types and utilities shared by the joblab tools.
//!
//! This crate provides the foundation used by `joblab-fetch` and the two
//! command-line front-ends (`grep-deploys` and `diff-jobs`):
//!
//! - [`Config`] - resolved connection settings (server, repository, token)
//! - [`Deployment`] - one CI deployment record as returned by the API
//! - [`encode::encode_path_segment`] - percent-encoding for URL path segments
//! - [`timefmt::relative_age`] - human-relative timestamps for report lines
//! - [`ConfigError`] - configuration resolution failures

pub mod config;
pub mod encode;
pub mod error;
pub mod models;
pub mod timefmt;

// Re-export error types
pub use error::ConfigError;

// Re-export configuration types
pub use config::{Config, ConfigOverrides, DEFAULT_SERVER, ENV_REPO, ENV_SERVER, ENV_TOKEN};

// Re-export model types
pub use models::Deployment;
