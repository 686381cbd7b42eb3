//! Job trace caching and regex scanning.

use crate::cache::{self, GREP_CACHE};
use crate::client::ApiClient;
use crate::error::FetchError;
use joblab_core::encode::encode_path_segment;
use joblab_core::models::Deployment;
use joblab_core::timefmt::relative_age_from_now;
use joblab_core::Config;
use regex::Regex;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// What the log search tool prints for a deployment whose trace matched.
#[derive(Debug, Clone)]
pub struct LogReport {
    /// Job identifier.
    pub job_id: u64,
    /// Link to the job on the server.
    pub job_url: String,
    /// User who triggered the deployment.
    pub user_name: String,
    /// Environment deployed to.
    pub environment_slug: String,
    /// Human-relative age of the deployment.
    pub age: String,
    /// Every trace line that matched the filter, in file order.
    pub lines: Vec<String>,
}

/// Disk cache of job traces with regex-driven retention.
///
/// Each scanned trace lands in `<cache>/<job_id>.log`. The file is kept
/// exactly when at least one of its lines matches the filter; otherwise it
/// is deleted immediately. The default filter (an empty pattern) matches
/// every line, so every fetched trace is retained.
#[derive(Debug)]
pub struct LogCache {
    cache_dir: PathBuf,
    filter: Regex,
}

impl LogCache {
    /// Opens the tool's cache directory, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache directory cannot be created.
    pub fn open(filter: Regex) -> Result<Self, FetchError> {
        Ok(Self::with_cache_dir(cache::tool_cache_dir(GREP_CACHE)?, filter))
    }

    /// Creates a cache over an explicit directory (must already exist).
    pub fn with_cache_dir(cache_dir: PathBuf, filter: Regex) -> Self {
        Self { cache_dir, filter }
    }

    /// Fetches, caches, and scans one deployment's trace.
    ///
    /// Returns `Some` report when the trace matched (cache entry retained),
    /// `None` when it did not (cache entry deleted). Callers drive this over
    /// the whole deployment sequence; a match never short-circuits later
    /// records.
    ///
    /// # Errors
    ///
    /// Propagates request failures and cache IO errors; both abort the run.
    pub async fn scan(
        &self,
        client: &ApiClient,
        deployment: &Deployment,
    ) -> Result<Option<LogReport>, FetchError> {
        let url = trace_url(client.config(), deployment.job_id);
        let body = client.get_text(&url).await?;

        let lines = self.store_and_filter(deployment.job_id, &body)?;
        let Some(lines) = lines else {
            return Ok(None);
        };

        Ok(Some(LogReport {
            job_id: deployment.job_id,
            job_url: job_url(client.config(), deployment.job_id),
            user_name: deployment.user_name.clone(),
            environment_slug: deployment.environment_slug.clone(),
            age: relative_age_from_now(deployment.created_at),
            lines,
        }))
    }

    /// Writes the trace to its cache entry and applies the filter.
    ///
    /// Returns the matching lines, or `None` after deleting the entry when
    /// nothing matched.
    fn store_and_filter(&self, job_id: u64, content: &str) -> Result<Option<Vec<String>>, FetchError> {
        let path = self.entry_path(job_id);
        fs::write(&path, content)?;

        let lines = matching_lines(content, &self.filter);
        if lines.is_empty() {
            debug!(job_id, path = %path.display(), "no match, dropping cache entry");
            fs::remove_file(&path)?;
            return Ok(None);
        }

        debug!(job_id, matches = lines.len(), "retaining cache entry");
        Ok(Some(lines))
    }

    /// Cache file path for a job's trace.
    pub fn entry_path(&self, job_id: u64) -> PathBuf {
        self.cache_dir.join(format!("{job_id}.log"))
    }
}

/// Collects every line of `content` that matches `filter`, in order.
pub fn matching_lines(content: &str, filter: &Regex) -> Vec<String> {
    content
        .lines()
        .filter(|line| filter.is_match(line))
        .map(ToString::to_string)
        .collect()
}

/// URL of a job's execution trace.
pub fn trace_url(config: &Config, job_id: u64) -> String {
    format!(
        "{}/projects/{}/jobs/{job_id}/trace",
        config.server,
        encode_path_segment(&config.repo)
    )
}

/// Link to the job page shown in report headers.
pub fn job_url(config: &Config, job_id: u64) -> String {
    format!("{}/{}/-/jobs/{job_id}", config.server, config.repo)
}

// ============================================================================
// Tests
// ============================================================================
