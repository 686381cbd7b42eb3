//! Connection configuration resolution.
//!
//! Each setting is resolved independently, in order of decreasing priority:
//! explicit flag, environment variable, value derived from the first git
//! remote, built-in default. The token is never derived from git. The result
//! is one immutable [`Config`] built at startup.

use crate::error::ConfigError;
use regex::Regex;
use std::process::Command;
use tracing::debug;
use url::Url;

/// Default server when nothing else supplies one.
pub const DEFAULT_SERVER: &str = "https://gitlab.com";

/// Environment variable holding the API token.
pub const ENV_TOKEN: &str = "GITLAB_TOKEN";

/// Environment variable overriding the server base URL.
pub const ENV_SERVER: &str = "GITLAB_SERVER";

/// Environment variable overriding the repository slug.
pub const ENV_REPO: &str = "GITLAB_REPO";

/// Resolved connection settings, immutable for the run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server base URL, without a trailing slash.
    pub server: String,
    /// Repository slug (`group/project`), not yet percent-encoded.
    pub repo: String,
    /// Bearer token for the `Authorization` header.
    pub token: String,
    /// Whether to print the equivalent request command before sending.
    pub debug: bool,
}

/// Explicit values from the command line, highest priority.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// `--server` value.
    pub server: Option<String>,
    /// `--repo` value.
    pub repo: Option<String>,
    /// `--token` value.
    pub token: Option<String>,
    /// `--debug` flag.
    pub debug: bool,
}

/// Server and repository slug derived from a git remote URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteInfo {
    /// Scheme and host, e.g. `https://gitlab.example.com`.
    pub server: String,
    /// Path portion with any `.git` suffix stripped.
    pub repo: String,
}

impl Config {
    /// Resolves a configuration from flags, environment, and git context.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the token or repository slug is still
    /// empty after all sources have been consulted.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let env = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());
        let remote = first_remote_url();

        Self::resolve_from_parts(
            overrides,
            env(ENV_TOKEN),
            env(ENV_SERVER),
            env(ENV_REPO),
            remote.as_deref(),
        )
    }

    /// Pure resolution step over already-gathered source values.
    fn resolve_from_parts(
        overrides: ConfigOverrides,
        env_token: Option<String>,
        env_server: Option<String>,
        env_repo: Option<String>,
        remote: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let detected = remote.and_then(parse_remote_url);

        let server = overrides
            .server
            .or(env_server)
            .or_else(|| detected.as_ref().map(|d| d.server.clone()))
            .unwrap_or_else(|| DEFAULT_SERVER.to_string());
        let server = server.trim_end_matches('/').to_string();

        let repo = overrides
            .repo
            .or(env_repo)
            .or_else(|| detected.map(|d| d.repo))
            .filter(|r| !r.is_empty())
            .ok_or(ConfigError::MissingRepo)?;

        let token = overrides
            .token
            .or(env_token)
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        Ok(Self {
            server,
            repo,
            token,
            debug: overrides.debug,
        })
    }
}

/// Parses a git remote URL into server and repository slug.
///
/// Two forms are recognized: `http(s)://host/group/project[.git]` and the
/// SCP-like `user@host:group/project[.git]`. Anything else yields `None`,
/// which callers treat as "no detection", not an error.
pub fn parse_remote_url(remote: &str) -> Option<RemoteInfo> {
    let remote = remote.trim();

    if remote.starts_with("http://") || remote.starts_with("https://") {
        let parsed = Url::parse(remote).ok()?;
        let host = parsed.host_str()?;
        let repo = strip_git_suffix(parsed.path().trim_matches('/'));
        if repo.is_empty() {
            return None;
        }
        let server = match parsed.port() {
            Some(port) => format!("{}://{host}:{port}", parsed.scheme()),
            None => format!("{}://{host}", parsed.scheme()),
        };
        return Some(RemoteInfo {
            server,
            repo: repo.to_string(),
        });
    }

    // SCP-like form used by ssh remotes: user@host:path
    let pattern = Regex::new(r"^[^@/\s]+@([^:/\s]+):(.+)$").ok()?;
    let captures = pattern.captures(remote)?;
    let host = captures.get(1)?.as_str();
    let repo = strip_git_suffix(captures.get(2)?.as_str().trim_matches('/'));
    if repo.is_empty() {
        return None;
    }
    Some(RemoteInfo {
        server: format!("https://{host}"),
        repo: repo.to_string(),
    })
}

fn strip_git_suffix(path: &str) -> &str {
    path.strip_suffix(".git").unwrap_or(path)
}

/// Returns the URL of the first configured git remote, if any.
///
/// Missing git, a directory outside any repository, or a repository with no
/// remotes all yield `None` silently.
fn first_remote_url() -> Option<String> {
    let name = run_git(&["remote"])?;
    let name = name.lines().next()?.trim().to_string();
    if name.is_empty() {
        return None;
    }

    let url = run_git(&["remote", "get-url", &name])?;
    let url = url.trim().to_string();
    if url.is_empty() { None } else { Some(url) }
}

fn run_git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        debug!(args = ?args, "git command failed, skipping remote detection");
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).to_string())
}

// ============================================================================
// Tests
// ============================================================================
