//! Artifact fetching, preprocessing, and diff invocation.

use crate::cache::{self, DIFF_CACHE};
use crate::client::ApiClient;
use crate::command::CommandSpec;
use crate::error::{DiffToolError, FetchError, PreprocessError};
use joblab_core::encode::encode_path_segment;
use joblab_core::Config;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Diff viewer used when `--difftool` is not given.
pub const DEFAULT_DIFFTOOL: &str = "vimdiff";

/// Fetches a named artifact for two jobs and hands both files to a diff
/// viewer.
///
/// The left job's artifact is always fetched before the right one. Both
/// cache entries stay on disk for the whole run; the diff viewer's output
/// and exit status are never interpreted.
#[derive(Debug)]
pub struct ArtifactDiffer {
    cache_dir: PathBuf,
    difftool: CommandSpec,
    preprocess: Option<CommandSpec>,
}

impl ArtifactDiffer {
    /// Builds a differ from user-supplied command strings.
    ///
    /// # Errors
    ///
    /// Returns [`DiffToolError`] or [`PreprocessError`] for a command
    /// string that cannot be parsed, or an IO error if the cache directory
    /// cannot be created.
    pub fn new(difftool: &str, preprocess: Option<&str>) -> Result<Self, FetchError> {
        let difftool = CommandSpec::parse(difftool).map_err(DiffToolError::from)?;
        let preprocess = preprocess
            .map(CommandSpec::parse)
            .transpose()
            .map_err(PreprocessError::from)?;
        let cache_dir = cache::tool_cache_dir(DIFF_CACHE)?;

        Ok(Self {
            cache_dir,
            difftool,
            preprocess,
        })
    }

    /// Creates a differ over an explicit cache directory (must exist).
    pub fn with_cache_dir(
        cache_dir: PathBuf,
        difftool: CommandSpec,
        preprocess: Option<CommandSpec>,
    ) -> Self {
        Self {
            cache_dir,
            difftool,
            preprocess,
        }
    }

    /// Fetches both artifacts, preprocesses them if configured, and runs
    /// the diff viewer to completion.
    ///
    /// # Errors
    ///
    /// Any failed fetch, filter run, or viewer launch aborts immediately.
    pub async fn run(
        &self,
        client: &ApiClient,
        left_job: u64,
        right_job: u64,
        artifact_path: &str,
    ) -> Result<(), FetchError> {
        let left = self.fetch_artifact(client, left_job, artifact_path).await?;
        let right = self.fetch_artifact(client, right_job, artifact_path).await?;

        if let Some(filter) = &self.preprocess {
            apply_preprocess(filter, &left).await?;
            apply_preprocess(filter, &right).await?;
        }

        launch_difftool(&self.difftool, &left, &right).await?;
        Ok(())
    }

    /// Fetches one job's artifact into its cache entry.
    async fn fetch_artifact(
        &self,
        client: &ApiClient,
        job_id: u64,
        artifact_path: &str,
    ) -> Result<PathBuf, FetchError> {
        let url = artifact_url(client.config(), job_id, artifact_path);
        let body = client.get_bytes(&url).await?;

        let path = self.entry_path(job_id, artifact_path);
        std::fs::write(&path, &body)?;
        debug!(job_id, path = %path.display(), bytes = body.len(), "cached artifact");
        Ok(path)
    }

    /// Cache file path for a job's artifact, named `{job_id}.{ext}`.
    pub fn entry_path(&self, job_id: u64, artifact_path: &str) -> PathBuf {
        let ext = Path::new(artifact_path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("raw");
        self.cache_dir.join(format!("{job_id}.{ext}"))
    }
}

/// URL of a named artifact file inside a job's artifact archive.
pub fn artifact_url(config: &Config, job_id: u64, artifact_path: &str) -> String {
    format!(
        "{}/projects/{}/jobs/{job_id}/artifacts/{artifact_path}",
        config.server,
        encode_path_segment(&config.repo)
    )
}

/// Pipes a cache file through the filter program and replaces it.
///
/// The file's content goes to the filter's stdin; its stdout becomes the
/// new content. The replacement is atomic: stdout is written to a sibling
/// file which is then renamed over the original.
async fn apply_preprocess(filter: &CommandSpec, path: &Path) -> Result<(), PreprocessError> {
    let program = which::which(&filter.program)
        .map_err(|_| PreprocessError::NotFound(filter.program.clone()))?;
    let input = std::fs::read(path)?;

    debug!(program = %program.display(), file = %path.display(), "running filter");
    let mut child = Command::new(&program)
        .args(&filter.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    // Feed stdin from its own task; writing inline would deadlock with a
    // streaming filter once the stdout pipe fills, since wait_with_output
    // only starts draining stdout after the write completes. A write error
    // (filter closed stdin early) is not fatal by itself; the exit status
    // below is the authoritative signal.
    if let Some(mut stdin) = child.stdin.take() {
        tokio::spawn(async move {
            let _ = stdin.write_all(&input).await;
            // Dropping stdin closes the pipe so the filter sees EOF
        });
    }

    let output = child.wait_with_output().await?;
    if !output.status.success() {
        return Err(PreprocessError::NonZeroExit {
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, &output.stdout)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Launches the diff viewer on the two final cache files and waits for it.
async fn launch_difftool(
    difftool: &CommandSpec,
    left: &Path,
    right: &Path,
) -> Result<(), DiffToolError> {
    let program = which::which(&difftool.program)
        .map_err(|_| DiffToolError::NotFound(difftool.program.clone()))?;

    debug!(program = %program.display(), left = %left.display(), right = %right.display(), "launching diff tool");
    let status = Command::new(&program)
        .args(&difftool.args)
        .arg(left)
        .arg(right)
        .status()
        .await?;

    // The viewer's exit status is intentionally not interpreted
    debug!(code = ?status.code(), "diff tool exited");
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn differ(dir: &TempDir, difftool: &str, preprocess: Option<&str>) -> ArtifactDiffer {
        ArtifactDiffer::with_cache_dir(
            dir.path().to_path_buf(),
            CommandSpec::parse(difftool).unwrap(),
            preprocess.map(|p| CommandSpec::parse(p).unwrap()),
        )
    }

    fn config() -> Config {
        Config {
            server: "https://gitlab.example.com".to_string(),
            repo: "group/proj".to_string(),
            token: "secret".to_string(),
            debug: false,
        }
    }

    #[test]
    fn test_artifact_url() {
        assert_eq!(
            artifact_url(&config(), 100, "report.xml"),
            "https://gitlab.example.com/projects/group%2fproj/jobs/100/artifacts/report.xml"
        );
    }

    #[test]
    fn test_entry_path_uses_artifact_extension() {
        let dir = TempDir::new().unwrap();
        let differ = differ(&dir, "true", None);

        let path = differ.entry_path(100, "reports/report.xml");
        assert!(path.ends_with("100.xml"));

        let path = differ.entry_path(101, "binary-blob");
        assert!(path.ends_with("101.raw"));
    }

    #[tokio::test]
    async fn test_preprocess_replaces_content_with_stdout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("100.txt");
        std::fs::write(&path, "banana\napple\n").unwrap();

        let filter = CommandSpec::parse("sort").unwrap();
        apply_preprocess(&filter, &path).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "apple\nbanana\n");
    }

    #[tokio::test]
    async fn test_preprocess_streams_input_larger_than_pipe_buffers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("100.txt");
        // Well past the ~64 KiB pipe capacity
        let content = "x".repeat(1 << 20);
        std::fs::write(&path, &content).unwrap();

        let filter = CommandSpec::parse("cat").unwrap();
        tokio::time::timeout(
            std::time::Duration::from_secs(10),
            apply_preprocess(&filter, &path),
        )
        .await
        .expect("filter must not deadlock on large input")
        .unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
    }

    #[tokio::test]
    async fn test_preprocess_with_quoted_args() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("100.txt");
        std::fs::write(&path, "a b c").unwrap();

        let filter = CommandSpec::parse("tr -d ' '").unwrap();
        apply_preprocess(&filter, &path).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "abc");
    }

    #[tokio::test]
    async fn test_preprocess_missing_program() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("100.txt");
        std::fs::write(&path, "x").unwrap();

        let filter = CommandSpec::parse("definitely_not_a_real_filter_12345").unwrap();
        let result = apply_preprocess(&filter, &path).await;

        assert!(matches!(result, Err(PreprocessError::NotFound(_))));
        // Original content untouched on failure
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "x");
    }

    #[tokio::test]
    async fn test_preprocess_nonzero_exit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("100.txt");
        std::fs::write(&path, "x").unwrap();

        let filter = CommandSpec::parse("false").unwrap();
        let result = apply_preprocess(&filter, &path).await;

        assert!(matches!(result, Err(PreprocessError::NonZeroExit { .. })));
    }

    #[tokio::test]
    async fn test_difftool_receives_both_paths() {
        let dir = TempDir::new().unwrap();
        let left = dir.path().join("100.txt");
        let right = dir.path().join("101.txt");
        std::fs::write(&left, "a").unwrap();
        std::fs::write(&right, "b").unwrap();

        // `true` ignores its arguments and exits 0; a non-zero viewer exit
        // (e.g. plain `diff` on differing files) must not error either.
        let tool = CommandSpec::parse("true").unwrap();
        launch_difftool(&tool, &left, &right).await.unwrap();

        let tool = CommandSpec::parse("diff").unwrap();
        launch_difftool(&tool, &left, &right).await.unwrap();
    }

    #[tokio::test]
    async fn test_difftool_missing_program() {
        let dir = TempDir::new().unwrap();
        let left = dir.path().join("a");
        let right = dir.path().join("b");
        std::fs::write(&left, "").unwrap();
        std::fs::write(&right, "").unwrap();

        let tool = CommandSpec::parse("definitely_not_a_real_difftool_12345").unwrap();
        let result = launch_difftool(&tool, &left, &right).await;

        assert!(matches!(result, Err(DiffToolError::NotFound(_))));
    }
}
