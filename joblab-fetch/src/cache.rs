//! On-disk cache directories.
//!
//! Each tool owns one deterministic directory under the OS temp dir.
//! Entries are never evicted by the tools themselves; cleanup is manual
//! (or left to the platform's temp-dir reaping). Concurrent invocations
//! against the same job ids race on the same paths; that is an accepted
//! limitation.

use std::io;
use std::path::PathBuf;

/// Cache directory name for the log search tool.
pub const GREP_CACHE: &str = "grep-deploys";

/// Cache directory name for the artifact diff tool.
pub const DIFF_CACHE: &str = "diff-jobs";

/// Returns the cache directory for a tool, creating it if needed.
///
/// # Errors
///
/// Returns an IO error if the directory cannot be created.
pub fn tool_cache_dir(tool: &str) -> io::Result<PathBuf> {
    let dir = std::env::temp_dir().join(tool);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_dir_is_created() {
        let dir = tool_cache_dir(GREP_CACHE).unwrap();
        assert!(dir.is_dir());
        assert!(dir.ends_with(GREP_CACHE));
    }
}
