//! External command specifications.
//!
//! User-configurable programs (the artifact filter, the diff viewer) are
//! supplied as a single string and converted into an ordered argv token
//! list with shell-word splitting. That is the one documented parsing
//! rule; nothing is re-escaped or re-joined afterwards.

use thiserror::Error;

/// A parsed external command: program name plus fixed leading arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program name or path, looked up on PATH at invocation time.
    pub program: String,
    /// Arguments always passed before any per-call trailing arguments.
    pub args: Vec<String>,
}

/// A command string that could not be parsed.
#[derive(Debug, Error)]
#[error("invalid command {spec:?}: {reason}")]
pub struct CommandSpecError {
    /// The original user-supplied string.
    pub spec: String,
    /// Why it was rejected.
    pub reason: String,
}

impl CommandSpec {
    /// Parses a user-supplied command string.
    ///
    /// Splitting follows shell-word rules, so quoting and escapes work the
    /// way they do on a shell command line: `sed 's/ //g'` yields the
    /// program `sed` with one argument `s/ //g`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandSpecError`] for unbalanced quoting or an empty
    /// string.
    pub fn parse(spec: &str) -> Result<Self, CommandSpecError> {
        let mut tokens = shell_words::split(spec).map_err(|e| CommandSpecError {
            spec: spec.to_string(),
            reason: e.to_string(),
        })?;

        if tokens.is_empty() {
            return Err(CommandSpecError {
                spec: spec.to_string(),
                reason: "empty command".to_string(),
            });
        }

        let program = tokens.remove(0);
        Ok(Self {
            program,
            args: tokens,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_program() {
        let spec = CommandSpec::parse("vimdiff").unwrap();
        assert_eq!(spec.program, "vimdiff");
        assert!(spec.args.is_empty());
    }

    #[test]
    fn test_parse_program_with_args() {
        let spec = CommandSpec::parse("diff -u --color=never").unwrap();
        assert_eq!(spec.program, "diff");
        assert_eq!(spec.args, vec!["-u", "--color=never"]);
    }

    #[test]
    fn test_parse_quoted_argument() {
        let spec = CommandSpec::parse("sed 's/ //g'").unwrap();
        assert_eq!(spec.program, "sed");
        assert_eq!(spec.args, vec!["s/ //g"]);
    }

    #[test]
    fn test_parse_empty_is_error() {
        assert!(CommandSpec::parse("").is_err());
        assert!(CommandSpec::parse("   ").is_err());
    }

    #[test]
    fn test_parse_unbalanced_quote_is_error() {
        assert!(CommandSpec::parse("sort 'oops").is_err());
    }
}
