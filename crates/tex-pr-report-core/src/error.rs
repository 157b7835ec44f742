//! Error types for tex-pr-report-core.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while running the external counting tool.
#[derive(Error, Debug)]
pub enum ToolError {
    /// The wrapper command could not be started.
    #[error("failed to launch {command}: {source}")]
    Spawn {
        /// The wrapper command that was invoked.
        command: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The wrapper ran but reported failure.
    #[error("{command} exited with {status}")]
    Failed {
        /// The wrapper command that was invoked.
        command: Utf8PathBuf,
        /// Exit status as reported by the OS.
        status: std::process::ExitStatus,
    },

    /// Standard output was not valid UTF-8.
    #[error("{command} produced output that is not valid UTF-8")]
    InvalidOutput {
        /// The wrapper command that was invoked.
        command: Utf8PathBuf,
        /// Underlying decode error.
        source: std::string::FromUtf8Error,
    },
}

/// Result type alias using [`ToolError`].
pub type ToolResult<T> = Result<T, ToolError>;

/// Errors raised by the built-in grammar checker.
#[derive(Error, Debug)]
pub enum GrammarError {
    /// The document directory could not be listed.
    #[error("failed to read directory {path}: {source}")]
    ReadDir {
        /// Directory that was scanned.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A source file could not be read.
    #[error("failed to read {path}: {source}")]
    ReadFile {
        /// File that was read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configured source glob is malformed.
    #[error("invalid source pattern {pattern:?}: {source}")]
    Pattern {
        /// The offending glob.
        pattern: String,
        /// Underlying glob error.
        source: globset::Error,
    },
}

/// Result type alias using [`GrammarError`].
pub type GrammarResult<T> = Result<T, GrammarError>;

/// Errors parsing command-line values that identify the pull request.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ArgumentError {
    /// Repository slug was not of the form `owner/repo`.
    #[error("invalid repository slug {0:?}: expected owner/repo")]
    RepoSlug(String),

    /// Pull request identifier was neither a number nor `false`.
    #[error("invalid pull request id {0:?}: expected a number or \"false\"")]
    PullRequest(String),
}
