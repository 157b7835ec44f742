//! Core library for tex-pr-report.
//!
//! Everything needed to turn a LaTeX document into a pull-request comment,
//! short of talking to GitHub.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//! - [`texcount`] - Running texcount and rendering its report as Markdown
//! - [`grammar`] - Grammar checking of the document sources
//! - [`pull_request`] - Repository slug and pull-request argument parsing
//! - [`report`] - Composing the comment body
//!
//! # Quick Start
//!
//! ```no_run
//! use tex_pr_report_core::texcount::render_statistics;
//!
//! let raw = std::fs::read_to_string("texcount.txt").unwrap();
//! println!("{}", render_statistics(&raw, false));
//! ```
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod grammar;
pub mod pull_request;
pub mod report;
pub mod texcount;

pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};
pub use error::{ArgumentError, ConfigError, ConfigResult, GrammarError, ToolError};
pub use pull_request::{PullRequestArg, RepoSlug};
pub use report::{DocumentTarget, compose_comment};

/// Default size limit for source files read by the grammar checker (5 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;
