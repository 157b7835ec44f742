//! Running `texcount` and turning its report into Markdown.
//!
//! - [`TexCount`] runs the counter through a container wrapper script
//! - [`parse`] splits the raw report into its sections
//! - [`tables`] renders each section as a Markdown table

pub mod parse;
pub mod tables;

use std::process::{Command, Stdio};

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, instrument};

use crate::config::{Config, DEFAULT_CONTAINER_DIR, DEFAULT_TEXCOUNT_FLAGS};
use crate::error::{ToolError, ToolResult};

pub use parse::{Sections, render_statistics, split_sections};

/// Invokes `texcount` through a wrapper that runs it inside a container.
///
/// The wrapper receives a single argument holding the full texcount command
/// line and is started in the document directory, which it is expected to
/// mount at [`container_dir`](Self::container_dir).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TexCount {
    wrapper: Utf8PathBuf,
    flags: String,
    container_dir: String,
}

impl TexCount {
    /// Create an invoker with the default flags and mount point.
    pub fn new(wrapper: impl Into<Utf8PathBuf>) -> Self {
        Self {
            wrapper: wrapper.into(),
            flags: DEFAULT_TEXCOUNT_FLAGS.to_string(),
            container_dir: DEFAULT_CONTAINER_DIR.to_string(),
        }
    }

    /// Create an invoker using the flags and mount point from `config`.
    pub fn from_config(wrapper: impl Into<Utf8PathBuf>, config: &Config) -> Self {
        Self::new(wrapper)
            .with_flags(config.texcount_flags.clone())
            .with_container_dir(config.container_dir.clone())
    }

    /// Replace the texcount flags.
    pub fn with_flags(mut self, flags: impl Into<String>) -> Self {
        self.flags = flags.into();
        self
    }

    /// Replace the container mount point.
    pub fn with_container_dir(mut self, dir: impl Into<String>) -> Self {
        self.container_dir = dir.into();
        self
    }

    /// Path of the wrapper script.
    pub fn wrapper(&self) -> &Utf8Path {
        &self.wrapper
    }

    /// Mount point of the document directory inside the container.
    pub fn container_dir(&self) -> &str {
        &self.container_dir
    }

    /// The single argument handed to the wrapper for `filename`.
    pub fn command_line(&self, filename: &str) -> String {
        let dir = self.container_dir.trim_end_matches('/');
        format!("texcount {} {dir}/{filename}", self.flags)
    }

    /// Run texcount on `filename` inside `directory` and return its stdout.
    ///
    /// Blocks until the wrapper exits. Stderr is passed through untouched.
    #[instrument(skip(self), fields(wrapper = %self.wrapper))]
    pub fn run(&self, directory: &Utf8Path, filename: &str) -> ToolResult<String> {
        let command_line = self.command_line(filename);
        debug!(%command_line, "running texcount");

        let output = Command::new(self.wrapper.as_std_path())
            .arg(&command_line)
            .current_dir(directory.as_std_path())
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| ToolError::Spawn {
                command: self.wrapper.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ToolError::Failed {
                command: self.wrapper.clone(),
                status: output.status,
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|source| ToolError::InvalidOutput {
            command: self.wrapper.clone(),
            source,
        })?;
        debug!(bytes = stdout.len(), "texcount finished");
        Ok(stdout)
    }
}
