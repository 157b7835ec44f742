//! Configuration loading and discovery.
//!
//! This module provides configuration file discovery by:
//! 1. Walking up from the current directory to find project config
//! 2. Loading user config from XDG config directory
//! 3. Merging with sensible defaults
//!
//! # Supported formats
//!
//! - TOML (`.toml`)
//! - YAML (`.yaml`, `.yml`)
//! - JSON (`.json`)
//!
//! # Config file locations (in order of precedence, highest first):
//! - `tex-pr-report.<ext>` in current directory or any parent
//! - `.tex-pr-report.<ext>` in current directory or any parent
//! - `~/.config/tex-pr-report/config.<ext>` (user config)
//!
//! Environment variables prefixed with `TEX_PR_REPORT_` override all files.
//!
//! # Example
//! ```no_run
//! use camino::Utf8PathBuf;
//! use tex_pr_report_core::config::ConfigLoader;
//!
//! let cwd = std::env::current_dir().unwrap();
//! let cwd = Utf8PathBuf::try_from(cwd).expect("current directory is not valid UTF-8");
//! let (config, _sources) = ConfigLoader::new()
//!     .with_project_search(&cwd)
//!     .load()
//!     .unwrap();
//! println!("texcount flags: {}", config.texcount_flags);
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Default flags passed to `texcount` inside the container.
pub const DEFAULT_TEXCOUNT_FLAGS: &str = "-freq -merge -stat -dir=/data";

/// Default mount point of the document directory inside the container.
pub const DEFAULT_CONTAINER_DIR: &str = "/data";

/// Default GitHub REST endpoint.
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Default wrapper script name, looked up next to the executable.
pub const DEFAULT_WRAPPER_NAME: &str = "dockercmd.sh";

fn default_grammar_sources() -> Vec<String> {
    vec!["*.tex".to_string(), "*.md".to_string()]
}

/// The configuration for tex-pr-report.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Log level for the application (e.g., "debug", "info", "warn", "error").
    pub log_level: LogLevel,
    /// Directory for JSONL log files. No file logging when unset.
    pub log_dir: Option<Utf8PathBuf>,
    /// Wrapper script that runs texcount in a container.
    ///
    /// Defaults to `dockercmd.sh` next to the executable.
    pub wrapper: Option<Utf8PathBuf>,
    /// Flags passed to texcount ahead of the document path.
    pub texcount_flags: String,
    /// Where the wrapper mounts the document directory inside the container.
    pub container_dir: String,
    /// Base URL of the GitHub REST API.
    pub github_api_url: String,
    /// Glob patterns selecting the files the grammar checker reads.
    pub grammar_sources: Vec<String>,
    /// Include the "Top 10 words" table in the statistics section.
    ///
    /// Off by default; the composed comment has never carried it.
    pub word_frequency: bool,
    /// Maximum size in bytes of a source file handed to the grammar checker
    /// (default: 5 MiB).
    pub max_input_bytes: Option<usize>,
    /// Disable the input size limit entirely.
    pub disable_input_limit: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            log_dir: None,
            wrapper: None,
            texcount_flags: DEFAULT_TEXCOUNT_FLAGS.to_string(),
            container_dir: DEFAULT_CONTAINER_DIR.to_string(),
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            grammar_sources: default_grammar_sources(),
            word_frequency: false,
            max_input_bytes: None,
            disable_input_limit: false,
        }
    }
}

impl Config {
    /// Effective input size limit, honoring `disable_input_limit`.
    pub fn input_limit(&self) -> Option<usize> {
        if self.disable_input_limit {
            None
        } else {
            self.max_input_bytes
                .or(Some(crate::DEFAULT_MAX_INPUT_BYTES))
        }
    }
}

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum LogLevel {
    /// Verbose output for debugging and development.
    Debug,
    /// Standard operational information (default).
    #[default]
    Info,
    /// Warnings about potential issues.
    Warn,
    /// Errors that indicate failures.
    Error,
}

impl LogLevel {
    /// Returns the log level as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Metadata about which configuration sources were loaded.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Project config files found by walking up, ordered low→high precedence.
    pub project_files: Vec<Utf8PathBuf>,
    /// User config file from XDG config directory.
    pub user_file: Option<Utf8PathBuf>,
    /// Explicit config files loaded (e.g., from `--config` flag).
    pub explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigSources {
    /// Returns the highest-precedence config file that was loaded.
    ///
    /// Precedence: explicit files > project files > user file.
    pub fn primary_file(&self) -> Option<&Utf8Path> {
        self.explicit_files
            .last()
            .map(Utf8PathBuf::as_path)
            .or_else(|| self.project_files.last().map(Utf8PathBuf::as_path))
            .or(self.user_file.as_deref())
    }
}

/// Supported configuration file extensions (in order of preference).
const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// Application name for XDG directory lookup and config file names.
const APP_NAME: &str = "tex-pr-report";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "TEX_PR_REPORT_";

/// Builder for loading configuration from multiple sources.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    /// Starting directory for project config search.
    project_search_root: Option<Utf8PathBuf>,
    /// Whether to include user config from XDG directory.
    include_user_config: bool,
    /// Stop searching when we hit a directory containing this file/dir.
    boundary_marker: Option<String>,
    /// Explicit config files to load (for testing or programmatic use).
    explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default settings.
    pub fn new() -> Self {
        Self {
            project_search_root: None,
            include_user_config: true,
            boundary_marker: Some(".git".to_string()),
            explicit_files: Vec::new(),
        }
    }

    /// Set the starting directory for project config search.
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.project_search_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set whether to include user config from `~/.config/tex-pr-report/`.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.include_user_config = include;
        self
    }

    /// Set a boundary marker to stop directory traversal. Default is `.git`.
    pub fn with_boundary_marker<S: Into<String>>(mut self, marker: S) -> Self {
        self.boundary_marker = Some(marker.into());
        self
    }

    /// Disable boundary marker (search all the way to filesystem root).
    pub fn without_boundary_marker(mut self) -> Self {
        self.boundary_marker = None;
        self
    }

    /// Add an explicit config file to load.
    ///
    /// Files are loaded in order, with later files taking precedence.
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.explicit_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Load configuration, merging all discovered sources.
    ///
    /// Precedence (highest to lowest):
    /// 1. `TEX_PR_REPORT_*` environment variables
    /// 2. Explicit files (in order added via `with_file`)
    /// 3. Project config (closest to search root)
    /// 4. User config
    /// 5. Default values
    #[tracing::instrument(skip(self), fields(search_root = ?self.project_search_root))]
    pub fn load(self) -> ConfigResult<(Config, ConfigSources)> {
        tracing::debug!("loading configuration");
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let mut sources = ConfigSources::default();

        if self.include_user_config
            && let Some(user_config) = self.find_user_config()
        {
            figment = Self::merge_file(figment, &user_config);
            sources.user_file = Some(user_config);
        }

        if let Some(ref root) = self.project_search_root {
            let project_configs = self.find_project_configs(root);
            for pc in &project_configs {
                figment = Self::merge_file(figment, pc);
            }
            sources.project_files = project_configs;
        }

        for file in &self.explicit_files {
            figment = Self::merge_file(figment, file);
        }
        sources.explicit_files = self.explicit_files;

        // TEX_PR_REPORT_WRAPPER=/ci/dockercmd.sh, TEX_PR_REPORT_LOG_LEVEL=debug, etc.
        figment = figment.merge(Env::prefixed(ENV_PREFIX).lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        tracing::debug!(
            log_level = config.log_level.as_str(),
            primary = ?sources.primary_file(),
            "configuration loaded"
        );
        Ok((config, sources))
    }

    /// Find project config files by walking up from the given directory.
    ///
    /// Only the closest directory with any match contributes. Dotfiles come
    /// before regular files so the regular file wins on conflicts.
    fn find_project_configs(&self, start: &Utf8Path) -> Vec<Utf8PathBuf> {
        let mut current = Some(start.to_path_buf());

        while let Some(dir) = current {
            let mut found = Vec::new();

            for ext in CONFIG_EXTENSIONS {
                let dotfile = dir.join(format!(".{APP_NAME}.{ext}"));
                if dotfile.is_file() {
                    found.push(dotfile);
                }
            }
            for ext in CONFIG_EXTENSIONS {
                let regular = dir.join(format!("{APP_NAME}.{ext}"));
                if regular.is_file() {
                    found.push(regular);
                }
            }

            if !found.is_empty() {
                return found;
            }

            // Checked after the config files so a config next to the marker is found.
            if let Some(ref marker) = self.boundary_marker
                && dir.join(marker).exists()
            {
                break;
            }

            current = dir.parent().map(Utf8Path::to_path_buf);
        }

        Vec::new()
    }

    /// Find user config in XDG config directory.
    fn find_user_config(&self) -> Option<Utf8PathBuf> {
        let config_dir = user_config_dir()?;

        CONFIG_EXTENSIONS
            .iter()
            .map(|ext| config_dir.join(format!("config.{ext}")))
            .find(|path| path.is_file())
    }

    /// Merge a config file into the figment, detecting format from extension.
    fn merge_file(figment: Figment, path: &Utf8Path) -> Figment {
        match path.extension() {
            Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path.as_str())),
            Some("json") => figment.merge(Json::file_exact(path.as_str())),
            _ => figment.merge(Toml::file_exact(path.as_str())),
        }
    }
}

/// Get the user config directory path.
///
/// Returns `~/.config/tex-pr-report/` on Linux, `~/Library/Application Support/tex-pr-report/`
/// on macOS, and equivalent on other platforms.
pub fn user_config_dir() -> Option<Utf8PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("", "", APP_NAME)?;
    Utf8PathBuf::from_path_buf(proj_dirs.config_dir().to_path_buf()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serializes tests that mutate environment variables via `set_var`/`remove_var`.
    static TEST_ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.log_dir.is_none());
        assert_eq!(config.texcount_flags, DEFAULT_TEXCOUNT_FLAGS);
        assert_eq!(config.container_dir, "/data");
        assert_eq!(config.grammar_sources, vec!["*.tex", "*.md"]);
        assert!(!config.word_frequency);
    }

    #[test]
    fn test_loader_builds_with_defaults() {
        let _lock = TEST_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .load()
            .unwrap();
        assert_eq!(config.github_api_url, DEFAULT_GITHUB_API_URL);
        assert!(sources.primary_file().is_none());
    }

    #[test]
    fn test_single_file_overrides_default() {
        let _lock = TEST_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        fs::write(
            &config_path,
            r#"log_level = "debug"
wrapper = "/ci/dockercmd.sh"
texcount_flags = "-sum -dir=/data"
word_frequency = true
"#,
        )
        .unwrap();
        let config_path = Utf8PathBuf::try_from(config_path).unwrap();

        let (config, _sources) = ConfigLoader::new()
            .with_user_config(false)
            .with_file(&config_path)
            .load()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(
            config.wrapper.as_ref().map(|p| p.as_str()),
            Some("/ci/dockercmd.sh")
        );
        assert_eq!(config.texcount_flags, "-sum -dir=/data");
        assert!(config.word_frequency);
        // untouched fields keep their defaults
        assert_eq!(config.container_dir, "/data");
    }

    #[test]
    fn test_later_file_overrides_earlier() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("base.toml");
        fs::write(&base, r#"log_level = "warn""#).unwrap();
        let over = tmp.path().join("override.yaml");
        fs::write(&over, "log_level: error\n").unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .with_file(Utf8PathBuf::try_from(base).unwrap())
            .with_file(Utf8PathBuf::try_from(over).unwrap())
            .load()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Error);
        assert!(sources.primary_file().unwrap().as_str().ends_with("override.yaml"));
    }

    #[test]
    fn test_project_config_discovery() {
        let _lock = TEST_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let tmp = TempDir::new().unwrap();
        let project_dir = tmp.path().join("project");
        let sub_dir = project_dir.join("chapters").join("deep");
        fs::create_dir_all(&sub_dir).unwrap();
        fs::write(
            project_dir.join(".tex-pr-report.json"),
            r#"{"container_dir": "/work"}"#,
        )
        .unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .with_project_search(Utf8PathBuf::try_from(sub_dir).unwrap())
            .load()
            .unwrap();

        assert_eq!(config.container_dir, "/work");
        assert_eq!(sources.project_files.len(), 1);
    }

    #[test]
    fn test_boundary_marker_stops_search() {
        let tmp = TempDir::new().unwrap();
        let parent = tmp.path().join("parent");
        let child = parent.join("child");
        let work = child.join("work");
        fs::create_dir_all(&work).unwrap();
        fs::write(parent.join(".tex-pr-report.toml"), r#"log_level = "warn""#).unwrap();
        fs::create_dir(child.join(".git")).unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .with_boundary_marker(".git")
            .with_project_search(Utf8PathBuf::try_from(work).unwrap())
            .load()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Info);
        assert!(sources.project_files.is_empty());
    }

    #[test]
    fn regular_file_beats_dotfile() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".tex-pr-report.toml"), r#"log_level = "debug""#).unwrap();
        fs::write(tmp.path().join("tex-pr-report.toml"), r#"log_level = "error""#).unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .with_project_search(Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap())
            .load()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Error);
        assert_eq!(sources.project_files.len(), 2);
    }

    #[test]
    fn boundary_marker_in_start_directory_stops_search() {
        let tmp = TempDir::new().unwrap();
        let repo = tmp.path().join("repo");
        fs::create_dir_all(repo.join(".git")).unwrap();
        fs::write(tmp.path().join(".tex-pr-report.toml"), r#"log_level = "warn""#).unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .with_boundary_marker(".git")
            .with_project_search(Utf8PathBuf::try_from(repo).unwrap())
            .load()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Info);
        assert!(sources.project_files.is_empty());
    }

    #[test]
    fn config_next_to_marker_in_start_directory_is_found() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join(".git")).unwrap();
        fs::write(tmp.path().join("tex-pr-report.toml"), r#"log_level = "error""#).unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .with_boundary_marker(".git")
            .with_project_search(Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap())
            .load()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Error);
        assert_eq!(sources.project_files.len(), 1);
    }

    #[test]
    fn input_limit_defaults_and_can_be_disabled() {
        let mut config = Config::default();
        assert_eq!(config.input_limit(), Some(crate::DEFAULT_MAX_INPUT_BYTES));
        config.max_input_bytes = Some(1024);
        assert_eq!(config.input_limit(), Some(1024));
        config.disable_input_limit = true;
        assert_eq!(config.input_limit(), None);
    }

    #[test]
    fn grammar_sources_deserialize_from_yaml() {
        let yaml = "grammar_sources:\n  - \"*.ltx\"\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.grammar_sources, vec!["*.ltx"]);
    }

    #[test]
    #[allow(unsafe_code)]
    fn test_env_var_overrides_file_config() {
        let _lock = TEST_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        fs::write(&config_path, "container_dir = \"/mnt\"\n").unwrap();

        // SAFETY: Test environment: the mutex serializes env access across tests.
        unsafe {
            std::env::set_var("TEX_PR_REPORT_CONTAINER_DIR", "/srv");
        }

        let result = ConfigLoader::new()
            .with_user_config(false)
            .with_file(Utf8PathBuf::try_from(config_path).unwrap())
            .load();

        // SAFETY: Cleanup after test.
        unsafe {
            std::env::remove_var("TEX_PR_REPORT_CONTAINER_DIR");
        }

        let (config, _sources) = result.unwrap();
        assert_eq!(config.container_dir, "/srv");
    }
}
