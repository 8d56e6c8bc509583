//! Optional `changelog.toml` configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::changelog::classify::CommitTypes;
use crate::error::ConfigError;

/// File looked up in the current directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "changelog.toml";

fn default_markdown_file() -> PathBuf {
    PathBuf::from("CHANGELOG.md")
}

fn default_html_file() -> PathBuf {
    PathBuf::from("release-notes.html")
}

/// Settings for a changelog run. Every key is optional.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Application name shown in the HTML page. Defaults to the repository
    /// directory name.
    #[serde(default)]
    pub app_name: Option<String>,

    /// Markdown changelog, relative to the output root.
    #[serde(default = "default_markdown_file")]
    pub markdown_file: PathBuf,

    /// HTML release notes, relative to the output root.
    #[serde(default = "default_html_file")]
    pub html_file: PathBuf,

    /// Page template overriding the bundled one.
    #[serde(default)]
    pub html_template: Option<PathBuf>,

    #[serde(default)]
    pub commit_types: CommitTypes,

    /// Copy each output file to `<file>.bak` before overwriting it.
    #[serde(default)]
    pub backup: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: None,
            markdown_file: default_markdown_file(),
            html_file: default_html_file(),
            html_template: None,
            commit_types: CommitTypes::default(),
            backup: false,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.commit_types.validate()
    }

    /// Parse and validate configuration text.
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|source| ConfigError::ParseFailed {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }
}

/// Load configuration.
///
/// Uses `path` when given, otherwise `changelog.toml` in `search_dir` if it
/// exists, otherwise the defaults.
pub fn load_config(path: Option<&Path>, search_dir: &Path) -> Result<Config, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let candidate = search_dir.join(DEFAULT_CONFIG_FILE);
            if !candidate.is_file() {
                debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                return Ok(Config::default());
            }
            candidate
        }
    };

    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::ReadFailed {
        path: path.clone(),
        source,
    })?;

    debug!(path = %path.display(), "Loading config");
    Config::from_toml(&content, &path)
}
