//! Error types for changelog-gen modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error(
        "{} is not a valid git repository. Make sure the path points inside a git work tree: {source}",
        path.display()
    )]
    OpenRepository {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("No tags found in repository {}", .0.display())]
    NoTags(PathBuf),

    #[error("Failed to find reference '{0}': {1}")]
    ReferenceNotFound(String, #[source] git2::Error),

    #[error("Failed to parse commit: {0}")]
    ParseCommit(#[source] git2::Error),

    #[error("Failed to walk commit history: {0}")]
    RevwalkError(#[source] git2::Error),

    #[error("Tag '{0}' already exists")]
    TagAlreadyExists(String),

    #[error("Failed to create tag '{0}': {1}")]
    CreateTag(String, #[source] git2::Error),
}

/// Errors from changelog and release-notes operations.
#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("Failed to read {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create backup of {}: {source}", path.display())]
    BackupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read HTML template {}: {source}", path.display())]
    TemplateReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTML template is missing the {{{{Changelog}}}} placeholder")]
    InvalidTemplate,

    #[error(
        "HTML template must place {{{{Changelog}}}} inside <div class=\"notes-container\"> so later runs keep earlier releases"
    )]
    ChangelogOutsideContainer,
}

/// Errors from interactive prompts.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Prompt failed: {0}")]
    Interaction(#[from] dialoguer::Error),

    #[error("'{0}' needs an answer but prompts are disabled (--yes)")]
    NonInteractive(String),
}

/// Errors from loading `changelog.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {}: {source}", path.display())]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("commit_types must list at least one type")]
    EmptyCommitTypes,

    #[error(
        "Invalid commit type '{0}': only lowercase ASCII letters, digits and '-' are allowed"
    )]
    InvalidCommitType(String),
}

/// Workflow errors.
///
/// Inside the per-repository loop these are recorded and the run moves on to
/// the next repository. Returned from `run` they abort the whole run.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Changelog(#[from] ChangelogError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Cancelled by user")]
    Cancelled,
}
