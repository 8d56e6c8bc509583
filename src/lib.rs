//! changelog-gen - generates a Markdown changelog and HTML release notes from
//! conventional commits between two tags.
//!
//! # Overview
//!
//! For each repository the operator picks a tag range and the commits to
//! keep. Subjects are classified into Features, Bug Fixes and Other Changes,
//! and the new release section is prepended to `CHANGELOG.md` and to the
//! sections of an existing `release-notes.html` page.

pub mod changelog;
pub mod config;
pub mod error;
pub mod git;
pub mod prompt;
pub mod workflow;

// Re-export commonly used types
pub use changelog::{Category, ChangelogSection, Classifier, CommitSource, CommitTypes, ReleaseMeta};
pub use config::{Config, load_config};
pub use error::{ChangelogError, ConfigError, GitError, PromptError, WorkflowError};
pub use git::{Git2Driver, RepositoryDriver};
pub use prompt::{AutoPrompter, Prompter, TerminalPrompter};
pub use workflow::{RunSummary, SkippedRepository, WorkflowOptions};
