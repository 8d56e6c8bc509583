//! Git operations using git2-rs.
//!
//! Everything the workflow needs from a repository goes through the
//! [`RepositoryDriver`] trait. Each call names the repository path
//! explicitly; nothing depends on the process working directory.

pub mod commits;
pub mod range;
pub mod tags;

use std::path::Path;

use git2::Repository;
use tracing::debug;

use crate::error::GitError;

pub use commits::list_commit_subjects;
pub use range::resolve_reference;
pub use tags::{TagInfo, get_all_tags, get_version_from_tag, sort_tags};

/// Tag and commit access for a repository at a given path.
#[cfg_attr(test, mockall::automock)]
pub trait RepositoryDriver {
    /// All tag names, oldest release first. Fails when there are none.
    fn list_tags(&self, path: &Path) -> Result<Vec<String>, GitError>;

    /// Subjects of commits reachable from `to_ref` but not from `from_ref`,
    /// newest first.
    fn list_commits(
        &self,
        path: &Path,
        from_ref: &str,
        to_ref: &str,
    ) -> Result<Vec<String>, GitError>;

    /// Create a lightweight tag at `HEAD`.
    fn create_tag(&self, path: &Path, name: &str) -> Result<(), GitError>;

    fn tag_exists(&self, path: &Path, name: &str) -> Result<bool, GitError>;
}

/// [`RepositoryDriver`] backed by libgit2.
#[derive(Debug, Default, Clone, Copy)]
pub struct Git2Driver;

impl Git2Driver {
    pub fn new() -> Self {
        Self
    }
}

/// Open the repository containing `path`.
pub fn open_repository(path: &Path) -> Result<Repository, GitError> {
    Repository::discover(path).map_err(|source| GitError::OpenRepository {
        path: path.to_path_buf(),
        source,
    })
}

impl RepositoryDriver for Git2Driver {
    fn list_tags(&self, path: &Path) -> Result<Vec<String>, GitError> {
        let repo = open_repository(path)?;
        let tags = get_all_tags(&repo)?;

        if tags.is_empty() {
            return Err(GitError::NoTags(path.to_path_buf()));
        }

        let sorted = sort_tags(tags);
        debug!(path = %path.display(), count = sorted.len(), "Listed tags");
        Ok(sorted)
    }

    fn list_commits(
        &self,
        path: &Path,
        from_ref: &str,
        to_ref: &str,
    ) -> Result<Vec<String>, GitError> {
        let repo = open_repository(path)?;
        let from = resolve_reference(&repo, from_ref)?;
        let to = resolve_reference(&repo, to_ref)?;

        let subjects = list_commit_subjects(&repo, from, to)?;
        debug!(
            path = %path.display(),
            from = from_ref,
            to = to_ref,
            count = subjects.len(),
            "Listed commits"
        );
        Ok(subjects)
    }

    fn create_tag(&self, path: &Path, name: &str) -> Result<(), GitError> {
        let repo = open_repository(path)?;
        tags::create_tag(&repo, name)
    }

    fn tag_exists(&self, path: &Path, name: &str) -> Result<bool, GitError> {
        let repo = open_repository(path)?;
        tags::tag_exists(&repo, name)
    }
}
