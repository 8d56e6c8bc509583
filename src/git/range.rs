//! Reference resolution.

use git2::{Oid, Repository};

use crate::error::GitError;

/// Resolve a reference (tag, branch, commit hash) to a commit OID.
pub fn resolve_reference(repo: &Repository, reference: &str) -> Result<Oid, GitError> {
    // Try as a direct OID first
    if let Ok(oid) = Oid::from_str(reference) {
        if repo.find_commit(oid).is_ok() {
            return Ok(oid);
        }
    }

    // Try as a reference (branch or tag)
    let obj = repo
        .revparse_single(reference)
        .map_err(|e| GitError::ReferenceNotFound(reference.to_string(), e))?;

    Ok(obj.peel_to_commit().map_err(GitError::ParseCommit)?.id())
}
