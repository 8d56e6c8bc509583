//! Commit subject listing.

use git2::{Oid, Repository, Sort};
use tracing::warn;

use crate::error::GitError;

/// List commit subjects in the range `from..to`, newest first.
///
/// The subject is the first paragraph of the message with whitespace
/// squashed, matching `git log --pretty=format:%s`. Commits with an empty
/// subject are left out. Subjects that are not valid UTF-8 are decoded
/// lossily and logged.
pub fn list_commit_subjects(
    repo: &Repository,
    from_oid: Oid,
    to_oid: Oid,
) -> Result<Vec<String>, GitError> {
    let mut revwalk = repo.revwalk().map_err(GitError::RevwalkError)?;

    revwalk
        .set_sorting(Sort::TOPOLOGICAL | Sort::TIME)
        .map_err(GitError::RevwalkError)?;
    revwalk.push(to_oid).map_err(GitError::RevwalkError)?;
    revwalk.hide(from_oid).map_err(GitError::RevwalkError)?;

    let mut subjects = Vec::new();

    for oid_result in revwalk {
        let oid = oid_result.map_err(GitError::RevwalkError)?;
        let commit = repo.find_commit(oid).map_err(GitError::ParseCommit)?;

        let Some(bytes) = commit.summary_bytes() else {
            continue;
        };
        let subject = match std::str::from_utf8(bytes) {
            Ok(subject) => subject.to_string(),
            Err(_) => {
                warn!("Commit {} has a subject that is not valid UTF-8", oid);
                String::from_utf8_lossy(bytes).into_owned()
            }
        };

        let subject = subject.trim();
        if !subject.is_empty() {
            subjects.push(subject.to_string());
        }
    }

    Ok(subjects)
}
