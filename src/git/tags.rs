//! Tag enumeration, ordering and creation.

use std::cmp::Ordering;

use git2::{ErrorCode, Repository};
use semver::Version;
use tracing::{info, warn};

use crate::error::GitError;

/// A git tag with optional semver version.
#[derive(Debug, Clone)]
pub struct TagInfo {
    pub name: String,
    pub version: Option<Version>,
}

impl TagInfo {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let version = get_version_from_tag(&name);
        Self { name, version }
    }
}

/// Get all tags from the repository, in no particular order.
pub fn get_all_tags(repo: &Repository) -> Result<Vec<TagInfo>, GitError> {
    let mut tags = Vec::new();

    repo.tag_foreach(|oid, name_bytes| {
        if let Ok(name_str) = std::str::from_utf8(name_bytes) {
            // Remove refs/tags/ prefix
            let name = name_str.strip_prefix("refs/tags/").unwrap_or(name_str);
            tags.push(TagInfo::new(name));
        } else {
            warn!("Skipping tag with OID {} - name is not valid UTF-8", oid);
        }
        true // Continue iteration
    })
    .map_err(GitError::RevwalkError)?;

    Ok(tags)
}

/// Extract semver version from a tag name.
/// Handles both "v1.2.3" and "1.2.3" formats.
pub fn get_version_from_tag(tag_name: &str) -> Option<Version> {
    let version_str = tag_name.strip_prefix('v').unwrap_or(tag_name);
    Version::parse(version_str).ok()
}

/// Order tags so the most recent release comes last and return their names.
///
/// Tags without a semver version sort first, lexically; semver tags follow in
/// ascending version order.
pub fn sort_tags(mut tags: Vec<TagInfo>) -> Vec<String> {
    tags.sort_by(|a, b| match (&a.version, &b.version) {
        (Some(va), Some(vb)) => va.cmp(vb).then_with(|| a.name.cmp(&b.name)),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => a.name.cmp(&b.name),
    });

    tags.into_iter().map(|tag| tag.name).collect()
}

/// Check whether `refs/tags/<name>` exists.
pub fn tag_exists(repo: &Repository, name: &str) -> Result<bool, GitError> {
    match repo.find_reference(&format!("refs/tags/{}", name)) {
        Ok(_) => Ok(true),
        Err(e) if matches!(e.code(), ErrorCode::NotFound | ErrorCode::InvalidSpec) => Ok(false),
        Err(e) => Err(GitError::ReferenceNotFound(name.to_string(), e)),
    }
}

/// Create a lightweight tag pointing at the commit `HEAD` resolves to.
pub fn create_tag(repo: &Repository, name: &str) -> Result<(), GitError> {
    if tag_exists(repo, name)? {
        return Err(GitError::TagAlreadyExists(name.to_string()));
    }

    let head = repo
        .head()
        .map_err(|e| GitError::ReferenceNotFound("HEAD".to_string(), e))?;
    let commit = head.peel_to_commit().map_err(GitError::ParseCommit)?;

    repo.tag_lightweight(name, commit.as_object(), false)
        .map_err(|e| GitError::CreateTag(name.to_string(), e))?;

    info!(tag = %name, commit = %commit.id(), "Created tag");
    Ok(())
}
