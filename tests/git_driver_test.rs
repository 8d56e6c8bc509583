//! Integration tests for the git2-backed repository driver.

mod common;

use changelog_gen::{Git2Driver, GitError, RepositoryDriver};
use common::TestRepo;

#[test]
fn test_list_tags_orders_releases_last() {
    let repo = TestRepo::new();
    let first = repo.commit("feat: first");
    repo.tag_lightweight("v1.10.0", first);
    repo.tag_lightweight("v1.2.0", first);
    repo.tag_lightweight("nightly", first);
    repo.tag_annotated("v1.9.0", first, "annotated");

    let tags = Git2Driver::new().list_tags(repo.path()).unwrap();

    assert_eq!(tags, vec!["nightly", "v1.2.0", "v1.9.0", "v1.10.0"]);
}

#[test]
fn test_list_tags_without_tags_fails() {
    let repo = TestRepo::new();
    repo.commit("feat: first");

    let err = Git2Driver::new().list_tags(repo.path()).unwrap_err();
    assert!(matches!(err, GitError::NoTags(path) if path == repo.path()));
}

#[test]
fn test_list_tags_outside_repository_fails() {
    let dir = common::temp_test_dir();
    let missing = dir.path().join("not-a-repo");

    let err = Git2Driver::new().list_tags(&missing).unwrap_err();
    assert!(matches!(err, GitError::OpenRepository { .. }));
}

#[test]
fn test_list_commits_newest_first_between_tags() {
    let repo = TestRepo::with_release();

    let subjects = Git2Driver::new()
        .list_commits(repo.path(), "v1.0", "v1.1")
        .unwrap();

    assert_eq!(
        subjects,
        vec!["chore: bump deps", "fix: null pointer", "feat: add login"]
    );
}

#[test]
fn test_list_commits_uses_subject_line_only() {
    let repo = TestRepo::new();
    let base = repo.commit("feat: base");
    repo.tag_lightweight("v1.0", base);
    let head = repo.commit("fix: short subject\n\nLonger body that explains\nthe change.");
    repo.tag_lightweight("v1.1", head);

    let subjects = Git2Driver::new()
        .list_commits(repo.path(), "v1.0", "v1.1")
        .unwrap();

    assert_eq!(subjects, vec!["fix: short subject"]);
}

#[test]
fn test_list_commits_same_tag_is_empty() {
    let repo = TestRepo::with_release();

    let subjects = Git2Driver::new()
        .list_commits(repo.path(), "v1.1", "v1.1")
        .unwrap();

    assert!(subjects.is_empty());
}

#[test]
fn test_list_commits_unknown_reference() {
    let repo = TestRepo::with_release();

    let err = Git2Driver::new()
        .list_commits(repo.path(), "v0.1", "v1.1")
        .unwrap_err();
    assert!(matches!(err, GitError::ReferenceNotFound(name, _) if name == "v0.1"));
}

#[test]
fn test_create_tag_at_head() {
    let repo = TestRepo::with_release();
    let head = repo.commit("feat: unreleased work");
    let driver = Git2Driver::new();

    assert!(!driver.tag_exists(repo.path(), "v1.2").unwrap());
    driver.create_tag(repo.path(), "v1.2").unwrap();
    assert!(driver.tag_exists(repo.path(), "v1.2").unwrap());

    let tagged = repo
        .repo
        .revparse_single("v1.2")
        .unwrap()
        .peel_to_commit()
        .unwrap();
    assert_eq!(tagged.id(), head);

    let tags = driver.list_tags(repo.path()).unwrap();
    assert_eq!(tags.last().map(String::as_str), Some("v1.2"));

    let subjects = driver.list_commits(repo.path(), "v1.1", "v1.2").unwrap();
    assert_eq!(subjects, vec!["feat: unreleased work"]);
}

#[test]
fn test_create_existing_tag_is_rejected() {
    let repo = TestRepo::with_release();

    let err = Git2Driver::new()
        .create_tag(repo.path(), "v1.1")
        .unwrap_err();
    assert!(matches!(err, GitError::TagAlreadyExists(name) if name == "v1.1"));
}

#[test]
fn test_tag_exists_with_invalid_name() {
    let repo = TestRepo::with_release();
    assert!(!Git2Driver::new().tag_exists(repo.path(), "bad..name").unwrap());
}
