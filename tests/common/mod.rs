//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use changelog_gen::ReleaseMeta;
use git2::{Oid, Repository, Signature};

/// Get the path to test fixtures directory.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Get the path to a Markdown changelog fixture.
pub fn changelog_fixture(name: &str) -> PathBuf {
    fixtures_dir().join("changelogs").join(name)
}

/// Get the path to an HTML release-notes fixture.
pub fn release_notes_fixture(name: &str) -> PathBuf {
    fixtures_dir().join("release-notes").join(name)
}

/// Read a fixture file as a string.
pub fn read_fixture(path: PathBuf) -> String {
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {:?}: {}", path, e))
}

/// Copy a fixture into `dir` under `name` and return the new path.
pub fn copy_fixture(fixture: PathBuf, dir: &Path, name: &str) -> PathBuf {
    let target = dir.join(name);
    std::fs::copy(&fixture, &target)
        .unwrap_or_else(|e| panic!("Failed to copy fixture {:?}: {}", fixture, e));
    target
}

/// Create a temporary directory for test output.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Release metadata with a fixed date.
pub fn meta(version: &str) -> ReleaseMeta {
    ReleaseMeta {
        app_name: "Shop".to_string(),
        version: version.to_string(),
        release_date: "2024-05-01".to_string(),
    }
}

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Get the test signature for commits.
    fn signature(&self) -> Signature<'_> {
        Signature::now("Test User", "test@example.com").expect("Failed to create signature")
    }

    /// Create a commit with the given message. Returns the commit OID.
    pub fn commit(&self, message: &str) -> Oid {
        let sig = self.signature();

        // Touch a file so every commit has a distinct tree
        let file_path = self.dir.path().join("history.txt");
        let mut content = std::fs::read_to_string(&file_path).unwrap_or_default();
        content.push_str(message);
        content.push('\n');
        std::fs::write(&file_path, content).expect("Failed to write test file");

        let mut index = self.repo.index().expect("Failed to get index");
        index
            .add_path(Path::new("history.txt"))
            .expect("Failed to add file");
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Create a lightweight tag pointing to the given OID.
    pub fn tag_lightweight(&self, name: &str, oid: Oid) {
        let obj = self
            .repo
            .find_object(oid, None)
            .expect("Failed to find object");
        self.repo
            .tag_lightweight(name, &obj, false)
            .expect("Failed to create lightweight tag");
    }

    /// Create an annotated tag pointing to the given OID.
    pub fn tag_annotated(&self, name: &str, oid: Oid, message: &str) {
        let sig = self.signature();
        let obj = self
            .repo
            .find_object(oid, None)
            .expect("Failed to find object");
        self.repo
            .tag(name, &obj, &sig, message, false)
            .expect("Failed to create annotated tag");
    }

    /// Build the usual two-release history:
    /// `v1.0` on an initial commit, then three commits tagged `v1.1`.
    pub fn with_release() -> Self {
        let repo = Self::new();
        let base = repo.commit("feat: initial import");
        repo.tag_lightweight("v1.0", base);

        repo.commit("feat: add login");
        repo.commit("fix: null pointer");
        let head = repo.commit("chore: bump deps");
        repo.tag_annotated("v1.1", head, "Release v1.1");
        repo
    }
}
