//! Conventional commit classification.
//!
//! Recognizes subjects of the form `type(scope): description` where `type`
//! belongs to an explicit [`CommitTypes`] set. Anything else is reported as
//! unrecognized and left for the caller to drop.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

use super::format::Category;

/// Commit types recognized when no configuration overrides them.
pub const DEFAULT_COMMIT_TYPES: &[&str] = &[
    "fix", "feat", "build", "ci", "docs", "perf", "refactor", "revert", "style", "test",
];

/// The ordered set of conventional commit types a [`Classifier`] accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitTypes(Vec<String>);

impl CommitTypes {
    /// Build a type set, rejecting empty sets and names that are not
    /// lowercase ASCII letters, digits or `-`.
    pub fn new<I, S>(types: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let types: Vec<String> = types.into_iter().map(Into::into).collect();
        let set = Self(types);
        set.validate()?;
        Ok(set)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.0.is_empty() {
            return Err(ConfigError::EmptyCommitTypes);
        }
        for name in &self.0 {
            let valid = !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
            if !valid {
                return Err(ConfigError::InvalidCommitType(name.clone()));
            }
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for CommitTypes {
    fn default() -> Self {
        Self(DEFAULT_COMMIT_TYPES.iter().map(|t| t.to_string()).collect())
    }
}

/// A subject that matched the conventional grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedCommit {
    pub category: Category,
    pub commit_type: String,
    pub scope: Option<String>,
    /// Description with the `type(scope): ` prefix removed and trimmed.
    pub description: String,
}

/// Classifies commit subjects against a fixed set of commit types.
#[derive(Debug, Clone)]
pub struct Classifier {
    pattern: Regex,
}

impl Classifier {
    pub fn new(types: CommitTypes) -> Result<Self, ConfigError> {
        types.validate()?;

        let alternation = types
            .iter()
            .map(regex_lite::escape)
            .collect::<Vec<_>>()
            .join("|");
        let pattern = format!(r"^({alternation})(?:\(([A-Za-z0-9-]*)\))?:[ \t]+(\S.*)$");

        // Names are validated and escaped, so compilation only fails on a bug here.
        let pattern = Regex::new(&pattern)
            .map_err(|_| ConfigError::InvalidCommitType(alternation.clone()))?;

        Ok(Self { pattern })
    }

    /// Classify a single commit subject.
    ///
    /// Returns `None` when the subject does not follow the grammar or uses a
    /// type outside the configured set.
    pub fn classify(&self, subject: &str) -> Option<ClassifiedCommit> {
        let subject = subject.trim();
        let caps = self.pattern.captures(subject)?;

        let commit_type = caps.get(1)?.as_str().to_string();
        let scope = caps
            .get(2)
            .map(|m| m.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let description = caps.get(3)?.as_str().trim().to_string();

        let category = match commit_type.as_str() {
            "feat" => Category::Feature,
            "fix" => Category::BugFix,
            _ => Category::Other,
        };

        Some(ClassifiedCommit {
            category,
            commit_type,
            scope,
            description,
        })
    }
}

impl Default for Classifier {
    fn default() -> Self {
        // The built-in type list always passes validation.
        Self::new(CommitTypes::default()).expect("default commit types are valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_feat() {
        let c = Classifier::default().classify("feat: add login").unwrap();
        assert_eq!(c.category, Category::Feature);
        assert_eq!(c.commit_type, "feat");
        assert_eq!(c.scope, None);
        assert_eq!(c.description, "add login");
    }

    #[test]
    fn test_classify_fix_with_scope_strips_scope() {
        let c = Classifier::default()
            .classify("fix(auth-api): null pointer")
            .unwrap();
        assert_eq!(c.category, Category::BugFix);
        assert_eq!(c.scope.as_deref(), Some("auth-api"));
        assert_eq!(c.description, "null pointer");
    }

    #[test]
    fn test_classify_other_recognized_type() {
        let c = Classifier::default().classify("docs: update readme").unwrap();
        assert_eq!(c.category, Category::Other);
        assert_eq!(c.description, "update readme");
    }

    #[test]
    fn test_classify_trims_whitespace() {
        let c = Classifier::default()
            .classify("  perf(db):   faster lookups  \n")
            .unwrap();
        assert_eq!(c.category, Category::Other);
        assert_eq!(c.description, "faster lookups");
    }

    #[test]
    fn test_classify_empty_scope_is_accepted() {
        let c = Classifier::default().classify("feat(): thing").unwrap();
        assert_eq!(c.scope, None);
        assert_eq!(c.description, "thing");
    }

    #[test]
    fn test_unrecognized_subjects() {
        let classifier = Classifier::default();
        for subject in [
            "updated readme",
            "WIP",
            "chore: bump deps",
            "Feat: capitalized type",
            "feat!: breaking marker",
            "feat(auth/oauth): slash in scope",
            "feat:",
            "feat:   ",
            "feat:nospace",
            "fix(ui):missing space",
            "featx: unknown prefix",
        ] {
            assert!(
                classifier.classify(subject).is_none(),
                "expected '{}' to be unrecognized",
                subject
            );
        }
    }

    #[test]
    fn test_custom_types() {
        let types = CommitTypes::new(["feat", "fix", "chore"]).unwrap();
        let classifier = Classifier::new(types).unwrap();

        let c = classifier.classify("chore: bump deps").unwrap();
        assert_eq!(c.category, Category::Other);
        assert!(classifier.classify("docs: nope").is_none());
    }

    #[test]
    fn test_commit_types_validation() {
        assert!(matches!(
            CommitTypes::new(Vec::<String>::new()),
            Err(ConfigError::EmptyCommitTypes)
        ));
        assert!(matches!(
            CommitTypes::new(["feat", "Bad Type"]),
            Err(ConfigError::InvalidCommitType(name)) if name == "Bad Type"
        ));
        assert!(CommitTypes::new(["feat", "hot-fix", "v2"]).is_ok());
    }

    #[test]
    fn test_default_types_match_builtin_list() {
        let types = CommitTypes::default();
        assert_eq!(types.iter().collect::<Vec<_>>(), DEFAULT_COMMIT_TYPES);
        assert!(!types.iter().any(|t| t == "chore"));
    }
}
