//! Read existing output documents.

use std::io::ErrorKind;
use std::path::Path;

use scraper::{Html, Selector};

use crate::error::ChangelogError;

/// CSS selector for the element holding all previous release sections.
pub const NOTES_CONTAINER_SELECTOR: &str = "div.notes-container";

/// Read an output document if it exists.
///
/// A missing file is not an error: it means nothing has been generated yet.
pub fn read_document(path: &Path) -> Result<Option<String>, ChangelogError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ChangelogError::ReadFailed {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Extract the release sections of an existing release-notes page.
///
/// Returns the serialized children of the first `<div class="notes-container">`,
/// or `None` when the document has no such container.
pub fn extract_prior_sections(html: &str) -> Option<String> {
    let selector = Selector::parse(NOTES_CONTAINER_SELECTOR).ok()?;
    let document = Html::parse_document(html);
    let container = document.select(&selector).next()?;

    Some(container.inner_html().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_document(&dir.path().join("CHANGELOG.md")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_read_existing_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CHANGELOG.md");
        std::fs::write(&path, "## Old\n").unwrap();

        assert_eq!(read_document(&path).unwrap().as_deref(), Some("## Old\n"));
    }

    #[test]
    fn test_read_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_document(dir.path()),
            Err(ChangelogError::ReadFailed { .. })
        ));
    }

    #[test]
    fn test_extract_prior_sections() {
        let html = r#"<html><body>
<div class="notes-container">
<div class="release-section"><span>Version 1.0</span></div>
</div>
<footer><div>unrelated</div></footer>
</body></html>"#;

        let sections = extract_prior_sections(html).unwrap();
        assert_eq!(
            sections,
            r#"<div class="release-section"><span>Version 1.0</span></div>"#
        );
    }

    #[test]
    fn test_extract_with_extra_classes_and_attributes() {
        let html = r#"<div id="notes" class="wide notes-container"><p>old</p></div>"#;
        assert_eq!(extract_prior_sections(html).as_deref(), Some("<p>old</p>"));
    }

    #[test]
    fn test_extract_missing_container() {
        assert!(extract_prior_sections("<html><body><p>hi</p></body></html>").is_none());
        assert!(extract_prior_sections("not html at all").is_none());
        assert!(extract_prior_sections("").is_none());
    }
}
