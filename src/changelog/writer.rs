//! Merge new release sections into existing documents and write them out.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::ChangelogError;

use super::format::{ReleaseMeta, escape_html};
use super::parser::{extract_prior_sections, read_document};

/// Page template compiled into the binary.
const BUNDLED_TEMPLATE: &str = include_str!("templates/release-notes.html");

const CHANGELOG_PLACEHOLDER: &str = "{{Changelog}}";

/// Stand-in section used to check where a template puts the changelog.
const SECTION_MARKER: &str = "<p>changelog-gen-section-marker</p>";

/// Page shell for `release-notes.html`.
///
/// Supports the `{{AppName}}`, `{{AppVersion}}`, `{{ReleaseDate}}` and
/// `{{Changelog}}` placeholders. `{{Changelog}}` must appear inside the
/// `notes-container` element so later runs can find the existing sections.
#[derive(Debug, Clone)]
pub struct HtmlTemplate {
    source: String,
}

impl HtmlTemplate {
    pub fn bundled() -> Self {
        Self {
            source: BUNDLED_TEMPLATE.to_string(),
        }
    }

    pub fn parse(source: impl Into<String>) -> Result<Self, ChangelogError> {
        let source = source.into();
        if !source.contains(CHANGELOG_PLACEHOLDER) {
            return Err(ChangelogError::InvalidTemplate);
        }

        let template = Self { source };
        // Every {{Changelog}} must land in the container that later runs read back.
        let rendered = template.render(&[("Changelog", SECTION_MARKER)]);
        let total = rendered.matches(SECTION_MARKER).count();
        let inside = extract_prior_sections(&rendered)
            .map_or(0, |sections| sections.matches(SECTION_MARKER).count());
        if inside != total {
            return Err(ChangelogError::ChangelogOutsideContainer);
        }
        Ok(template)
    }

    pub fn from_file(path: &Path) -> Result<Self, ChangelogError> {
        let source =
            std::fs::read_to_string(path).map_err(|source| ChangelogError::TemplateReadFailed {
                path: path.to_path_buf(),
                source,
            })?;
        Self::parse(source)
    }

    /// Substitute placeholders in a single pass.
    ///
    /// Values are inserted verbatim and never re-scanned; unknown
    /// placeholders are left as they are.
    fn render(&self, values: &[(&str, &str)]) -> String {
        let mut out = String::with_capacity(self.source.len());
        let mut rest = self.source.as_str();

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];

            let Some(end) = after.find("}}") else {
                out.push_str(&rest[start..]);
                return out;
            };

            let key = &after[..end];
            match values.iter().find(|(name, _)| *name == key) {
                Some((_, value)) => out.push_str(value),
                None => out.push_str(&rest[start..start + 2 + end + 2]),
            }
            rest = &after[end + 2..];
        }

        out.push_str(rest);
        out
    }
}

impl Default for HtmlTemplate {
    fn default() -> Self {
        Self::bundled()
    }
}

/// Prepend a new release to Markdown changelog content.
///
/// The existing content follows the new block byte-for-byte; `None` is
/// treated as an empty document.
pub fn merge_markdown(existing: Option<&str>, section: &str, meta: &ReleaseMeta) -> String {
    let existing = existing.unwrap_or("");

    let mut merged = format!(
        "## Changelog ({})\nApp Version: {}\n\n{}\n",
        meta.release_date, meta.version, section
    );
    merged.reserve(existing.len());
    merged.push_str(existing);
    merged
}

/// Prepend a new release section to the sections of an existing
/// release-notes page and render the full page.
///
/// When the existing page has no `notes-container`, its content is dropped
/// and the new section is rendered on its own.
pub fn merge_html(
    existing: Option<&str>,
    section_html: &str,
    meta: &ReleaseMeta,
    template: &HtmlTemplate,
) -> String {
    let prior = match existing {
        Some(html) if !html.trim().is_empty() => extract_prior_sections(html).unwrap_or_else(|| {
            warn!("Could not find existing sections in release notes, starting with empty content");
            String::new()
        }),
        _ => String::new(),
    };

    let mut combined = String::with_capacity(section_html.len() + prior.len() + 1);
    combined.push_str(section_html);
    if !prior.is_empty() {
        if !combined.ends_with('\n') {
            combined.push('\n');
        }
        combined.push_str(&prior);
    }

    let app_name = escape_html(&meta.app_name);
    let app_version = escape_html(&meta.version);
    let release_date = escape_html(&meta.release_date);

    template.render(&[
        ("AppName", &app_name),
        ("AppVersion", &app_version),
        ("ReleaseDate", &release_date),
        ("Changelog", &combined),
    ])
}

/// Replace the content of `path` atomically.
///
/// The content goes to a temporary file in the same directory which is then
/// renamed over the target. With `backup`, an existing file is first copied
/// to `<file>.bak`.
pub fn write_document(path: &Path, content: &str, backup: bool) -> Result<(), ChangelogError> {
    let write_err = |source| ChangelogError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent).map_err(write_err)?;

    if backup && path.exists() {
        let mut backup_name = path.as_os_str().to_owned();
        backup_name.push(".bak");
        std::fs::copy(path, PathBuf::from(backup_name)).map_err(|source| {
            ChangelogError::BackupFailed {
                path: path.to_path_buf(),
                source,
            }
        })?;
    }

    let mut file = NamedTempFile::new_in(&parent).map_err(write_err)?;
    file.write_all(content.as_bytes()).map_err(write_err)?;
    file.as_file().sync_all().map_err(write_err)?;
    file.persist(path).map_err(|e| write_err(e.error))?;

    debug!(path = %path.display(), bytes = content.len(), "Wrote document");
    Ok(())
}

/// Prepend a Markdown section to the changelog at `path`.
pub fn update_markdown_file(
    path: &Path,
    section: &str,
    meta: &ReleaseMeta,
    backup: bool,
) -> Result<(), ChangelogError> {
    let existing = read_document(path)?;
    let merged = merge_markdown(existing.as_deref(), section, meta);
    write_document(path, &merged, backup)
}

/// Prepend an HTML section to the release notes at `path`.
pub fn update_html_file(
    path: &Path,
    section_html: &str,
    meta: &ReleaseMeta,
    template: &HtmlTemplate,
    backup: bool,
) -> Result<(), ChangelogError> {
    let existing = read_document(path)?;
    let merged = merge_html(existing.as_deref(), section_html, meta, template);
    write_document(path, &merged, backup)
}
