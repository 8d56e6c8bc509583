//! Changelog section types, commit bucketing and rendering.

use std::fmt::Write as _;
use std::path::PathBuf;

use chrono::Utc;
use tracing::{debug, info};

use super::classify::Classifier;

/// Changelog buckets, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Feature,
    BugFix,
    Other,
}

impl Category {
    /// All categories in the order they are rendered.
    pub const ALL: [Category; 3] = [Category::Feature, Category::BugFix, Category::Other];

    /// Get the display heading for the category.
    pub fn heading(&self) -> &'static str {
        match self {
            Self::Feature => "Features",
            Self::BugFix => "Bug Fixes",
            Self::Other => "Other Changes",
        }
    }
}

/// Commits selected from one repository for one release.
#[derive(Debug, Clone)]
pub struct CommitSource {
    pub name: String,
    pub path: PathBuf,
    pub from_tag: String,
    pub to_tag: String,
    /// Raw commit subjects in log order.
    pub subjects: Vec<String>,
}

/// Release metadata rendered around a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseMeta {
    pub app_name: String,
    pub version: String,
    pub release_date: String,
}

impl ReleaseMeta {
    /// Metadata dated today (UTC).
    pub fn today(app_name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            version: version.into(),
            release_date: Utc::now().format("%Y-%m-%d").to_string(),
        }
    }
}

/// One release worth of categorized commits.
#[derive(Debug, Clone)]
pub struct ChangelogSection {
    pub meta: ReleaseMeta,
    /// `(name, from_tag, to_tag)` for each source that went into the section.
    pub ranges: Vec<(String, String, String)>,
    pub features: Vec<String>,
    pub bug_fixes: Vec<String>,
    pub other: Vec<String>,
    /// Subjects dropped because they did not follow the conventional grammar.
    pub skipped: Vec<String>,
}

impl ChangelogSection {
    /// Classify every subject of every source into one shared set of buckets.
    ///
    /// Relative commit order is kept within each bucket. Unrecognized subjects
    /// are left out of all buckets and recorded in `skipped`.
    pub fn assemble(classifier: &Classifier, sources: &[CommitSource], meta: ReleaseMeta) -> Self {
        let mut section = Self {
            meta,
            ranges: Vec::with_capacity(sources.len()),
            features: Vec::new(),
            bug_fixes: Vec::new(),
            other: Vec::new(),
            skipped: Vec::new(),
        };

        for source in sources {
            section.ranges.push((
                source.name.clone(),
                source.from_tag.clone(),
                source.to_tag.clone(),
            ));

            for subject in &source.subjects {
                match classifier.classify(subject) {
                    Some(commit) => {
                        debug!(
                            repo = %source.name,
                            commit_type = %commit.commit_type,
                            description = %commit.description,
                            "Adding commit"
                        );
                        section
                            .bucket_mut(commit.category)
                            .push(commit.description);
                    }
                    None => {
                        info!(repo = %source.name, subject = %subject, "Skipping commit");
                        section.skipped.push(subject.clone());
                    }
                }
            }
        }

        section
    }

    pub fn entries(&self, category: Category) -> &[String] {
        match category {
            Category::Feature => &self.features,
            Category::BugFix => &self.bug_fixes,
            Category::Other => &self.other,
        }
    }

    fn bucket_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Feature => &mut self.features,
            Category::BugFix => &mut self.bug_fixes,
            Category::Other => &mut self.other,
        }
    }

    /// Total number of categorized entries.
    pub fn len(&self) -> usize {
        self.features.len() + self.bug_fixes.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render the Markdown body of the section.
    ///
    /// Starts with the tag range line(s); empty buckets get no heading.
    pub fn render_markdown(&self) -> String {
        let mut out = String::new();

        if let [(_, from, to)] = self.ranges.as_slice() {
            let _ = writeln!(out, "{} → {}", from, to);
        } else {
            for (name, from, to) in &self.ranges {
                let _ = writeln!(out, "{}: {} → {}", name, from, to);
            }
        }

        for category in Category::ALL {
            let entries = self.entries(category);
            if entries.is_empty() {
                continue;
            }
            let _ = write!(out, "\n### {}\n", category.heading());
            for entry in entries {
                let _ = writeln!(out, "- {}", entry);
            }
        }

        out
    }

    /// Render the section as an HTML `release-section` block.
    ///
    /// All three category headings are always present; an empty bucket shows
    /// a single `No changes` item.
    pub fn render_html(&self) -> String {
        let mut out = String::new();

        out.push_str("<div class=\"release-section\">\n");
        out.push_str("  <div class=\"release-version\">\n");
        let _ = writeln!(
            out,
            "    <span>Version {}</span>",
            escape_html(&self.meta.version)
        );
        let _ = writeln!(
            out,
            "    <span class=\"release-date\">{}</span>",
            escape_html(&self.meta.release_date)
        );
        out.push_str("  </div>\n");

        for category in Category::ALL {
            let _ = writeln!(
                out,
                "  <h3 class=\"change-category\">{}</h3>",
                category.heading()
            );
            out.push_str("  <ul class=\"change-list\">\n");
            let entries = self.entries(category);
            if entries.is_empty() {
                out.push_str("    <li>No changes</li>\n");
            }
            for entry in entries {
                let _ = writeln!(out, "    <li>{}</li>", escape_html(entry));
            }
            out.push_str("  </ul>\n");
        }

        out.push_str("</div>\n");
        out
    }

    /// Count entries per category for summary output.
    pub fn count_by_category(&self) -> Vec<(Category, usize)> {
        Category::ALL
            .into_iter()
            .map(|c| (c, self.entries(c).len()))
            .filter(|(_, count)| *count > 0)
            .collect()
    }

    /// Generate a summary message for the user.
    pub fn summary(&self, file_name: &str) -> String {
        let total = self.len();
        let counts = self.count_by_category();

        if counts.is_empty() {
            return format!("No categorized commits; wrote an empty release to {}", file_name);
        }

        let details: Vec<String> = counts
            .iter()
            .map(|(category, count)| format!("{}: {}", category.heading(), count))
            .collect();

        let entry_word = if total == 1 { "entry" } else { "entries" };

        format!(
            "Added {} {} ({}) to {}",
            total,
            entry_word,
            details.join(", "),
            file_name
        )
    }
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
