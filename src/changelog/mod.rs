//! Commit classification, section assembly and document merging.

pub mod classify;
pub mod format;
pub mod parser;
pub mod writer;

pub use classify::{ClassifiedCommit, Classifier, CommitTypes};
pub use format::{Category, ChangelogSection, CommitSource, ReleaseMeta};
pub use parser::{extract_prior_sections, read_document};
pub use writer::{
    HtmlTemplate, merge_html, merge_markdown, update_html_file, update_markdown_file,
    write_document,
};
