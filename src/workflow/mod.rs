//! Changelog generation workflow.
//!
//! Takes each repository through tag and commit selection, then writes the
//! Markdown changelog and HTML release notes, either next to each repository
//! or once for all of them.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::changelog::{
    ChangelogSection, Classifier, CommitSource, HtmlTemplate, ReleaseMeta, merge_markdown,
    update_html_file, update_markdown_file,
};
use crate::config::Config;
use crate::error::{ChangelogError, PromptError, WorkflowError};
use crate::git::RepositoryDriver;
use crate::prompt::Prompter;

/// `AppName` used for combined release notes when none is configured.
pub const COMBINED_APP_NAME: &str = "Release Notes";

/// Options for a run, derived from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct WorkflowOptions {
    /// Repositories to process. Empty means ask the operator.
    pub repos: Vec<PathBuf>,
    pub from: Option<String>,
    pub to: Option<String>,
    /// Write one section covering every repository to `output_dir`.
    pub combined: bool,
    pub output_dir: PathBuf,
    /// Print the Markdown section instead of writing files or creating tags.
    pub dry_run: bool,
}

/// A repository (or combined output) that produced nothing.
#[derive(Debug)]
pub struct SkippedRepository {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of a run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<SkippedRepository>,
    /// Markdown blocks printed by a dry run.
    pub previews: Vec<String>,
    /// Subjects left out because they did not follow the commit grammar.
    pub unrecognized: Vec<String>,
}

impl RunSummary {
    /// True when every repository failed and nothing was produced.
    pub fn is_failure(&self) -> bool {
        self.written.is_empty() && self.previews.is_empty() && !self.skipped.is_empty()
    }

    fn skip(&mut self, path: &Path, err: &WorkflowError) {
        eprintln!("Skipping {}: {}", path.display(), err);
        warn!(path = %path.display(), error = %err, "Skipping repository");
        self.skipped.push(SkippedRepository {
            path: path.to_path_buf(),
            reason: err.to_string(),
        });
    }
}

/// Run the workflow over every repository.
///
/// Failures of a single repository are recorded in the summary; only setup
/// problems (commit types, template, repository prompt) end the run early.
pub fn run(
    options: &WorkflowOptions,
    config: &Config,
    driver: &dyn RepositoryDriver,
    prompter: &dyn Prompter,
) -> Result<RunSummary, WorkflowError> {
    let classifier = Classifier::new(config.commit_types.clone())?;
    let template = match &config.html_template {
        Some(path) => HtmlTemplate::from_file(path)?,
        None => HtmlTemplate::bundled(),
    };

    let repos = resolve_repositories(&options.repos, prompter)?;
    let mut summary = RunSummary::default();

    if repos.is_empty() {
        println!("No repositories given. Nothing to do.");
        return Ok(summary);
    }

    let output = Output {
        config,
        classifier: &classifier,
        template: &template,
        dry_run: options.dry_run,
    };

    if options.combined {
        run_combined(&repos, options, &output, driver, prompter, &mut summary);
    } else {
        for path in &repos {
            if let Err(e) =
                run_repository(path, options, &output, driver, prompter, &mut summary)
            {
                summary.skip(path, &e);
            }
        }
    }

    Ok(summary)
}

/// Take one repository from tag selection through to written output.
fn run_repository(
    path: &Path,
    options: &WorkflowOptions,
    output: &Output<'_>,
    driver: &dyn RepositoryDriver,
    prompter: &dyn Prompter,
    summary: &mut RunSummary,
) -> Result<(), WorkflowError> {
    println!();
    println!("Repository: {}", path.display());
    let source = collect_source(path, options, driver, prompter)?;

    let app_name = output
        .config
        .app_name
        .clone()
        .unwrap_or_else(|| source.name.clone());
    let label = format!("App version for {}", source.name);
    let version = prompt_version(prompter, &label, &source.to_tag)?;

    let meta = ReleaseMeta::today(app_name, version);
    output.emit(std::slice::from_ref(&source), meta, &source.path, summary)?;
    Ok(())
}

/// Collect every repository, then write one section for all of them.
fn run_combined(
    repos: &[PathBuf],
    options: &WorkflowOptions,
    output: &Output<'_>,
    driver: &dyn RepositoryDriver,
    prompter: &dyn Prompter,
    summary: &mut RunSummary,
) {
    let mut sources = Vec::with_capacity(repos.len());
    for path in repos {
        println!();
        println!("Repository: {}", path.display());
        match collect_source(path, options, driver, prompter) {
            Ok(source) => sources.push(source),
            Err(e) => summary.skip(path, &e),
        }
    }

    let Some(default_version) = sources.last().map(|s| s.to_tag.clone()) else {
        return;
    };
    let app_name = output
        .config
        .app_name
        .clone()
        .unwrap_or_else(|| COMBINED_APP_NAME.to_string());

    let version = match prompt_version(prompter, "App version", &default_version) {
        Ok(version) => version,
        Err(e) => {
            summary.skip(&options.output_dir, &e.into());
            return;
        }
    };

    let meta = ReleaseMeta::today(app_name, version);
    if let Err(e) = output.emit(&sources, meta, &options.output_dir, summary) {
        summary.skip(&options.output_dir, &e.into());
    }
}

fn prompt_version(
    prompter: &dyn Prompter,
    label: &str,
    default: &str,
) -> Result<String, PromptError> {
    let version = prompter.prompt_text(label, Some(default))?;
    if version.trim().is_empty() {
        Ok(default.to_string())
    } else {
        Ok(version.trim().to_string())
    }
}

/// Shared state for rendering and writing sections.
struct Output<'a> {
    config: &'a Config,
    classifier: &'a Classifier,
    template: &'a HtmlTemplate,
    dry_run: bool,
}

impl Output<'_> {
    fn emit(
        &self,
        sources: &[CommitSource],
        meta: ReleaseMeta,
        root: &Path,
        summary: &mut RunSummary,
    ) -> Result<(), ChangelogError> {
        let section = ChangelogSection::assemble(self.classifier, sources, meta);
        for subject in &section.skipped {
            println!("Skipping commit: {}", subject);
        }
        summary.unrecognized.extend(section.skipped.iter().cloned());

        let markdown = section.render_markdown();

        if self.dry_run {
            let preview = merge_markdown(None, &markdown, &section.meta);
            println!("\n--- Dry Run Output ---\n");
            print!("{}", preview);
            summary.previews.push(preview);
            return Ok(());
        }

        let markdown_path = root.join(&self.config.markdown_file);
        update_markdown_file(&markdown_path, &markdown, &section.meta, self.config.backup)?;
        summary.written.push(markdown_path.clone());

        let html_path = root.join(&self.config.html_file);
        update_html_file(
            &html_path,
            &section.render_html(),
            &section.meta,
            self.template,
            self.config.backup,
        )?;
        summary.written.push(html_path.clone());

        println!("✓ {}", section.summary(&markdown_path.display().to_string()));
        println!("✓ Updated {}", html_path.display());
        Ok(())
    }
}

/// Gather the selected commits of one repository.
pub fn collect_source(
    path: &Path,
    options: &WorkflowOptions,
    driver: &dyn RepositoryDriver,
    prompter: &dyn Prompter,
) -> Result<CommitSource, WorkflowError> {
    let mut tags = driver.list_tags(path)?;

    if !options.dry_run {
        maybe_create_tag(path, &mut tags, driver, prompter)?;
    }

    let (from_tag, to_tag) = choose_tags(
        path,
        &tags,
        options.from.as_deref(),
        options.to.as_deref(),
        driver,
        prompter,
    )?;

    let subjects = driver.list_commits(path, &from_tag, &to_tag)?;
    println!(
        "Found {} commits between {} and {}",
        subjects.len(),
        from_tag,
        to_tag
    );

    let subjects = select_commits(subjects, prompter)?;

    Ok(CommitSource {
        name: repository_name(path),
        path: path.to_path_buf(),
        from_tag,
        to_tag,
        subjects,
    })
}

/// Offer to tag `HEAD` before choosing the range.
///
/// The new tag is appended to `tags` so it can be picked as the `to` tag.
pub fn maybe_create_tag(
    path: &Path,
    tags: &mut Vec<String>,
    driver: &dyn RepositoryDriver,
    prompter: &dyn Prompter,
) -> Result<(), WorkflowError> {
    let last = tags.last().map(String::as_str).unwrap_or("(none)");
    let label = format!("Last tag was {}, make a new tag?", last);
    if !prompter.prompt_confirm(&label, false)? {
        return Ok(());
    }

    loop {
        let name = prompter.prompt_text("Enter new tag name", None)?;
        let name = name.trim();

        if name.is_empty() {
            println!("Tag name cannot be empty.");
            continue;
        }
        if driver.tag_exists(path, name)? {
            println!("Tag {} already exists. Choose another name.", name);
            continue;
        }

        driver.create_tag(path, name)?;
        println!("Created tag {}", name);
        tags.push(name.to_string());
        return Ok(());
    }
}

/// Pick the `from` and `to` tags.
///
/// Requested tags are used when they exist; otherwise the operator chooses
/// from `tags`, defaulting to the last two.
pub fn choose_tags(
    path: &Path,
    tags: &[String],
    from: Option<&str>,
    to: Option<&str>,
    driver: &dyn RepositoryDriver,
    prompter: &dyn Prompter,
) -> Result<(String, String), WorkflowError> {
    let last = tags.len().saturating_sub(1);
    let from_tag = choose_tag(path, "from", tags, from, last.saturating_sub(1), driver, prompter)?;
    let to_tag = choose_tag(path, "to", tags, to, last, driver, prompter)?;

    debug!(path = %path.display(), from = %from_tag, to = %to_tag, "Chose tag range");
    Ok((from_tag, to_tag))
}

fn choose_tag(
    path: &Path,
    which: &str,
    tags: &[String],
    requested: Option<&str>,
    default: usize,
    driver: &dyn RepositoryDriver,
    prompter: &dyn Prompter,
) -> Result<String, WorkflowError> {
    if let Some(name) = requested {
        if driver.tag_exists(path, name)? {
            return Ok(name.to_string());
        }
        println!("Tag {} not found in {}.", name, path.display());
    }

    let label = format!("Select the '{}' tag for {}", which, path.display());
    let index = prompter
        .prompt_select_one(&label, tags, default)?
        .ok_or(WorkflowError::Cancelled)?;

    tags.get(index).cloned().ok_or(WorkflowError::Cancelled)
}

/// Let the operator drop commits. The kept subjects stay in log order.
fn select_commits(
    subjects: Vec<String>,
    prompter: &dyn Prompter,
) -> Result<Vec<String>, PromptError> {
    if subjects.is_empty() {
        return Ok(subjects);
    }

    let mut selected = prompter.prompt_select_many("Select commits to include", &subjects)?;
    selected.sort_unstable();
    selected.dedup();

    if selected.len() < subjects.len() {
        info!(
            kept = selected.len(),
            dropped = subjects.len() - selected.len(),
            "Commits deselected"
        );
    }

    Ok(selected
        .into_iter()
        .filter_map(|i| subjects.get(i).cloned())
        .collect())
}

/// Repositories from `--repo`, or asked for one per line until an empty
/// answer.
///
/// Relative paths are made absolute. Prompted paths that do not exist are
/// rejected and asked again.
pub fn resolve_repositories(
    requested: &[PathBuf],
    prompter: &dyn Prompter,
) -> Result<Vec<PathBuf>, PromptError> {
    let mut repos: Vec<PathBuf> = Vec::new();

    if !requested.is_empty() {
        for path in requested {
            push_unique(&mut repos, absolute(path));
        }
        return Ok(repos);
    }

    println!("Enter the paths to your git repositories, one per line.");
    println!("Relative paths such as '.' or '../app' are fine. Leave empty to finish.");

    loop {
        let answer = prompter.prompt_text("Repository path", Some(""))?;
        let answer = answer.trim();
        if answer.is_empty() {
            break;
        }

        let path = absolute(Path::new(answer));
        if !path.exists() {
            println!("Warning: {} does not exist. Enter a valid path.", path.display());
            continue;
        }

        println!("Added repository: {}", path.display());
        push_unique(&mut repos, path);
    }

    Ok(repos)
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn push_unique(repos: &mut Vec<PathBuf>, path: PathBuf) {
    if repos.contains(&path) {
        debug!(path = %path.display(), "Repository listed twice");
    } else {
        repos.push(path);
    }
}

/// Directory name of the repository, used as its display name.
pub fn repository_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
