//! changelog-gen - CLI entry point.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use changelog_gen::prompt::{AutoPrompter, Prompter, TerminalPrompter};
use changelog_gen::workflow::{self, WorkflowOptions};
use changelog_gen::{Git2Driver, load_config};

/// Generate a Markdown changelog and HTML release notes from conventional commits.
#[derive(Parser, Debug)]
#[command(name = "changelog-gen")]
#[command(about = "Generate a changelog and release notes from conventional commits between tags")]
#[command(version)]
struct Cli {
    /// Repository to process (repeatable). Prompted for when omitted
    #[arg(long = "repo", value_name = "PATH")]
    repos: Vec<PathBuf>,

    /// Start tag of the range (asked for when missing or unknown)
    #[arg(long)]
    from: Option<String>,

    /// End tag of the range (asked for when missing or unknown)
    #[arg(long)]
    to: Option<String>,

    /// Write one changelog covering all repositories
    #[arg(long)]
    combined: bool,

    /// Where combined output is written (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Path to changelog.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Dry run - print the changelog without writing files or creating tags
    #[arg(long)]
    dry_run: bool,

    /// Accept every default without prompting
    #[arg(short = 'y', long)]
    yes: bool,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = std::env::current_dir().context("Could not determine the current directory")?;

    let config = load_config(cli.config.as_deref(), &cwd).context("Failed to load configuration")?;

    let mut repos = cli.repos;
    if repos.is_empty() && cli.yes {
        repos.push(cwd.clone());
    }

    let options = WorkflowOptions {
        repos,
        from: cli.from,
        to: cli.to,
        combined: cli.combined,
        output_dir: cli.output_dir.unwrap_or_else(|| cwd.clone()),
        dry_run: cli.dry_run,
    };

    let prompter: Box<dyn Prompter> = if cli.yes {
        Box::new(AutoPrompter)
    } else {
        Box::new(TerminalPrompter)
    };

    let summary = workflow::run(&options, &config, &Git2Driver::new(), prompter.as_ref())
        .context("Changelog generation failed")?;

    if !summary.skipped.is_empty() {
        eprintln!();
        eprintln!("Skipped {} repositories:", summary.skipped.len());
        for skipped in &summary.skipped {
            eprintln!("  {}: {}", skipped.path.display(), skipped.reason);
        }
    }

    if summary.is_failure() {
        anyhow::bail!("No changelog was generated");
    }

    if !summary.written.is_empty() {
        println!();
        println!("Changelog generated successfully!");
    }

    Ok(())
}

/// Log to stderr. `RUST_LOG` wins; otherwise `warn`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
