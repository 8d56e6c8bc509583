//! Operator interaction.
//!
//! The workflow talks to the operator only through [`Prompter`], so runs can
//! be driven by a terminal, by defaults (`--yes`), or by a script in tests.

use dialoguer::{Confirm, Input, MultiSelect, Select};
use tracing::debug;

use crate::error::PromptError;

/// Questions the workflow can ask the operator.
pub trait Prompter {
    /// Read a line of text. An empty answer selects `default` when given.
    fn prompt_text(&self, label: &str, default: Option<&str>) -> Result<String, PromptError>;

    fn prompt_confirm(&self, label: &str, default: bool) -> Result<bool, PromptError>;

    /// Pick one option. `Ok(None)` means the operator backed out.
    fn prompt_select_one(
        &self,
        label: &str,
        options: &[String],
        default: usize,
    ) -> Result<Option<usize>, PromptError>;

    /// Pick any number of options; all start selected. Backing out yields an
    /// empty selection.
    fn prompt_select_many(
        &self,
        label: &str,
        options: &[String],
    ) -> Result<Vec<usize>, PromptError>;
}

/// Interactive prompts on the controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn prompt_text(&self, label: &str, default: Option<&str>) -> Result<String, PromptError> {
        let mut input = Input::<String>::new().with_prompt(label).allow_empty(true);
        if let Some(default) = default.filter(|d| !d.is_empty()) {
            input = input.default(default.to_string());
        }
        Ok(input.interact_text()?.trim().to_string())
    }

    fn prompt_confirm(&self, label: &str, default: bool) -> Result<bool, PromptError> {
        Ok(Confirm::new()
            .with_prompt(label)
            .default(default)
            .interact()?)
    }

    fn prompt_select_one(
        &self,
        label: &str,
        options: &[String],
        default: usize,
    ) -> Result<Option<usize>, PromptError> {
        if options.is_empty() {
            return Ok(None);
        }
        Ok(Select::new()
            .with_prompt(label)
            .items(options)
            .default(default.min(options.len() - 1))
            .interact_opt()?)
    }

    fn prompt_select_many(
        &self,
        label: &str,
        options: &[String],
    ) -> Result<Vec<usize>, PromptError> {
        if options.is_empty() {
            return Ok(Vec::new());
        }
        let defaults = vec![true; options.len()];
        let selection = MultiSelect::new()
            .with_prompt(label)
            .items(options)
            .defaults(&defaults)
            .interact_opt()?;

        match selection {
            Some(indices) => Ok(indices),
            None => {
                debug!(label, "Selection cancelled");
                Ok(Vec::new())
            }
        }
    }
}

/// Non-interactive answers: every default is accepted and every commit is
/// selected.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoPrompter;

impl Prompter for AutoPrompter {
    fn prompt_text(&self, label: &str, default: Option<&str>) -> Result<String, PromptError> {
        default
            .map(str::to_string)
            .ok_or_else(|| PromptError::NonInteractive(label.to_string()))
    }

    fn prompt_confirm(&self, _label: &str, default: bool) -> Result<bool, PromptError> {
        Ok(default)
    }

    fn prompt_select_one(
        &self,
        _label: &str,
        options: &[String],
        default: usize,
    ) -> Result<Option<usize>, PromptError> {
        if options.is_empty() {
            return Ok(None);
        }
        Ok(Some(default.min(options.len() - 1)))
    }

    fn prompt_select_many(
        &self,
        _label: &str,
        options: &[String],
    ) -> Result<Vec<usize>, PromptError> {
        Ok((0..options.len()).collect())
    }
}
