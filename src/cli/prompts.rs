//! Interactive prompts using dialoguer
//!
//! Everything that waits on the operator goes through [`Prompter`], so
//! resolvers and commands can run against [`ScriptedPrompter`] in tests.

use std::collections::VecDeque;

use anyhow::{anyhow, bail, Context, Result};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect, Select};

/// Validation callback for free-text answers: `Err` carries the hint shown before re-asking.
pub type Validator<'a> = &'a dyn Fn(&str) -> Result<(), String>;

/// Source of operator answers
pub trait Prompter {
    /// Ask a yes/no question
    fn confirm(&mut self, message: &str) -> Result<bool>;

    /// Ask the operator to pick exactly one of `choices`, returning its index
    fn select(&mut self, message: &str, choices: &[String]) -> Result<usize>;

    /// Ask the operator to tick any of `choices`, returning the ticked indices in order
    fn multi_select(&mut self, message: &str, choices: &[String]) -> Result<Vec<usize>>;

    /// Ask for free text, re-asking until `validate` accepts it
    fn input(&mut self, message: &str, validate: Validator<'_>) -> Result<String>;
}

/// Prompter backed by the real terminal
#[derive(Default)]
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Prompter for TerminalPrompter {
    fn confirm(&mut self, message: &str) -> Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(message)
            .default(false)
            .interact()
            .context("Failed to show confirmation prompt")
    }

    fn select(&mut self, message: &str, choices: &[String]) -> Result<usize> {
        Select::with_theme(&self.theme)
            .with_prompt(message)
            .items(choices)
            .default(0)
            .interact()
            .context("Failed to show selection prompt")
    }

    fn multi_select(&mut self, message: &str, choices: &[String]) -> Result<Vec<usize>> {
        MultiSelect::with_theme(&self.theme)
            .with_prompt(message)
            .items(choices)
            .interact()
            .context("Failed to show selection prompt")
    }

    fn input(&mut self, message: &str, validate: Validator<'_>) -> Result<String> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(message)
            .validate_with(|answer: &String| validate(answer.trim()))
            .interact_text()
            .map(|answer| answer.trim().to_string())
            .context("Failed to show input prompt")
    }
}

/// A pre-recorded answer for [`ScriptedPrompter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Confirm(bool),
    Select(usize),
    MultiSelect(Vec<usize>),
    Text(String),
}

impl Answer {
    pub fn text(value: impl Into<String>) -> Self {
        Answer::Text(value.into())
    }
}

/// Deterministic prompter that replays queued answers.
///
/// Every question asked is recorded in `asked`, and every hint produced by a
/// rejected free-text answer in `hints`. Running out of answers, or receiving
/// an answer of the wrong kind, is an error.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    pub asked: Vec<String>,
    pub hints: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Answers not consumed yet
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, message: &str) -> Result<Answer> {
        self.asked.push(message.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| anyhow!("No scripted answer left for prompt: {}", message))
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, message: &str) -> Result<bool> {
        match self.next(message)? {
            Answer::Confirm(value) => Ok(value),
            other => bail!("Expected a confirmation answer, got {:?}", other),
        }
    }

    fn select(&mut self, message: &str, choices: &[String]) -> Result<usize> {
        match self.next(message)? {
            Answer::Select(index) if index < choices.len() => Ok(index),
            other => bail!("Expected a selection among {:?}, got {:?}", choices, other),
        }
    }

    fn multi_select(&mut self, message: &str, choices: &[String]) -> Result<Vec<usize>> {
        match self.next(message)? {
            Answer::MultiSelect(indices) if indices.iter().all(|i| *i < choices.len()) => {
                Ok(indices)
            }
            other => bail!("Expected a multi-selection among {:?}, got {:?}", choices, other),
        }
    }

    fn input(&mut self, message: &str, validate: Validator<'_>) -> Result<String> {
        loop {
            let answer = match self.next(message)? {
                Answer::Text(text) => text,
                other => bail!("Expected a text answer, got {:?}", other),
            };
            match validate(answer.trim()) {
                Ok(()) => return Ok(answer.trim().to_string()),
                Err(hint) => self.hints.push(hint),
            }
        }
    }
}
