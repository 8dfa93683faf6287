//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion. It can be configured with
//! pre-determined prompt responses.
//!
//! # Example
//!
//! ```
//! use engine_admin::ui::{MockUI, Prompt, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.set_prompt_response("create_database", "yes");
//!
//! let answer = ui.prompt(&Prompt::confirm("create_database", "Create?")).unwrap();
//! assert!(answer.as_bool());
//! assert_eq!(ui.prompts_shown(), ["create_database"]);
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{AdminError, Result};

use super::{Health, OutputMode, Prompt, PromptResult, PromptType, SpinnerHandle, Table, UserInterface};

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    data: Vec<String>,
    headers: Vec<String>,
    tables: Vec<String>,
    statuses: Vec<(Health, String)>,
    spinners: Arc<Mutex<Vec<String>>>,
    prompt_responses: HashMap<String, String>,
    prompts_shown: Vec<String>,
}

impl MockUI {
    pub fn new() -> Self {
        Self {
            mode: OutputMode::Normal,
            ..Default::default()
        }
    }

    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Set a response for a prompt key.
    pub fn set_prompt_response(&mut self, key: &str, response: &str) {
        self.prompt_responses
            .insert(key.to_string(), response.to_string());
    }

    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Everything written through [`UserInterface::data`].
    pub fn data(&self) -> &[String] {
        &self.data
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Rendered tables.
    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    pub fn statuses(&self) -> &[(Health, String)] {
        &self.statuses
    }

    /// Spinner messages, including updates and finish lines.
    pub fn spinners(&self) -> Vec<String> {
        self.spinners.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn prompts_shown(&self) -> &[String] {
        &self.prompts_shown
    }

    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
    }

    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn data(&mut self, text: &str) {
        self.data.push(text.to_string());
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        self.prompts_shown.push(prompt.key.clone());

        let response = self
            .prompt_responses
            .get(&prompt.key)
            .or(prompt.default.as_ref())
            .cloned();

        match (prompt.prompt_type, response) {
            (PromptType::Confirm, Some(response)) => {
                Ok(PromptResult::Bool(PromptResult::String(response).as_bool()))
            }
            (PromptType::Confirm, None) => Ok(PromptResult::Bool(false)),
            (_, Some(response)) => Ok(PromptResult::String(response)),
            (_, None) => Err(AdminError::InvalidArgument {
                message: format!("no mock response for prompt '{}'", prompt.key),
            }),
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if let Ok(mut spinners) = self.spinners.lock() {
            spinners.push(message.to_string());
        }
        Box::new(MockSpinner {
            log: Arc::clone(&self.spinners),
        })
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn show_table(&mut self, table: &Table) {
        self.tables.push(table.render());
    }

    fn status_line(&mut self, health: Health, label: &str) {
        self.statuses.push((health, label.to_string()));
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// Spinner recording its messages into the owning [`MockUI`].
#[derive(Debug)]
pub struct MockSpinner {
    log: Arc<Mutex<Vec<String>>>,
}

impl MockSpinner {
    fn push(&self, line: String) {
        if let Ok(mut log) = self.log.lock() {
            log.push(line);
        }
    }
}

impl SpinnerHandle for MockSpinner {
    fn set_message(&mut self, msg: &str) {
        self.push(msg.to_string());
    }

    fn finish_success(&mut self, msg: &str) {
        self.push(format!("✓ {}", msg));
    }

    fn finish_error(&mut self, msg: &str) {
        self.push(format!("✗ {}", msg));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_messages() {
        let mut ui = MockUI::new();
        ui.message("Loading");
        ui.warning("Slow");
        ui.error("Broken");
        UserInterface::data(&mut ui, "{}");
        assert!(ui.has_message("Load"));
        assert!(ui.has_warning("Slow"));
        assert!(ui.has_error("Broken"));
        assert_eq!(ui.data(), ["{}"]);
    }

    #[test]
    fn spinner_lines_are_recorded() {
        let mut ui = MockUI::new();
        let mut spinner = ui.start_spinner("Creating database");
        spinner.set_message("Running script 1 of 2");
        spinner.finish_error("Failed");
        assert_eq!(
            ui.spinners(),
            vec!["Creating database", "Running script 1 of 2", "✗ Failed"]
        );
    }

    #[test]
    fn unanswered_confirm_is_no() {
        let mut ui = MockUI::new();
        let answer = ui.prompt(&Prompt::confirm("update", "Update?")).unwrap();
        assert_eq!(answer, PromptResult::Bool(false));
    }

    #[test]
    fn unanswered_secret_is_error() {
        let mut ui = MockUI::new();
        assert!(ui.prompt(&Prompt::secret("api_key", "Key")).is_err());
    }

    #[test]
    fn with_mode_sets_mode() {
        assert_eq!(MockUI::with_mode(OutputMode::Silent).output_mode(), OutputMode::Silent);
    }
}
