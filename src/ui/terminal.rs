//! Terminal UI.

use console::Term;
use std::io::Write;

use crate::error::{AdminError, Result};

use super::{
    prompt_user, AdminTheme, Health, OutputMode, ProgressSpinner, Prompt, PromptResult,
    PromptType, SpinnerHandle, Table, UserInterface,
};

/// Terminal UI writing to stdout (errors to stderr).
///
/// When stdin is not a terminal, prompts answer with their default and
/// spinners are hidden.
pub struct TerminalUI {
    out: Term,
    err: Term,
    theme: AdminTheme,
    mode: OutputMode,
    interactive: bool,
}

impl TerminalUI {
    pub fn new(mode: OutputMode, colors: bool) -> Self {
        let out = Term::stdout();
        let interactive = out.is_term() && Term::stderr().is_term();
        Self {
            out,
            err: Term::stderr(),
            theme: if colors {
                AdminTheme::new()
            } else {
                AdminTheme::plain()
            },
            mode,
            interactive,
        }
    }

    fn non_interactive_answer(prompt: &Prompt) -> Result<PromptResult> {
        match (prompt.prompt_type, &prompt.default) {
            (PromptType::Confirm, None) => Ok(PromptResult::Bool(false)),
            (PromptType::Confirm, Some(default)) => {
                Ok(PromptResult::Bool(PromptResult::String(default.clone()).as_bool()))
            }
            (_, Some(default)) => Ok(PromptResult::String(default.clone())),
            (_, None) => Err(AdminError::InvalidArgument {
                message: format!("'{}' needs a value when not running in a terminal", prompt.key),
            }),
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.out, "{}", msg).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.out, "{}", self.theme.format_success(msg)).ok();
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.out, "{}", self.theme.format_warning(msg)).ok();
        }
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_error(msg)).ok();
    }

    fn data(&mut self, text: &str) {
        writeln!(self.out, "{}", text).ok();
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        if !self.interactive {
            return Self::non_interactive_answer(prompt);
        }
        prompt_user(prompt, &self.err)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.interactive && self.mode.shows_spinners() {
            Box::new(ProgressSpinner::new(message, self.theme.clone()))
        } else {
            Box::new(ProgressSpinner::hidden())
        }
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            writeln!(self.out, "\n{}\n", self.theme.format_header(title)).ok();
        }
    }

    fn show_table(&mut self, table: &Table) {
        if self.mode.shows_status() {
            writeln!(self.out, "{}", table.render()).ok();
        }
    }

    fn status_line(&mut self, health: Health, label: &str) {
        if self.mode.shows_status() {
            writeln!(self.out, "{}", self.theme.format_status(health, label)).ok();
        }
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}
