//! Interactive prompts.

use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Password};

use crate::error::{AdminError, Result};

use super::{Prompt, PromptResult, PromptType};

fn map_dialoguer_err(e: dialoguer::Error) -> AdminError {
    AdminError::Io(e.into())
}

/// Dialoguer theme without the default yellow `?` prefix.
fn prompt_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("".to_string()),
        ..ColorfulTheme::default()
    }
}

/// Prompt the user for input.
pub fn prompt_user(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    let theme = prompt_theme();
    match prompt.prompt_type {
        PromptType::Confirm => {
            let default = prompt
                .default
                .as_deref()
                .map(|s| matches!(s.to_lowercase().as_str(), "true" | "y" | "yes"))
                .unwrap_or(false);
            let result = Confirm::with_theme(&theme)
                .with_prompt(&prompt.question)
                .default(default)
                .interact_on(term)
                .map_err(map_dialoguer_err)?;
            Ok(PromptResult::Bool(result))
        }
        PromptType::Input => {
            let mut input = Input::<String>::with_theme(&theme).with_prompt(&prompt.question);
            if let Some(default) = &prompt.default {
                input = input.default(default.clone());
            }
            let result = input.interact_on(term).map_err(map_dialoguer_err)?;
            Ok(PromptResult::String(result))
        }
        PromptType::Secret => {
            let result = Password::with_theme(&theme)
                .with_prompt(&prompt.question)
                .interact_on(term)
                .map_err(map_dialoguer_err)?;
            Ok(PromptResult::String(result))
        }
    }
}
