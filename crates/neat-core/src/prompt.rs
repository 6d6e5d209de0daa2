use anyhow::Result;
use dialoguer::Confirm;
use neat_domain::{Conflict, OverwritePrompt};

/// Interactive confirmation on the controlling terminal. Only used when the
/// policy is Ask and stdin is a tty; defaults to keeping the existing entry.
#[derive(Default)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl OverwritePrompt for TerminalPrompt {
    fn confirm_overwrite(&mut self, conflict: &Conflict<'_>) -> Result<bool> {
        let question = format!(
            "{} \"{}\" is {:?}; replace it with {:?}?",
            conflict.section, conflict.name, conflict.current, conflict.proposed
        );
        let overwrite = Confirm::new()
            .with_prompt(question)
            .default(false)
            .interact()?;
        Ok(overwrite)
    }
}
