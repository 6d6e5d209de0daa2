use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::GlobalOptions;

#[derive(Clone, Copy, Debug)]
pub struct CommandInfo {
    pub name: &'static str,
}

impl CommandInfo {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }
}

/// Per-invocation context: global flags, the working directory, and whether
/// stdin can host an interactive prompt.
pub struct CommandContext<'a> {
    pub global: &'a GlobalOptions,
    cwd: PathBuf,
    stdin_is_tty: bool,
}

impl<'a> CommandContext<'a> {
    /// Creates a command context from the current process environment.
    ///
    /// # Errors
    /// Returns an error if the working directory cannot be determined.
    pub fn new(global: &'a GlobalOptions, stdin_is_tty: bool) -> Result<Self> {
        let cwd = env::current_dir().context("unable to determine current directory")?;
        Ok(Self {
            global,
            cwd,
            stdin_is_tty,
        })
    }

    #[must_use]
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    #[must_use]
    pub fn stdin_is_tty(&self) -> bool {
        self.stdin_is_tty
    }
}
