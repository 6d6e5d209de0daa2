use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

/// Default source directory for the starter template, relative to the root.
pub const DEFAULT_TARGET_DIR: &str = "src";

/// How a conflicting manifest entry is resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptPolicy {
    /// Consult the prompt for each conflict.
    Ask,
    /// Overwrite without asking.
    AssumeYes,
    /// Keep the existing entry without asking.
    AssumeNo,
}

impl PromptPolicy {
    /// Build a policy from the CLI's `--yes`/`--no` pair.
    ///
    /// # Errors
    ///
    /// Returns an error when both flags are set.
    pub fn from_flags(yes: bool, no: bool) -> Result<Self> {
        match (yes, no) {
            (true, true) => bail!("--yes and --no are mutually exclusive"),
            (true, false) => Ok(Self::AssumeYes),
            (false, true) => Ok(Self::AssumeNo),
            (false, false) => Ok(Self::Ask),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Yarn,
}

impl PackageManager {
    /// Sniff the package manager from lock files under `root`.
    pub fn detect(root: &Path) -> Self {
        if root.join("yarn.lock").exists() {
            Self::Yarn
        } else {
            Self::Npm
        }
    }

    /// Shell command that runs the named manifest script.
    pub fn run_script(self, script: &str) -> String {
        match self {
            Self::Npm => format!("npm run {script}"),
            Self::Yarn => format!("yarn {script}"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Yarn => "yarn",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ManifestSection {
    Scripts,
    DevDependencies,
}

impl ManifestSection {
    pub fn key(self) -> &'static str {
        match self {
            Self::Scripts => "scripts",
            Self::DevDependencies => "devDependencies",
        }
    }
}

impl fmt::Display for ManifestSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// An existing manifest entry that differs from the value init wants to write.
pub struct Conflict<'a> {
    pub section: ManifestSection,
    pub name: &'a str,
    pub current: String,
    pub proposed: &'a str,
}

/// Seam for interactive conflict resolution; the terminal implementation
/// lives in neat-core, tests script their answers.
pub trait OverwritePrompt {
    /// Decide whether the conflicting entry should be overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying prompt fails.
    fn confirm_overwrite(&mut self, conflict: &Conflict<'_>) -> Result<bool>;
}

/// Prompt that always keeps the existing entry. Used when Ask mode runs
/// without a terminal attached.
pub struct KeepExisting;

impl OverwritePrompt for KeepExisting {
    fn confirm_overwrite(&mut self, _conflict: &Conflict<'_>) -> Result<bool> {
        Ok(false)
    }
}

/// Per-invocation options for the initializer.
#[derive(Clone, Debug)]
pub struct InitOptions {
    pub dry_run: bool,
    pub policy: PromptPolicy,
    pub package_manager: Option<PackageManager>,
    pub root_dir: PathBuf,
    pub target_dir: Option<PathBuf>,
}

impl InitOptions {
    pub fn new(root_dir: PathBuf) -> Self {
        Self {
            dry_run: false,
            policy: PromptPolicy::Ask,
            package_manager: None,
            root_dir,
            target_dir: None,
        }
    }

    /// Explicit override wins; otherwise lock files under the root decide.
    pub fn resolved_package_manager(&self) -> PackageManager {
        self.package_manager
            .unwrap_or_else(|| PackageManager::detect(&self.root_dir))
    }

    /// Absolute path of the directory the starter template targets.
    pub fn resolved_target_dir(&self) -> PathBuf {
        match &self.target_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => self.root_dir.join(dir),
            None => self.root_dir.join(DEFAULT_TARGET_DIR),
        }
    }
}
