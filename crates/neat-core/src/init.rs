use std::path::PathBuf;

use anyhow::Result;
use serde_json::json;
use tracing::debug;

use neat_domain::{
    InitOptions, Initializer, KeepExisting, OverwritePrompt, PackageManager, PromptPolicy,
};

use crate::errors::manifest_error_outcome;
use crate::prompt::TerminalPrompt;
use crate::{CommandContext, ExecutionOutcome};

#[derive(Clone, Debug, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct InitRequest {
    pub yes: bool,
    pub no: bool,
    pub yarn: bool,
    pub npm: bool,
    pub dry_run: bool,
    pub root_dir: Option<PathBuf>,
    pub target_dir: Option<PathBuf>,
}

/// Initializes style-guide tooling in the requested package directory.
///
/// # Errors
/// Returns an error if filesystem access fails in a way that is not a
/// recoverable user mistake.
pub fn run_init(ctx: &CommandContext, request: &InitRequest) -> Result<ExecutionOutcome> {
    let policy = match PromptPolicy::from_flags(request.yes, request.no) {
        Ok(policy) => policy,
        Err(err) => {
            return Ok(ExecutionOutcome::user_error(
                err.to_string(),
                json!({
                    "reason": "conflicting_flags",
                    "hint": "Pass at most one of --yes and --no.",
                }),
            ))
        }
    };

    let root = request
        .root_dir
        .clone()
        .unwrap_or_else(|| ctx.cwd().to_path_buf());
    if !root.is_dir() {
        return Ok(ExecutionOutcome::user_error(
            format!("directory not found: {}", root.display()),
            json!({
                "reason": "missing_root",
                "hint": "Point --root-dir at an existing package directory.",
            }),
        ));
    }

    let mut options = InitOptions::new(root.clone());
    options.dry_run = request.dry_run;
    options.policy = policy;
    options.target_dir = request.target_dir.clone();
    if request.yarn {
        options.package_manager = Some(PackageManager::Yarn);
    } else if request.npm {
        options.package_manager = Some(PackageManager::Npm);
    }
    debug!(root = %root.display(), policy = ?policy, dry_run = options.dry_run, "running init");

    // Ask cannot block a pipe; without a terminal, conflicts are kept.
    let mut terminal = TerminalPrompt::new();
    let mut keep = KeepExisting;
    let prompt: &mut dyn OverwritePrompt = if policy == PromptPolicy::Ask && ctx.stdin_is_tty() {
        &mut terminal
    } else {
        &mut keep
    };

    let report = match Initializer::init(&options, prompt) {
        Ok(report) => report,
        Err(err) => {
            if let Some(outcome) = manifest_error_outcome(&err) {
                return Ok(outcome);
            }
            // Filesystem failures still travel in the outcome envelope.
            return Ok(ExecutionOutcome::failure(
                format!("{err:#}"),
                json!({ "reason": "io_failure" }),
            ));
        }
    };

    let details = json!({
        "root": root.display().to_string(),
        "package": report.package,
        "package_manager": report.package_manager.label(),
        "manifest_created": report.manifest_created,
        "files_written": report.files_written,
        "changed": report.changed,
        "dry_run": options.dry_run,
    });
    let message = if !report.changed {
        "style tooling already configured".to_string()
    } else if options.dry_run {
        format!(
            "would write {} file(s) (dry-run)",
            report.files_written.len()
        )
    } else {
        format!(
            "configured style tooling for {} ({} file(s) written)",
            report.package,
            report.files_written.len()
        )
    };
    Ok(ExecutionOutcome::success(message, details))
}
