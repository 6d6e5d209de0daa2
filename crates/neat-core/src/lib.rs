#![deny(clippy::all, warnings)]

mod config;
mod context;
mod errors;
mod init;
mod outcome;
mod prompt;

pub use config::GlobalOptions;
pub use context::{CommandContext, CommandInfo};
pub use errors::{format_status_message, manifest_error_outcome, to_json_response};
pub use init::{run_init, InitRequest};
pub use outcome::{CommandStatus, ExecutionOutcome};
pub use prompt::TerminalPrompt;
