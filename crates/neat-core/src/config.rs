use serde::{Deserialize, Serialize};

/// Flags shared by every subcommand, carried down from the CLI surface.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalOptions {
    pub quiet: bool,
    pub verbose: u8,
    pub json: bool,
}
