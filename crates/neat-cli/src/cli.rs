use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

pub const NEAT_HELP_TEMPLATE: &str =
    "{before-help}\nUsage:\n    {usage}\n\nGlobal options:\n{options}\n";

pub const NEAT_BEFORE_HELP: &str = concat!(
    "neat ",
    env!("CARGO_PKG_VERSION"),
    " – Style-guide bootstrapper for JavaScript packages\n\n",
    "\x1b[1;36mCore workflow\x1b[0m\n",
    "  init             Wire the neat style tooling into an existing package:\n",
    "                   manifest scripts, dev dependencies, .neatrc.json, and a\n",
    "                   starter source file when the package has none.\n",
);

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    propagate_version = false,
    disable_help_subcommand = true,
    before_help = NEAT_BEFORE_HELP,
    help_template = NEAT_HELP_TEMPLATE
)]
pub struct NeatCli {
    #[arg(
        short,
        long,
        help = "Suppress human output (errors still print to stderr)",
        global = true
    )]
    pub quiet: bool,
    #[arg(short, long, action = ArgAction::Count, help = "Increase logging (-vv reaches trace)")]
    pub verbose: u8,
    #[arg(
        long,
        help = "Emit {status,message,details} JSON envelopes",
        global = true
    )]
    pub json: bool,
    #[arg(long, help = "Disable colored human output", global = true)]
    pub no_color: bool,
    #[command(subcommand)]
    pub command: CommandCli,
}

#[derive(Subcommand, Debug)]
pub enum CommandCli {
    #[command(
        about = "Initialize neat style tooling inside an existing package.",
        override_usage = "neat init [--yes|--no] [--yarn] [--dry-run]"
    )]
    Init(InitArgs),
}

#[derive(Args, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct InitArgs {
    #[arg(
        long,
        help = "Overwrite conflicting manifest entries without prompting",
        conflicts_with = "no"
    )]
    pub yes: bool,
    #[arg(
        long,
        help = "Keep conflicting manifest entries without prompting",
        conflicts_with = "yes"
    )]
    pub no: bool,
    #[arg(
        long,
        help = "Generate yarn script values even without a yarn.lock",
        conflicts_with = "npm"
    )]
    pub yarn: bool,
    #[arg(
        long,
        help = "Generate npm script values even with a yarn.lock present",
        conflicts_with = "yarn"
    )]
    pub npm: bool,
    #[arg(long, help = "Report planned edits without touching the filesystem")]
    pub dry_run: bool,
    #[arg(
        long,
        value_name = "DIR",
        help = "Package root holding package.json (defaults to the current directory)"
    )]
    pub root_dir: Option<PathBuf>,
    #[arg(
        long,
        value_name = "DIR",
        help = "Source directory for the starter template (defaults to src/)"
    )]
    pub target_dir: Option<PathBuf>,
}
