use atty::Stream;
use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use neat_core::{
    format_status_message, to_json_response, CommandContext, CommandInfo, CommandStatus,
    ExecutionOutcome, GlobalOptions, InitRequest,
};
use serde_json::Value;

mod cli;
mod style;

use cli::{CommandCli, InitArgs, NeatCli};
use style::Style;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = NeatCli::parse();
    init_tracing(cli.verbose);

    let global = GlobalOptions {
        quiet: cli.quiet,
        verbose: cli.verbose,
        json: cli.json,
    };
    let ctx = CommandContext::new(&global, atty::is(Stream::Stdin)).map_err(|err| eyre!("{err:?}"))?;

    let (info, outcome) = dispatch(&ctx, &cli.command).map_err(|err| eyre!("{err:?}"))?;
    let code = emit_output(&cli, info, &outcome)?;

    if code == 0 {
        Ok(())
    } else {
        std::process::exit(code);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = format!("neat_domain={level},neat_core={level},neat_cli={level}");
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn dispatch(
    ctx: &CommandContext,
    command: &CommandCli,
) -> anyhow::Result<(CommandInfo, ExecutionOutcome)> {
    match command {
        CommandCli::Init(args) => {
            let info = CommandInfo::new("init");
            let request = init_request_from_args(args);
            let outcome = neat_core::run_init(ctx, &request)?;
            Ok((info, outcome))
        }
    }
}

fn init_request_from_args(args: &InitArgs) -> InitRequest {
    InitRequest {
        yes: args.yes,
        no: args.no,
        yarn: args.yarn,
        npm: args.npm,
        dry_run: args.dry_run,
        root_dir: args.root_dir.clone(),
        target_dir: args.target_dir.clone(),
    }
}

fn emit_output(cli: &NeatCli, info: CommandInfo, outcome: &ExecutionOutcome) -> Result<i32> {
    let code = match outcome.status {
        CommandStatus::Ok => 0,
        CommandStatus::UserError => 1,
        CommandStatus::Failure => 2,
    };

    let style = Style::new(cli.no_color, atty::is(Stream::Stdout));

    if cli.json {
        let payload = to_json_response(info, outcome, code);
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else if !cli.quiet {
        let message = format_status_message(info, &outcome.message);
        println!("{}", style.status(&outcome.status, &message));
        if let Some(hint) = hint_from_details(&outcome.details) {
            let hint_line = format!("Hint: {hint}");
            println!("{}", style.info(&hint_line));
        }
    }

    Ok(code)
}

fn hint_from_details(details: &Value) -> Option<&str> {
    details
        .as_object()
        .and_then(|map| map.get("hint"))
        .and_then(Value::as_str)
}
