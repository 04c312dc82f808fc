// Command handlers

use std::time::Duration;

use poridhi_core::command_stream::ToolConfig;
use tracing::debug;

use crate::cli::{Args, Command};
use crate::error::CliResult;

pub mod launch;
pub mod list;

/// Main command dispatcher
#[must_use = "command execution results should be handled"]
pub fn execute_command(args: Args) -> CliResult<()> {
    let tool = tool_config(&args);
    debug!(?tool, dry_run = args.dry_run, "dispatching {}", args.command.name());

    match args.command {
        Command::Launch(launch) => launch::handle_launch(&launch, tool, args.dry_run),
        Command::List { output } => list::handle_list(output, tool, args.dry_run),
    }
}

/// How to reach ignite, from the global flags.
pub fn tool_config(args: &Args) -> ToolConfig {
    ToolConfig {
        program: args.ignite_bin.clone(),
        elevate: !args.no_sudo,
        timeout: args.timeout.map(Duration::from_secs),
        ..ToolConfig::default()
    }
}
