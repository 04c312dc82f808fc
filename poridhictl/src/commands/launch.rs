//! `poridhictl launch vm`

use poridhi_core::command_stream::{CommandRunner, ToolConfig, ToolRunner};
use poridhi_core::ctl_println;
use poridhi_messages::messages::MESSAGES;
use poridhi_messages::msg;
use poridhi_provider::{CopyFile, IgniteProvider, LaunchConfig, Manifest, NodeIdentity};
use tracing::info_span;

use crate::cli::LaunchArgs;
use crate::error::{CliError, CliResult};

const SUPPORTED_KIND: &str = "vm";

pub fn handle_launch(args: &LaunchArgs, tool: ToolConfig, dry_run: bool) -> CliResult<()> {
    let span = info_span!("vm_operation", operation = "launch", name = %args.name);
    let _enter = span.enter();

    let config = launch_config(args)?;

    if dry_run {
        ctl_println!("{}", MESSAGES.dry_run_header);
        ctl_println!("{}", render_dry_run(&config)?);
        return Ok(());
    }

    let provider = IgniteProvider::new(CommandRunner::new(tool)?);
    ctl_println!("{}", launch_vm(&provider, &config)?);
    Ok(())
}

/// Validate the arguments into an immutable launch configuration.
pub fn launch_config(args: &LaunchArgs) -> CliResult<LaunchConfig> {
    if args.kind != SUPPORTED_KIND {
        return Err(CliError::validation(
            MESSAGES.launch_unsupported_kind,
            None,
        ));
    }

    let copy_files = args
        .copy_files
        .iter()
        .map(|spec| CopyFile::parse(spec))
        .collect::<Result<Vec<_>, _>>()?;

    let config = LaunchConfig::new(
        args.name.clone(),
        args.cpus,
        args.memory.clone(),
        args.disk_size.clone(),
        args.image.clone(),
        args.ssh,
    )?
    .with_copy_files(copy_files);
    Ok(config)
}

/// Run the launch workflow and format the success summary.
pub fn launch_vm<R: ToolRunner>(
    provider: &IgniteProvider<R>,
    config: &LaunchConfig,
) -> CliResult<String> {
    let outcome = provider
        .launch(config)
        .map_err(|e| CliError::operation(e, "launch VM"))?;

    Ok(msg!(
        MESSAGES.launch_success,
        name = outcome.name,
        uid = outcome.uid.to_string(),
        ip = outcome.ip
    ))
}

fn render_dry_run(config: &LaunchConfig) -> CliResult<String> {
    let identity = NodeIdentity::generate()?;
    let manifest = Manifest::build(config, &identity).to_yaml()?;
    Ok(msg!(
        MESSAGES.launch_dry_run_manifest,
        name = config.name(),
        uid = identity.to_string(),
        manifest = manifest
    ))
}
