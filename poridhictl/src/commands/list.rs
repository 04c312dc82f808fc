//! `poridhictl list`

use colored::Colorize;
use poridhi_core::command_stream::{CommandRunner, ToolConfig, ToolRunner};
use poridhi_core::ctl_println;
use poridhi_core::error::ProvisionError;
use poridhi_messages::messages::MESSAGES;
use poridhi_messages::msg;
use poridhi_provider::ignite::RECORD_HEADERS;
use poridhi_provider::{IgniteProvider, VmRecord};
use tracing::info_span;

use crate::cli::OutputFormat;
use crate::error::{CliError, CliResult};

pub fn handle_list(output: OutputFormat, tool: ToolConfig, dry_run: bool) -> CliResult<()> {
    let span = info_span!("vm_operation", operation = "list");
    let _enter = span.enter();

    if dry_run {
        ctl_println!("{}", MESSAGES.dry_run_header);
        ctl_println!(
            "{}",
            msg!(MESSAGES.list_dry_run, command = tool.argv(&["ps"]).join(" "))
        );
        return Ok(());
    }

    let provider = IgniteProvider::new(CommandRunner::new(tool)?);
    ctl_println!("{}", list_vms(&provider, output)?);
    Ok(())
}

/// Fetch the listing and render it in the requested format.
pub fn list_vms<R: ToolRunner>(
    provider: &IgniteProvider<R>,
    output: OutputFormat,
) -> CliResult<String> {
    let records = provider.list()?;
    match output {
        OutputFormat::Table => Ok(render_table(&records)),
        OutputFormat::Json => serde_json::to_string_pretty(&records)
            .map_err(|e| CliError::operation(ProvisionError::from(e), "render VM list")),
    }
}

/// Boxed table with a highlighted header row.
pub fn render_table(records: &[VmRecord]) -> String {
    let mut widths = RECORD_HEADERS.map(|h| h.chars().count());
    for record in records {
        for (width, cell) in widths.iter_mut().zip(record.columns()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let border = |left: &str, mid: &str, right: &str| {
        let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{left}{}{right}", segments.join(mid))
    };
    let row = |cells: [&str; 10], header: bool| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| {
                let text = format!("{cell:<width$}");
                if header {
                    format!(" {} ", text.bright_cyan())
                } else {
                    format!(" {text} ")
                }
            })
            .collect();
        format!("│{}│", padded.join("│"))
    };

    let mut lines = vec![border("┌", "┬", "┐"), row(RECORD_HEADERS, true)];
    lines.push(border("├", "┼", "┤"));
    lines.extend(records.iter().map(|r| row(r.columns(), false)));
    lines.push(border("└", "┴", "┘"));
    lines.join("\n")
}
