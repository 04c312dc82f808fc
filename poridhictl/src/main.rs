// Standard library
use std::sync::OnceLock;

// External crates
use clap::Parser;
use tracing::{debug, info_span};
use uuid::Uuid;

// Internal imports
use poridhi_core::ctl_error;
use poridhi_logging::LogSettings;
use poridhi_messages::messages::MESSAGES;
use poridhi_messages::msg;

// Local modules
mod cli;
mod commands;
mod error;

use cli::Args;
use commands::execute_command;

/// Request ID for this execution, attached to every log line.
static REQUEST_ID: OnceLock<String> = OnceLock::new();

fn get_request_id() -> &'static str {
    REQUEST_ID.get_or_init(|| Uuid::new_v4().to_string())
}

fn main() {
    let args = Args::parse();

    // Tests assert on exact output, so logging stays off in test mode
    let log_guard = if std::env::var("PORIDHI_TEST_MODE").is_err() {
        let mut settings = LogSettings::from_env();
        if args.debug {
            settings.level = "debug".to_string();
        }
        poridhi_logging::init_with(settings)
    } else {
        None
    };

    let span = info_span!(
        "request",
        request_id = get_request_id(),
        command = args.command.name()
    );
    let _enter = span.enter();

    debug!("starting poridhictl");

    if let Err(e) = execute_command(args) {
        ctl_error!("{}", msg!(MESSAGES.error_generic, error = e.to_string()));
        drop(log_guard);
        std::process::exit(1);
    }
}
