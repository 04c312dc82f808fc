// CLI argument parsing and definitions

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

pub const DEFAULT_IMAGE: &str = "shajalahamedcse/only-k3-go:v1.0.10";

#[derive(Debug, Clone, Parser)]
#[command(name = "poridhictl")]
#[command(about = "poridhictl is a CLI tool for managing VM provisioning")]
#[command(
    long_about = "A CLI tool that allows you to provision and manage virtual machines \
                  using Weave Ignite through a simple command line interface."
)]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Ignite binary to invoke
    #[arg(long, global = true, env = "PORIDHI_IGNITE_BIN", default_value = "ignite")]
    pub ignite_bin: String,

    /// Run ignite directly instead of through sudo
    #[arg(long, global = true, env = "PORIDHI_NO_SUDO")]
    pub no_sudo: bool,

    /// Give up on a single ignite call after this many seconds
    #[arg(long, global = true, env = "PORIDHI_TOOL_TIMEOUT", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Show what would be executed without running
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Launch a new VM
    #[command(
        long_about = "Launch a new virtual machine with specified configuration using Weave Ignite"
    )]
    Launch(LaunchArgs),

    /// List all VMs
    #[command(long_about = "Display all running virtual machines in a tabular format")]
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Launch(_) => "launch",
            Command::List { .. } => "list",
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct LaunchArgs {
    /// Kind of resource to launch (only "vm")
    pub kind: String,

    /// Name of the VM
    #[arg(short, long)]
    pub name: String,

    /// Number of CPUs
    #[arg(short, long, default_value_t = 2)]
    pub cpus: u32,

    /// Memory size
    #[arg(short, long, default_value = "1GB")]
    pub memory: String,

    /// Disk size
    #[arg(short, long, default_value = "3GB")]
    pub disk_size: String,

    /// OCI image
    #[arg(short, long, default_value = DEFAULT_IMAGE)]
    pub image: String,

    /// Enable SSH (`--ssh=false` to disable)
    #[arg(
        short,
        long,
        default_value_t = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub ssh: bool,

    /// Copy a host file into the VM (repeatable)
    #[arg(long = "copy-file", value_name = "HOST:GUEST")]
    pub copy_files: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
