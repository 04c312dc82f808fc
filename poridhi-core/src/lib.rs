pub mod command_stream;
pub mod error;
pub mod output_macros;
pub mod temp_dir;

pub use command_stream::{CommandRunner, ProcessResult, ToolConfig, ToolRunner};
pub use error::{LaunchStage, ProvisionError, Result};
