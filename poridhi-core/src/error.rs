use std::fmt::{self, Display, Formatter};
use std::io;
use std::time::Duration;
use thiserror::Error;

/// The stage of a launch that produced an error.
///
/// Launches move strictly forward through these stages; the first failure
/// aborts the rest of the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchStage {
    GenerateIdentity,
    BuildManifest,
    WriteManifest,
    RunTool,
    QueryStatus,
    ResolveAddress,
}

impl Display for LaunchStage {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let phrase = match self {
            LaunchStage::GenerateIdentity => "generate UID",
            LaunchStage::BuildManifest => "build manifest",
            LaunchStage::WriteManifest => "create manifest file",
            LaunchStage::RunTool => "run ignite",
            LaunchStage::QueryStatus => "get VM status",
            LaunchStage::ResolveAddress => "get VM IP",
        };
        f.write_str(phrase)
    }
}

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("random source unavailable: {0}")]
    EntropyUnavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("failed to {operation} manifest file: {source}")]
    TempFile {
        operation: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("{command} command failed: {status}\nStdout: {stdout}\nStderr: {stderr}")]
    ProcessFailed {
        command: String,
        status: String,
        stdout: String,
        stderr: String,
    },

    #[error("failed to start '{command}': {source}")]
    ProcessSpawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("command timed out after {after:?}: {command}")]
    Timeout { command: String, after: Duration },

    #[error("IP address not found for VM: {0}")]
    AddressNotFound(String),

    #[error("invalid {field}: {message}")]
    InvalidConfig {
        field: &'static str,
        message: String,
    },

    #[error("Dependency not found: {0}")]
    Dependency(String),

    #[error("failed to {stage}: {source}")]
    Launch {
        stage: LaunchStage,
        #[source]
        source: Box<ProvisionError>,
    },

    #[error("failed to list VMs: {source}")]
    List {
        #[source]
        source: Box<ProvisionError>,
    },
}

impl ProvisionError {
    /// Wrap an error with the launch stage it came from.
    pub fn at_stage(self, stage: LaunchStage) -> Self {
        ProvisionError::Launch {
            stage,
            source: Box::new(self),
        }
    }

    /// The stage a launch failed at, if this error came out of one.
    pub fn stage(&self) -> Option<LaunchStage> {
        match self {
            ProvisionError::Launch { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Innermost error, skipping stage and listing wrappers.
    pub fn root_cause(&self) -> &ProvisionError {
        match self {
            ProvisionError::Launch { source, .. } | ProvisionError::List { source } => {
                source.root_cause()
            }
            other => other,
        }
    }
}

impl From<serde_yaml_ng::Error> for ProvisionError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        ProvisionError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for ProvisionError {
    fn from(err: serde_json::Error) -> Self {
        ProvisionError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ProvisionError>;
