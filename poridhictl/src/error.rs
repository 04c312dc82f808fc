//! Error types for the poridhictl binary.
//!
//! Core failures arrive as `ProvisionError`; this layer adds what the user
//! was trying to do and separates bad input from failed operations.

use std::error::Error;
use std::fmt;

use poridhi_core::error::ProvisionError;

#[derive(Debug)]
pub enum CliError {
    /// Input rejected before anything ran
    Validation {
        message: String,
        field: Option<String>,
    },

    /// A provisioning operation that started and failed
    Operation {
        source: ProvisionError,
        operation: String,
    },

    /// Setup failures such as a missing ignite binary
    Provision(ProvisionError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Validation {
                message,
                field: Some(field),
            } => write!(f, "invalid {field}: {message}"),
            CliError::Validation {
                message,
                field: None,
            } => f.write_str(message),
            CliError::Operation { source, operation } => {
                write!(f, "failed to {operation}: {source}")
            }
            CliError::Provision(source) => write!(f, "{source}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CliError::Operation { source, .. } | CliError::Provision(source) => Some(source),
            CliError::Validation { .. } => None,
        }
    }
}

impl CliError {
    pub fn validation(message: impl Into<String>, field: Option<&str>) -> Self {
        Self::Validation {
            message: message.into(),
            field: field.map(str::to_string),
        }
    }

    pub fn operation(source: ProvisionError, operation: impl Into<String>) -> Self {
        Self::Operation {
            source,
            operation: operation.into(),
        }
    }
}

/// Bad launch parameters surface as validation errors, everything else as-is.
impl From<ProvisionError> for CliError {
    fn from(err: ProvisionError) -> Self {
        match err {
            ProvisionError::InvalidConfig { field, message } => {
                CliError::validation(message, Some(field))
            }
            other => CliError::Provision(other),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
