//! Launch parameters for a single VM.

use poridhi_core::error::{ProvisionError, Result};
use serde::Serialize;

/// A host file copied into the guest at boot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyFile {
    pub host_path: String,
    pub vm_path: String,
}

impl CopyFile {
    /// Parse a `HOST:GUEST` pair.
    pub fn parse(spec: &str) -> Result<Self> {
        match spec.split_once(':') {
            Some((host, guest)) if !host.is_empty() && !guest.is_empty() => Ok(Self {
                host_path: host.to_string(),
                vm_path: guest.to_string(),
            }),
            _ => Err(ProvisionError::InvalidConfig {
                field: "copy-file",
                message: format!("expected HOST:GUEST, got '{spec}'"),
            }),
        }
    }
}

/// Validated, immutable parameters for one launch.
///
/// Construction enforces a non-empty name and a positive CPU count. Memory
/// and disk sizes are passed through untouched; ignite validates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfig {
    name: String,
    cpus: u32,
    memory: String,
    disk_size: String,
    image: String,
    ssh: bool,
    copy_files: Vec<CopyFile>,
}

impl LaunchConfig {
    pub fn new(
        name: impl Into<String>,
        cpus: u32,
        memory: impl Into<String>,
        disk_size: impl Into<String>,
        image: impl Into<String>,
        ssh: bool,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ProvisionError::InvalidConfig {
                field: "name",
                message: "VM name must not be empty".to_string(),
            });
        }
        if cpus == 0 {
            return Err(ProvisionError::InvalidConfig {
                field: "cpus",
                message: "CPU count must be greater than zero".to_string(),
            });
        }
        Ok(Self {
            name,
            cpus,
            memory: memory.into(),
            disk_size: disk_size.into(),
            image: image.into(),
            ssh,
            copy_files: Vec::new(),
        })
    }

    pub fn with_copy_files(mut self, copy_files: Vec<CopyFile>) -> Self {
        self.copy_files = copy_files;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cpus(&self) -> u32 {
        self.cpus
    }

    pub fn memory(&self) -> &str {
        &self.memory
    }

    pub fn disk_size(&self) -> &str {
        &self.disk_size
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn ssh(&self) -> bool {
        self.ssh
    }

    pub fn copy_files(&self) -> &[CopyFile] {
        &self.copy_files
    }
}
