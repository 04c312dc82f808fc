//! Ignite VM manifests and the temporary file they are handed over in.

use std::io::{self, Write};
use std::path::Path;

use poridhi_core::error::{ProvisionError, Result};
use poridhi_core::temp_dir::{create_temp_file, create_temp_file_in};
use serde::Serialize;
use tempfile::TempPath;

use super::config::{CopyFile, LaunchConfig};
use super::identity::NodeIdentity;

pub const MANIFEST_API_VERSION: &str = "ignite.weave.works/v1alpha4";
pub const MANIFEST_KIND: &str = "VM";

const MANIFEST_FILE_PREFIX: &str = "ignite-manifest-";
const MANIFEST_FILE_SUFFIX: &str = ".yaml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub api_version: String,
    pub kind: String,
    pub metadata: ManifestMetadata,
    pub spec: VmSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestMetadata {
    pub name: String,
    pub uid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VmSpec {
    pub image: ImageSource,
    pub cpus: u32,
    pub memory: String,
    pub disk_size: String,
    pub ssh: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub copy_files: Vec<CopyFile>,
}

/// Ignite's image reference: a mapping with the single key `oci`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageSource {
    pub oci: String,
}

impl Manifest {
    /// Build the manifest for one launch. Pure: same inputs, same manifest.
    pub fn build(config: &LaunchConfig, identity: &NodeIdentity) -> Self {
        Self {
            api_version: MANIFEST_API_VERSION.to_string(),
            kind: MANIFEST_KIND.to_string(),
            metadata: ManifestMetadata {
                name: config.name().to_string(),
                uid: identity.as_str().to_string(),
            },
            spec: VmSpec {
                image: ImageSource {
                    oci: config.image().to_string(),
                },
                cpus: config.cpus(),
                memory: config.memory().to_string(),
                disk_size: config.disk_size().to_string(),
                ssh: config.ssh(),
                copy_files: config.copy_files().to_vec(),
            },
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}

/// A manifest written to a uniquely named temp file.
///
/// The file is removed when this value is dropped, on success and failure
/// paths alike.
#[derive(Debug)]
pub struct ManifestFile {
    path: TempPath,
}

impl ManifestFile {
    /// Write to the system temp directory.
    pub fn write(manifest: &Manifest) -> Result<Self> {
        Self::write_text(&manifest.to_yaml()?, None)
    }

    /// Write into `dir` instead of the system temp directory.
    pub fn write_in(manifest: &Manifest, dir: &Path) -> Result<Self> {
        Self::write_text(&manifest.to_yaml()?, Some(dir))
    }

    fn write_text(contents: &str, dir: Option<&Path>) -> Result<Self> {
        let created = match dir {
            Some(dir) => create_temp_file_in(dir, MANIFEST_FILE_PREFIX, MANIFEST_FILE_SUFFIX),
            None => create_temp_file(MANIFEST_FILE_PREFIX, MANIFEST_FILE_SUFFIX),
        };
        let mut file = created.map_err(temp_file_error("create"))?;
        // `file` deletes itself if any of the steps below bail out.
        file.write_all(contents.as_bytes())
            .map_err(temp_file_error("write"))?;
        file.flush().map_err(temp_file_error("write"))?;
        file.as_file()
            .sync_all()
            .map_err(temp_file_error("close"))?;

        Ok(Self {
            path: file.into_temp_path(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The path as an argument for the tool's command line.
    pub fn path_arg(&self) -> Result<&str> {
        self.path.to_str().ok_or_else(|| ProvisionError::TempFile {
            operation: "address",
            source: io::Error::new(
                io::ErrorKind::InvalidData,
                format!("path is not valid UTF-8: {}", self.path.display()),
            ),
        })
    }
}

fn temp_file_error(operation: &'static str) -> impl FnOnce(io::Error) -> ProvisionError {
    move |source| ProvisionError::TempFile { operation, source }
}
