use std::io::Result;
use std::path::Path;
use tempfile::{Builder, NamedTempFile};

/// Creates a uniquely named temporary file in the system temp directory.
/// The file is automatically deleted when the `NamedTempFile` object is dropped.
pub fn create_temp_file(prefix: &str, suffix: &str) -> Result<NamedTempFile> {
    Builder::new().prefix(prefix).suffix(suffix).tempfile()
}

/// Like [`create_temp_file`], but inside `dir`.
pub fn create_temp_file_in(dir: &Path, prefix: &str, suffix: &str) -> Result<NamedTempFile> {
    Builder::new().prefix(prefix).suffix(suffix).tempfile_in(dir)
}
