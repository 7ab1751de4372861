//! Error types for organization commands.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrgError {
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = anyhow::Result<T>;

/// Write `contents` to `path`, creating parent directories.
pub(crate) fn write_file(path: &std::path::Path, contents: &str) -> Result<()> {
    let to_error = |source| OrgError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(to_error)?;
    }
    std::fs::write(path, contents).map_err(to_error)?;
    Ok(())
}
