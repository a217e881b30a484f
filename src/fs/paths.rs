//! Path and directory management.

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Temporary path a file is streamed into before being moved into place.
pub fn partial_path(dir: &Path, filename: &str) -> PathBuf {
    dir.join(format!(".{}.{}.part", filename, uuid::Uuid::new_v4()))
}
