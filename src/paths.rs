//! Storage paths for mathpix-clip persistence.
//!
//! All files live in a single data directory, by default the directory that
//! holds the (symlink-resolved) executable:
//! - `.mathpix_api.json` - credentials and monthly usage counter
//! - `.mathpix_hist.json` - history of successful OCR replies
//! - `.temp_eq.png` - last image grabbed from the clipboard

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const API_FILENAME: &str = ".mathpix_api.json";
const HISTORY_FILENAME: &str = ".mathpix_hist.json";
const TEMP_IMAGE_FILENAME: &str = ".temp_eq.png";

/// Resolved file locations, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub data_dir: PathBuf,
    pub api_file: PathBuf,
    pub history_file: PathBuf,
    pub temp_image: PathBuf,
}

impl AppPaths {
    /// Paths rooted at `dir`. Does not touch the filesystem.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            data_dir: dir.to_path_buf(),
            api_file: dir.join(API_FILENAME),
            history_file: dir.join(HISTORY_FILENAME),
            temp_image: dir.join(TEMP_IMAGE_FILENAME),
        }
    }

    /// Paths rooted at a user-chosen directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn custom(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
        Ok(Self::in_dir(dir))
    }

    /// Paths beside the running executable, falling back to the home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if neither the executable directory nor the home
    /// directory can be determined.
    pub fn beside_executable() -> Result<Self> {
        let dir = executable_dir()
            .or_else(dirs::home_dir)
            .context("Could not determine executable or home directory for data files")?;
        Ok(Self::in_dir(&dir))
    }
}

fn executable_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    // Resolve symlinks so an installed link still finds the files next to the real binary
    let exe = fs::canonicalize(&exe).unwrap_or(exe);
    exe.parent().map(Path::to_path_buf)
}

#[cfg(test)]
#[path = "tests/paths_tests.rs"]
mod tests;
