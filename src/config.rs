//! Run configuration, built once from the command line.

use crate::cli::Cli;
use crate::ocr::{OcrFormat, DEFAULT_ENDPOINT};
use crate::paths::AppPaths;
use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_THRESHOLD: u32 = 900;

#[derive(Debug, Clone)]
pub struct Settings {
    pub paths: AppPaths,
    pub format: OcrFormat,
    /// Monthly call budget
    pub threshold: u32,
    /// Explicit image; `None` reads the clipboard
    pub image: Option<PathBuf>,
    pub debug: bool,
    pub to_stdout: bool,
    pub app_id: Option<String>,
    pub app_key: Option<String>,
    pub endpoint: String,
    pub timeout: Duration,
}

impl Settings {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let paths = match &cli.data_dir {
            Some(dir) => AppPaths::custom(dir)?,
            None => AppPaths::beside_executable()?,
        };

        Ok(Self {
            paths,
            format: cli.format,
            threshold: cli.thres,
            image: cli.image,
            debug: cli.debug,
            to_stdout: cli.print,
            app_id: cli.app_id,
            app_key: cli.app_key,
            endpoint: cli
                .endpoint
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            timeout: Duration::from_secs(cli.timeout),
        })
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
