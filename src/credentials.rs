//! Mathpix application credential resolution.
//!
//! Sources, in order:
//! 1. Explicit `--app_id` / `--app_key` values (used only when both are given)
//! 2. The `app_id` / `app_key` environment variables
//! 3. The `app_id` / `app_key` keys of `.mathpix_api.json`

use crate::api_file::ApiFile;
use crate::error::ClipError;
use anyhow::Result;
use std::path::Path;

const APP_ID_VAR: &str = "app_id";
const APP_KEY_VAR: &str = "app_key";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub app_id: String,
    pub app_key: String,
}

impl Credentials {
    /// Resolves the credential pair.
    ///
    /// If either explicit value is missing, both are re-derived from the
    /// environment, and if either environment value is missing as well, both
    /// are taken from the API file.
    ///
    /// # Errors
    ///
    /// Returns `ClipError::Configuration` when a value is still unset after
    /// all sources, or a parse error when the API file is malformed.
    pub fn resolve(
        explicit_id: Option<&str>,
        explicit_key: Option<&str>,
        api_file: &Path,
    ) -> Result<Self> {
        if let (Some(app_id), Some(app_key)) = (explicit_id, explicit_key) {
            return Ok(Self {
                app_id: app_id.to_string(),
                app_key: app_key.to_string(),
            });
        }

        let mut app_id = std::env::var(APP_ID_VAR).ok();
        let mut app_key = std::env::var(APP_KEY_VAR).ok();

        if app_id.is_none() || app_key.is_none() {
            if let Some(file) = ApiFile::load(api_file)? {
                tracing::debug!("Reading credentials from {}", api_file.display());
                app_id = file.app_id;
                app_key = file.app_key;
            }
        }

        match (app_id, app_key) {
            (Some(app_id), Some(app_key)) => Ok(Self { app_id, app_key }),
            (app_id, _) => {
                let missing = if app_id.is_none() {
                    APP_ID_VAR
                } else {
                    APP_KEY_VAR
                };
                Err(ClipError::Configuration(format!(
                    "`{}` not found in flags, environment or {}",
                    missing,
                    api_file.display()
                ))
                .into())
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/credentials_tests.rs"]
mod tests;
