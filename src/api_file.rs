//! The `.mathpix_api.json` document.
//!
//! Credentials and the monthly usage counter share one JSON object on disk.
//! Keys this program does not know about are carried through rewrites untouched.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_usage: Option<u32>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ApiFile {
    /// Loads the document, or `None` when the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read API file: {}", path.display()))?;
        let file = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse API file: {}", path.display()))?;
        Ok(Some(file))
    }

    /// Loads the document, treating a missing file as empty.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        Ok(Self::load(path)?.unwrap_or_default())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize API file")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write API file: {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/api_file_tests.rs"]
mod tests;
