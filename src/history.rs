//! Archive of successful OCR replies, keyed by local timestamp.

use crate::ocr::OcrResult;
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::path::Path;

/// Timestamp key format: ISO 8601 with second precision.
const KEY_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub type History = BTreeMap<String, OcrResult>;

pub fn history_key(now: NaiveDateTime) -> String {
    now.format(KEY_FORMAT).to_string()
}

/// Loads the history, empty when the file does not exist.
pub fn load_history(path: &Path) -> Result<History> {
    if !path.exists() {
        return Ok(History::new());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read history: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse history: {}", path.display()))
}

/// Adds `result` under the timestamp of `now`, replacing any entry from the same second.
pub fn append_history(path: &Path, result: &OcrResult, now: NaiveDateTime) -> Result<()> {
    let mut history = load_history(path)?;
    let key = history_key(now);
    tracing::debug!("Recording history entry {}", key);
    history.insert(key, result.clone());

    // Going through Value sorts the keys of every nested object, not just the top level
    let value = serde_json::to_value(&history).context("Failed to serialize history")?;
    let content = serde_json::to_string_pretty(&value).context("Failed to serialize history")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write history: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/history_tests.rs"]
mod tests;
