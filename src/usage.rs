//! Rough monthly API call counting.
//!
//! The counter lives in the API file next to the credentials. It is reset
//! when more than [`ROLLOVER_DAYS`] have passed since `last_date`; a reset
//! also discards the OCR history.

use crate::api_file::ApiFile;
use crate::paths::AppPaths;
use anyhow::{Context, Result};
use chrono::NaiveDate;

/// Days after `last_date` beyond which a new month is assumed.
pub const ROLLOVER_DAYS: i64 = 32;

/// Persisted usage state with defaults resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageRecord {
    pub last_date: NaiveDate,
    pub month_usage: u32,
}

impl UsageRecord {
    pub fn from_file(file: &ApiFile, today: NaiveDate) -> Self {
        Self {
            last_date: file.last_date.unwrap_or(today),
            month_usage: file.month_usage.unwrap_or(0),
        }
    }

    pub fn is_new_month(&self, today: NaiveDate) -> bool {
        (today - self.last_date).num_days() > ROLLOVER_DAYS
    }
}

/// Counts this run against the monthly budget.
///
/// Returns the usage observed before this run was counted. When that value
/// is already at or above `threshold` nothing is written.
pub fn record_and_get_usage(paths: &AppPaths, threshold: u32, today: NaiveDate) -> Result<u32> {
    let mut file = ApiFile::load_or_default(&paths.api_file)?;
    let mut record = UsageRecord::from_file(&file, today);

    if record.is_new_month(today) {
        tracing::debug!(
            "New month since {}, resetting usage of {}",
            record.last_date,
            record.month_usage
        );
        record = UsageRecord {
            last_date: today,
            month_usage: 0,
        };
        if paths.history_file.exists() {
            std::fs::remove_file(&paths.history_file).with_context(|| {
                format!(
                    "Failed to remove history file: {}",
                    paths.history_file.display()
                )
            })?;
        }
    }

    let observed = record.month_usage;
    if observed < threshold {
        file.last_date = Some(record.last_date);
        file.month_usage = Some(observed + 1);
        file.save(&paths.api_file)?;
    }

    Ok(observed)
}

#[cfg(test)]
#[path = "tests/usage_tests.rs"]
mod tests;
