//! One recognition run: image → usage count → OCR → history → delivery.

use crate::clipboard::ClipboardWriter;
use crate::config::Settings;
use crate::error::ClipError;
use crate::history;
use crate::image_source::{self, ImageGrabber};
use crate::ocr::{self, OcrService};
use crate::usage;
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::io::Write;

/// How a run ended. Every variant has delivered text to the writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// LaTeX was delivered and archived
    Recognized(String),
    /// No usable image; nothing was sent
    ImageNotFound,
    /// The service reported an error; its message was delivered
    ServiceError(String),
}

/// External collaborators of a run.
pub struct Collaborators<'a> {
    pub ocr: &'a dyn OcrService,
    pub grabber: &'a dyn ImageGrabber,
    pub writer: &'a mut dyn ClipboardWriter,
    /// Receives the raw reply under `-D`
    pub debug_out: &'a mut dyn Write,
}

pub fn run(settings: &Settings, deps: Collaborators<'_>, now: NaiveDateTime) -> Result<Outcome> {
    let Collaborators {
        ocr: service,
        grabber,
        writer,
        debug_out,
    } = deps;
    let paths = &settings.paths;

    let image = image_source::resolve_image(settings.image.as_deref(), grabber, &paths.temp_image);
    let image = match image {
        Some(path) if path.is_file() => path,
        other => {
            let shown = other
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            writer.deliver(&ClipError::ImageNotFound(shown).to_string())?;
            return Ok(Outcome::ImageNotFound);
        }
    };
    tracing::debug!("Using image {}", image.display());

    let usage = usage::record_and_get_usage(paths, settings.threshold, now.date())?;
    if usage >= settings.threshold {
        tracing::warn!(
            "{} API calls this month, threshold is {}",
            usage,
            settings.threshold
        );
        writer.deliver(&format!("Large API calls ({}) this month ", usage))?;
    }

    let result = ocr::request_ocr(service, &image, settings.format)?;
    if settings.debug {
        writeln!(debug_out, "{}", result.raw()).context("Failed to write OCR response")?;
    }

    if let Some(message) = result.error_message() {
        let text = ClipError::RemoteService { message, usage }.to_string();
        writer.deliver(&text)?;
        return Ok(Outcome::ServiceError(text));
    }

    history::append_history(&paths.history_file, &result, now)?;
    let latex = result
        .latex(settings.format)
        .ok_or_else(|| ClipError::MissingFormat(settings.format.to_string()))?
        .to_string();
    writer.deliver(&latex)?;
    Ok(Outcome::Recognized(latex))
}

#[cfg(test)]
#[path = "tests/pipeline_tests.rs"]
mod tests;
