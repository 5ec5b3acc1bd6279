//! Error kinds surfaced by the OCR pipeline.
//!
//! `ImageNotFound` and `RemoteService` are not process failures: their
//! `Display` output is the text delivered to the user in place of LaTeX.
//! The remaining variants abort the run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipError {
    /// app_id / app_key could not be resolved from any source
    #[error("API keys are not properly set: {0}")]
    Configuration(String),

    /// The resolved image path does not exist (empty when the clipboard had no image)
    #[error("image not found {0}")]
    ImageNotFound(String),

    /// The OCR service answered with an `error` field
    #[error("Error: {message}. {usage} API calls used")]
    RemoteService { message: String, usage: u32 },

    /// Transport failure or timeout talking to the OCR service
    #[error("request to {endpoint} failed: {reason}")]
    Network { endpoint: String, reason: String },

    /// A successful reply that lacks the requested LaTeX field
    #[error("OCR response has no `{0}` field")]
    MissingFormat(String),

    /// No clipboard utility is available, or it exited unsuccessfully
    #[error("clipboard write failed: {0}")]
    Clipboard(String),
}
