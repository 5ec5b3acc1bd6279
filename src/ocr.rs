//! Mathpix OCR request/response types and the blocking HTTP client.

use crate::credentials::Credentials;
use crate::error::ClipError;
use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.mathpix.com/v3/latex";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// LaTeX flavour requested from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OcrFormat {
    #[default]
    #[value(name = "latex_simplified")]
    LatexSimplified,
    #[value(name = "latex_styled")]
    LatexStyled,
}

impl OcrFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OcrFormat::LatexSimplified => "latex_simplified",
            OcrFormat::LatexStyled => "latex_styled",
        }
    }
}

impl std::fmt::Display for OcrFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON body of a `/v3/latex` request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OcrRequest {
    pub src: String,
    pub formats: Vec<OcrFormat>,
}

impl OcrRequest {
    pub fn from_image(image: &Path, format: OcrFormat) -> Result<Self> {
        Ok(Self {
            src: image_uri(image)?,
            formats: vec![format],
        })
    }
}

/// Reply from the service.
///
/// The parsed reply is kept as received and is what gets archived or printed;
/// the typed fields are a read-only view over it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct OcrResult {
    pub error: Option<Value>,
    pub latex_simplified: Option<String>,
    pub latex_styled: Option<String>,
    raw: Value,
}

/// Keys of the reply this program reads.
#[derive(Deserialize)]
struct ReplyFields {
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    latex_simplified: Option<String>,
    #[serde(default)]
    latex_styled: Option<String>,
}

impl TryFrom<Value> for OcrResult {
    type Error = serde_json::Error;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        let fields: ReplyFields = serde_json::from_value(raw.clone())?;
        Ok(Self {
            error: fields.error,
            latex_simplified: fields.latex_simplified,
            latex_styled: fields.latex_styled,
            raw,
        })
    }
}

impl From<OcrResult> for Value {
    fn from(result: OcrResult) -> Self {
        result.raw
    }
}

impl OcrResult {
    /// The reply exactly as parsed, including keys with `null` values.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// The service's error, rendered for display. Strings are used as-is.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| match e {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    pub fn latex(&self, format: OcrFormat) -> Option<&str> {
        match format {
            OcrFormat::LatexSimplified => self.latex_simplified.as_deref(),
            OcrFormat::LatexStyled => self.latex_styled.as_deref(),
        }
    }
}

/// Returns the image as a base64 data URI.
///
/// The media type is always `image/jpg`; the service sniffs the real encoding.
pub fn image_uri(path: &Path) -> Result<String> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read image: {}", path.display()))?;
    Ok(format!("data:image/jpg;base64,{}", BASE64.encode(data)))
}

/// Anything that can answer an OCR request.
pub trait OcrService {
    fn submit(&self, request: &OcrRequest) -> Result<OcrResult>;
}

/// Builds the request for `image` and submits it to `service`.
pub fn request_ocr(service: &dyn OcrService, image: &Path, format: OcrFormat) -> Result<OcrResult> {
    let request = OcrRequest::from_image(image, format)?;
    service.submit(&request)
}

/// Blocking Mathpix client.
pub struct OcrClient {
    agent: ureq::Agent,
    endpoint: String,
    credentials: Credentials,
}

impl OcrClient {
    pub fn new(credentials: Credentials, endpoint: &str, timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            // Mathpix reports failures in the JSON body; keep non-2xx replies readable
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            endpoint: endpoint.to_string(),
            credentials,
        }
    }

    /// Request headers as (name, value) pairs.
    pub fn headers(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("Content-type", "application/json"),
            ("app_id", self.credentials.app_id.as_str()),
            ("app_key", self.credentials.app_key.as_str()),
        ]
    }

    /// Headers as `name: value` lines, for `-D` output.
    pub fn header_dump(&self) -> String {
        self.headers()
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn network_error(&self, reason: impl std::fmt::Display) -> ClipError {
        ClipError::Network {
            endpoint: self.endpoint.clone(),
            reason: reason.to_string(),
        }
    }
}

impl OcrService for OcrClient {
    fn submit(&self, request: &OcrRequest) -> Result<OcrResult> {
        let body = serde_json::to_string(request).context("Failed to serialize OCR request")?;

        let mut builder = self.agent.post(self.endpoint.as_str());
        for (name, value) in self.headers() {
            builder = builder.header(name, value);
        }

        tracing::debug!("POST {} ({} bytes)", self.endpoint, body.len());
        let mut response = builder.send(&body).map_err(|e| self.network_error(e))?;
        let status = response.status();
        let text = response
            .body_mut()
            .read_to_string()
            .map_err(|e| self.network_error(e))?;
        tracing::debug!("OCR service answered {}", status);

        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse OCR response (HTTP {})", status))
    }
}

#[cfg(test)]
#[path = "tests/ocr_tests.rs"]
mod tests;
