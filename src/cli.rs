use crate::config::DEFAULT_THRESHOLD;
use crate::ocr::{OcrFormat, DEFAULT_TIMEOUT};
use clap::Parser;
use std::path::PathBuf;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("MATHPIX_CLIP_GIT_SHA"),
    ")"
);

/// Convert an image of a formula to LaTeX with the Mathpix OCR API and copy
/// the code to the system clipboard.
///
/// Credentials are read from --app_id/--app_key, the `app_id`/`app_key`
/// environment variables, or `.mathpix_api.json` beside the program.
#[derive(Parser, Debug)]
#[command(name = "mathpix-clip")]
#[command(version, long_version = LONG_VERSION)]
pub struct Cli {
    #[arg(long = "app_key")]
    pub app_key: Option<String>,

    #[arg(long = "app_id")]
    pub app_id: Option<String>,

    /// LaTeX format requested from the OCR API
    #[arg(long, value_enum, default_value_t = OcrFormat::LatexSimplified)]
    pub format: OcrFormat,

    /// Threshold for API calls per month
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    pub thres: u32,

    /// Path to the image file (default: image on the clipboard)
    #[arg(short = 'i', value_name = "IMAGE")]
    pub image: Option<PathBuf>,

    /// Debug mode: print request headers and the raw response
    #[arg(short = 'D')]
    pub debug: bool,

    /// Print the output (OCR result or error message) to stdout instead of the clipboard
    #[arg(short = 'p')]
    pub print: bool,

    /// Directory holding the API, history and temporary image files
    /// (default: directory of the executable)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// OCR endpoint override
    #[arg(long, hide = true)]
    pub endpoint: Option<String>,
}
