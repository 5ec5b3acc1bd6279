mod api_file;
mod cli;
mod clipboard;
mod config;
mod credentials;
mod error;
mod history;
mod image_source;
mod ocr;
mod paths;
mod pipeline;
mod usage;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Cli;
use crate::config::Settings;
use crate::credentials::Credentials;
use crate::image_source::SystemImageGrabber;
use crate::ocr::OcrClient;
use crate::pipeline::{Collaborators, Outcome};

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.debug);

    let settings = Settings::from_cli(cli)?;
    tracing::debug!("Data directory: {}", settings.paths.data_dir.display());

    let credentials = Credentials::resolve(
        settings.app_id.as_deref(),
        settings.app_key.as_deref(),
        &settings.paths.api_file,
    )?;
    let client = OcrClient::new(credentials, &settings.endpoint, settings.timeout);
    if settings.debug {
        println!("{}", client.header_dump());
    }

    let mut writer = clipboard::writer_for(settings.to_stdout)?;
    let deps = Collaborators {
        ocr: &client,
        grabber: &SystemImageGrabber,
        writer: writer.as_mut(),
        debug_out: &mut std::io::stdout(),
    };

    match pipeline::run(&settings, deps, chrono::Local::now().naive_local())? {
        Outcome::Recognized(latex) => tracing::debug!("Delivered {} bytes of LaTeX", latex.len()),
        Outcome::ImageNotFound => tracing::debug!("No image to recognize"),
        Outcome::ServiceError(message) => tracing::debug!("Service error delivered: {}", message),
    }
    Ok(())
}

fn setup_logging(debug: bool) {
    let default_filter = if debug {
        "mathpix_clip=debug"
    } else {
        "mathpix_clip=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
