//! Replay command - run extraction over captured OCR output.
//!
//! Useful for tuning patterns without a tesseract install: the recorded
//! text and fragments go through the same region and fallback stages as a
//! live image.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Args;
use tracing::info;

use jpid_core::{OcrBackend, ParserFactory, RecordedOcrBackend, RecordedOutput};

use super::{OutputFormat, load_config, parse_with_deadline, render};

/// Stand-in image bytes; recorded engines only check for non-empty input.
const REPLAY_IMAGE: &[u8] = b"recorded";

/// Arguments for the replay command.
#[derive(Args)]
pub struct ReplayArgs {
    /// Document type identifier (see `jpid types`)
    #[arg(short = 't', long)]
    document_type: String,

    /// File holding recognized flat text
    #[arg(long)]
    text: Option<PathBuf>,

    /// JSON array of categorized fragments
    #[arg(long)]
    regions: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

pub async fn run(args: ReplayArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let output = recorded_output(args.text.as_deref(), args.regions.as_deref())?;

    let backend: Arc<dyn OcrBackend> = Arc::new(RecordedOcrBackend::new(output));
    let factory = ParserFactory::with_builtin(backend)?;
    let parser = factory.get_parser(args.document_type.trim())?;
    info!("Replaying recorded output as {}", parser.document_type());

    let timeout = Duration::from_secs(config.server.request_timeout_secs);
    let result = parse_with_deadline(parser, REPLAY_IMAGE.to_vec(), timeout).await?;

    println!("{}", render(&result, args.format)?);
    Ok(())
}

fn recorded_output(text: Option<&Path>, regions: Option<&Path>) -> anyhow::Result<RecordedOutput> {
    if text.is_none() && regions.is_none() {
        bail!("Provide --text, --regions or both");
    }

    let mut output = RecordedOutput::default();
    if let Some(path) = text {
        output.text = Some(
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
        );
    }
    if let Some(path) = regions {
        output.regions = Some(
            RecordedOutput::load_regions(path)
                .with_context(|| format!("Failed to load regions from {}", path.display()))?,
        );
    }
    Ok(output)
}
