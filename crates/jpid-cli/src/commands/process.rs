//! Process command - extract fields from a single document image.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use jpid_core::input::sniff_format;
use jpid_core::{InputError, JpidConfig};

use super::{OutputFormat, load_config, parse_with_deadline, render, tesseract_factory};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input image (PNG or JPEG)
    #[arg(required = true)]
    input: PathBuf,

    /// Document type identifier (see `jpid types`)
    #[arg(short = 't', long)]
    document_type: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

pub async fn run(args: ProcessArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let factory = tesseract_factory(&config)?;
    let parser = factory.get_parser(args.document_type.trim())?;

    let image = read_image(&args.input, &config)?;
    info!("Processing {} as {}", args.input.display(), parser.document_type());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Running OCR...");

    let timeout = Duration::from_secs(config.server.request_timeout_secs);
    let result = parse_with_deadline(parser, image, timeout).await;
    pb.finish_and_clear();
    let result = result?;

    let output = render(&result, args.format)?;
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());
    Ok(())
}

/// Read an image file, enforcing the configured size limit and PNG/JPEG
/// magic bytes.
pub(crate) fn read_image(path: &Path, config: &JpidConfig) -> anyhow::Result<Vec<u8>> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    let bytes = fs::read(path)?;
    if bytes.is_empty() {
        return Err(InputError::EmptyImage.into());
    }
    if bytes.len() > config.input.max_image_bytes {
        return Err(InputError::TooLarge {
            limit: config.input.max_image_bytes,
        }
        .into());
    }
    let format = sniff_format(&bytes)?;
    debug!("{}: {} byte {:?} image", path.display(), bytes.len(), format);
    Ok(bytes)
}
