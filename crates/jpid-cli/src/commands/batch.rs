//! Batch command - extract fields from every image matching a glob.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use jpid_core::models::document::fields;
use jpid_core::{DocumentType, ParseResult};

use super::process::read_image;
use super::{OutputFormat, load_config, parse_with_deadline, render, tesseract_factory};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching input images
    #[arg(required = true)]
    input: String,

    /// Document type identifier shared by every input
    #[arg(short = 't', long)]
    document_type: String,

    /// Directory receiving one output file per input
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also write summary.csv
    #[arg(long)]
    summary: bool,

    /// Keep going after a file fails
    #[arg(long)]
    continue_on_error: bool,
}

/// Outcome for one input file.
struct FileOutcome {
    path: PathBuf,
    result: Result<ParseResult, String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let factory = tesseract_factory(&config)?;
    let parser = factory.get_parser(args.document_type.trim())?;
    let timeout = Duration::from_secs(config.server.request_timeout_secs);

    let files = matching_images(&args.input)?;
    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(output_dir) = &args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut outcomes = Vec::with_capacity(files.len());
    for path in files {
        let file_start = Instant::now();
        let result = match read_image(&path, &config) {
            Ok(image) => parse_with_deadline(parser.clone(), image, timeout).await,
            Err(e) => Err(e),
        };
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        let result = match result {
            Ok(parsed) => Ok(parsed),
            Err(e) if args.continue_on_error => {
                warn!("Failed to process {}: {}", path.display(), e);
                Err(e.to_string())
            }
            Err(e) => {
                pb.abandon();
                error!("Failed to process {}: {}", path.display(), e);
                anyhow::bail!("Processing failed for {}: {}", path.display(), e);
            }
        };

        outcomes.push(FileOutcome {
            path,
            result,
            processing_time_ms,
        });
        pb.inc(1);
    }
    pb.finish_with_message("Complete");

    if let Some(output_dir) = &args.output_dir {
        for outcome in &outcomes {
            if let Ok(parsed) = &outcome.result {
                let stem = outcome
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("document");
                let output_path = output_dir.join(format!("{}.{}", stem, args.format.extension()));
                fs::write(&output_path, render(parsed, args.format)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, parser.document_type(), &outcomes)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = outcomes.iter().filter(|o| o.result.is_err()).collect();
    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        outcomes.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(outcomes.len() - failed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for outcome in &failed {
            if let Err(e) = &outcome.result {
                println!("  - {}: {}", outcome.path.display(), e);
            }
        }
    }

    Ok(())
}

/// Expand a glob, keeping PNG and JPEG files.
fn matching_images(pattern: &str) -> anyhow::Result<Vec<PathBuf>> {
    let files = glob(pattern)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "png" | "jpg" | "jpeg")
        })
        .collect();
    Ok(files)
}

fn write_summary(
    path: &Path,
    document_type: DocumentType,
    outcomes: &[FileOutcome],
) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    let id_field = document_type.id_field();

    wtr.write_record([
        "filename",
        "status",
        "document_type",
        fields::NAME,
        fields::BIRTH_DATE,
        id_field,
        "processing_time_ms",
        "error",
    ])?;

    for outcome in outcomes {
        let filename = outcome
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let elapsed = outcome.processing_time_ms.to_string();

        match &outcome.result {
            Ok(parsed) => {
                let field = |key: &str| parsed.data.get(key).map(String::as_str).unwrap_or("");
                wtr.write_record([
                    filename,
                    "success",
                    document_type.as_str(),
                    field(fields::NAME),
                    field(fields::BIRTH_DATE),
                    field(id_field),
                    elapsed.as_str(),
                    "",
                ])?;
            }
            Err(e) => {
                wtr.write_record([
                    filename,
                    "failed",
                    document_type.as_str(),
                    "",
                    "",
                    "",
                    elapsed.as_str(),
                    e.as_str(),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
