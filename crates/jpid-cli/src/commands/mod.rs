//! CLI subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod process;
pub mod replay;
pub mod types;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::ValueEnum;
use tracing::debug;

use jpid_core::{
    DocumentParser, FieldMap, JpidConfig, OcrBackend, ParseResult, ParserFactory, TesseractBackend,
};

/// Output format for extraction results.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Configuration file used when `--config` is not given.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("jpid")
        .join("config.json")
}

/// The explicit `--config` path, or the default location.
pub fn config_file(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path)
}

/// Load configuration, then apply environment overrides.
///
/// An explicit path must exist. The default path is optional.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<JpidConfig> {
    let path = config_file(explicit);
    let mut config = if explicit.is_some() || path.exists() {
        JpidConfig::from_file(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?
    } else {
        JpidConfig::default()
    };
    config.apply_env();
    debug!("Loaded configuration (timeout {}s)", config.server.request_timeout_secs);
    Ok(config)
}

/// Parser factory over the tesseract backend.
pub fn tesseract_factory(config: &JpidConfig) -> anyhow::Result<ParserFactory> {
    let backend = TesseractBackend::new(config.ocr.clone());
    if !backend.is_available() {
        bail!(
            "Tesseract binary {} is not runnable",
            config.ocr.binary.display()
        );
    }
    let backend: Arc<dyn OcrBackend> = Arc::new(backend);
    Ok(ParserFactory::with_builtin(backend)?)
}

/// Run one parse on the blocking pool under a wall-clock budget.
pub async fn parse_with_deadline(
    parser: Arc<dyn DocumentParser>,
    image: Vec<u8>,
    timeout: Duration,
) -> anyhow::Result<ParseResult> {
    let document_type = parser.document_type();
    let task = tokio::task::spawn_blocking(move || parser.parse(&image));

    let data = match tokio::time::timeout(timeout, task).await {
        Ok(joined) => joined.context("parser task failed")??,
        Err(_) => bail!(
            "Request timeout: processing exceeded {} seconds",
            timeout.as_secs()
        ),
    };
    Ok(ParseResult {
        document_type,
        data,
    })
}

/// Render a result in the requested format.
pub fn render(result: &ParseResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_csv(result: &ParseResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec!["document_type"];
    header.extend(result.data.keys().map(String::as_str));
    wtr.write_record(&header)?;

    let mut row = vec![result.document_type.as_str()];
    row.extend(result.data.values().map(String::as_str));
    wtr.write_record(&row)?;

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(result: &ParseResult) -> String {
    let mut output = format!(
        "{} ({})\n",
        result.document_type.display_name(),
        result.document_type
    );
    output.push_str(&format_fields(&result.data));
    output
}

fn format_fields(data: &FieldMap) -> String {
    let width = data.keys().map(|k| k.chars().count()).max().unwrap_or(0);
    data.iter()
        .map(|(key, value)| format!("  {:<width$}  {}\n", key, value, width = width))
        .collect()
}
