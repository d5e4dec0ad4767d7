//! Types command - list supported document types.

use std::path::Path;
use std::sync::Arc;

use console::style;

use jpid_core::{ParserFactory, TesseractBackend};

use super::load_config;

pub fn run(config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    // Listing never runs OCR, so the binary need not be installed.
    let factory = ParserFactory::with_builtin(Arc::new(TesseractBackend::new(config.ocr)))?;

    let types = factory.list_supported_types();
    println!("{}", style("Supported document types:").bold());
    for doc_type in &types {
        println!("  {:<28} {}", doc_type.as_str(), doc_type.display_name());
    }
    println!();
    println!("{} types", types.len());
    Ok(())
}
