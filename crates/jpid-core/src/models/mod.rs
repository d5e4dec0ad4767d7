//! Data models: document types, field maps and configuration.

pub mod config;
pub mod document;
