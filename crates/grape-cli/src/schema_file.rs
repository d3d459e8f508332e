//! # Schema Definition Files
//!
//! Loads a [`Params`] schema from disk. Files ending in `.yaml` or `.yml`
//! are parsed as YAML; anything else as JSON.

use std::path::Path;

use anyhow::{Context, Result};
use grape_params::Params;

/// Serialization format of a definition file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    Yaml,
    Json,
}

impl SchemaFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// Parses a schema definition from text.
pub fn parse_schema(text: &str, format: SchemaFormat) -> Result<Params> {
    let params = match format {
        SchemaFormat::Yaml => serde_yaml::from_str(text).context("invalid YAML schema")?,
        SchemaFormat::Json => serde_json::from_str(text).context("invalid JSON schema")?,
    };
    Ok(params)
}

/// Reads and parses a schema definition file.
pub fn load_schema(path: &Path) -> Result<Params> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read schema file {}", path.display()))?;
    let params = parse_schema(&text, SchemaFormat::from_path(path))
        .with_context(|| format!("failed to parse schema file {}", path.display()))?;
    tracing::debug!(path = %path.display(), fields = params.len(), "loaded schema");
    Ok(params)
}
