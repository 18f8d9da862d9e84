use log::{debug, info};
use std::path::Path;

use crate::document::PipelineDocument;
use crate::error::{PipeLensError, Result};

const YAML_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

/// Reads and decodes a pipeline file.
///
/// Only `.yml` and `.yaml` files are accepted; anything else is rejected
/// before the file is opened.
pub fn load_file(path: &Path) -> Result<PipelineDocument> {
    if !has_yaml_extension(path) {
        return Err(PipeLensError::UnsupportedExtension(
            path.display().to_string(),
        ));
    }

    info!("Loading pipeline: {}", path.display());
    let contents = std::fs::read_to_string(path)?;
    parse_document(&contents)
}

/// Decodes YAML text into a pipeline document.
///
/// Merge keys (`<<: *defaults`) are expanded, so jobs inherit the fields of
/// the anchors they pull in.
pub fn parse_document(text: &str) -> Result<PipelineDocument> {
    if text.trim().is_empty() {
        return Ok(PipelineDocument::default());
    }
    let mut value: serde_yaml::Value = serde_yaml::from_str(text)?;
    value.apply_merge()?;
    let document = PipelineDocument::from_value(value)?;
    debug!("Decoded pipeline with {} top-level keys", document.root().len());
    Ok(document)
}

fn has_yaml_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| YAML_EXTENSIONS.contains(&ext))
}
