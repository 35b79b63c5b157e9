use std::fs::File;
use std::path::Path;

use log::{error, info};
use serde::Deserialize;
use thiserror::Error;

/// One keyword/URL pair tracked over time. Identity is the pair itself;
/// the list is fixed for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Target {
    #[serde(rename = "keyword", alias = "Keyword", alias = "query")]
    pub keyword: String,
    #[serde(rename = "url", alias = "URL", alias = "Url", alias = "target_url")]
    pub url: String,
}

#[derive(Debug, Error)]
pub enum TargetsError {
    #[error("targets file not found at: {0}")]
    NotFound(String),
    #[error("could not open targets file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("targets file {0} contains no usable rows")]
    Empty(String),
}

/// Loads the target list from a CSV with `keyword,url` headers. Rows that
/// fail to parse are logged and skipped; a file yielding no targets at all
/// is a configuration error.
pub fn load_targets(path: &Path) -> Result<Vec<Target>, TargetsError> {
    if !path.exists() {
        return Err(TargetsError::NotFound(path.display().to_string()));
    }

    let file = File::open(path).map_err(|source| TargetsError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut targets = Vec::new();
    for result in reader.deserialize() {
        match result {
            Ok(target) => targets.push(target),
            Err(e) => error!("Error parsing target record: {}", e),
        }
    }

    if targets.is_empty() {
        return Err(TargetsError::Empty(path.display().to_string()));
    }

    info!("Loaded {} targets from {:?}", targets.len(), path);
    Ok(targets)
}
