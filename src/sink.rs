//! Result sink: persists the finished catalog

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::catalog::Catalog;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("cannot serialize catalog: {0}")]
    Serialize(String),

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Destination for a completed catalog
pub trait CatalogSink {
    fn write(&self, catalog: &Catalog) -> Result<(), SinkError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
}

impl OutputFormat {
    /// YAML for `.yaml`/`.yml`, pretty JSON for anything else
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => OutputFormat::Yaml,
            _ => OutputFormat::Json,
        }
    }
}

/// Writes the catalog to a file, replacing whatever was there
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
    format: OutputFormat,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = OutputFormat::from_path(&path);
        Self { path, format }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn render(&self, catalog: &Catalog) -> Result<String, SinkError> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(catalog)
                .map_err(|e| SinkError::Serialize(e.to_string())),
            OutputFormat::Yaml => {
                serde_yaml::to_string(catalog).map_err(|e| SinkError::Serialize(e.to_string()))
            }
        }
    }
}

impl CatalogSink for FileSink {
    fn write(&self, catalog: &Catalog) -> Result<(), SinkError> {
        let body = self.render(catalog)?;
        fs::write(&self.path, body).map_err(|source| SinkError::Write {
            path: self.path.clone(),
            source,
        })?;
        info!("Saved {} items to {}", catalog.len(), self.path.display());
        Ok(())
    }
}
