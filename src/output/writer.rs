//! Link file writers
//!
//! The two deduplicated stub sets are written as plaintext CSV files with
//! one absolute URL per row and no header.

use crate::config::Config;
use crate::state::GlobalLinkSets;
use crate::url::absolute_url;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write CSV output: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for persisting the final link sets
pub trait LinkWriter {
    /// Writes both link sets
    ///
    /// # Arguments
    ///
    /// * `links` - The final personality and article stubs
    fn write(&self, links: &GlobalLinkSets) -> OutputResult<()>;
}

/// Writes each link set to its own CSV file inside the save directory
#[derive(Debug, Clone)]
pub struct CsvLinkWriter {
    origin: String,
    personalities_path: PathBuf,
    articles_path: PathBuf,
}

impl CsvLinkWriter {
    pub fn new(
        origin: impl Into<String>,
        personalities_path: PathBuf,
        articles_path: PathBuf,
    ) -> Self {
        Self {
            origin: origin.into(),
            personalities_path,
            articles_path,
        }
    }

    /// Creates a writer for the configured save path, file names and origin
    pub fn from_config(config: &Config) -> Self {
        let dir = Path::new(&config.output.save_path);
        Self::new(
            config.site.origin.clone(),
            dir.join(&config.output.personalities_file),
            dir.join(&config.output.articles_file),
        )
    }

    pub fn personalities_path(&self) -> &Path {
        &self.personalities_path
    }

    pub fn articles_path(&self) -> &Path {
        &self.articles_path
    }

    fn write_stubs(&self, path: &Path, stubs: BTreeSet<&str>) -> OutputResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)?;

        for stub in &stubs {
            wtr.write_record([absolute_url(&self.origin, stub)])?;
        }
        wtr.flush()?;

        tracing::info!("Saved {} links to {}", stubs.len(), path.display());
        Ok(())
    }
}

impl LinkWriter for CsvLinkWriter {
    fn write(&self, links: &GlobalLinkSets) -> OutputResult<()> {
        self.write_stubs(&self.personalities_path, links.sorted_personalities())?;
        self.write_stubs(&self.articles_path, links.sorted_articles())?;
        Ok(())
    }
}
