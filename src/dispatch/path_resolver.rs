//! # Path Resolution Module
//!
//! Centralizza tutta la logica di calcolo dei path di output.
//! In modalità directory rispecchia la struttura relativa sotto l'output
//! root; in modalità singolo file scrive direttamente nell'output root.

use crate::config::Config;
use crate::error::CompressError;
use crate::file_manager::{FileManager, RunMode};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Where one job writes its result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub directory: PathBuf,
    pub file: PathBuf,
}

/// Output tree placement for a whole run
#[derive(Debug, Clone)]
pub struct OutputLayout {
    scan_root: PathBuf,
    output_root: PathBuf,
    reserved_name: String,
}

impl OutputLayout {
    /// Directory mode roots the output inside the scanned directory, single
    /// file mode next to the file, unless `output_dir` overrides both.
    pub fn for_input(input: &Path, mode: RunMode, config: &Config) -> Self {
        let scan_root = match mode {
            RunMode::Directory => input.to_path_buf(),
            RunMode::SingleFile => input.parent().unwrap_or(Path::new("")).to_path_buf(),
        };

        let output_root = config
            .output_dir
            .clone()
            .unwrap_or_else(|| scan_root.join(&config.output_root_name));

        Self {
            scan_root,
            output_root,
            reserved_name: config.reserved_name(),
        }
    }

    pub fn scan_root(&self) -> &Path {
        &self.scan_root
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn reserved_name(&self) -> &str {
        &self.reserved_name
    }

    /// Calcola directory e file di output per una sorgente
    pub fn resolve(&self, source: &Path, mode: RunMode) -> Result<OutputTarget, CompressError> {
        let filename = FileManager::output_file_name(source)?;

        let directory = match mode {
            RunMode::SingleFile => self.output_root.clone(),
            RunMode::Directory => {
                let relative = match source.strip_prefix(&self.scan_root) {
                    Ok(rel) => rel.parent().unwrap_or(Path::new("")),
                    Err(_) => {
                        warn!(
                            "{} is outside {}, writing flat into the output root",
                            source.display(),
                            self.scan_root.display()
                        );
                        Path::new("")
                    }
                };
                self.output_root.join(relative)
            }
        };

        let file = directory.join(filename);
        debug!("Resolved output path: {} -> {}", source.display(), file.display());

        Ok(OutputTarget { directory, file })
    }

    /// Resolve and create the output directory with all missing ancestors
    pub async fn prepare(&self, source: &Path, mode: RunMode) -> Result<OutputTarget, CompressError> {
        let target = self.resolve(source, mode)?;
        tokio::fs::create_dir_all(&target.directory).await.map_err(|e| {
            CompressError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create {}: {}", target.directory.display(), e),
            ))
        })?;
        Ok(target)
    }
}
