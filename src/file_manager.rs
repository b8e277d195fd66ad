//! # File Management Module
//!
//! Questo modulo gestisce le operazioni sui file e la discovery dei video.
//!
//! ## Responsabilità:
//! - Discovery ricorsiva dei video in una directory (o singolo file)
//! - Esclusione completa del sottoalbero di output durante la scansione
//! - Riconoscimento degli output già prodotti (skip idempotente)
//! - Propagazione dei timestamp sorgente sul file di output
//!
//! ## Formati supportati:
//! - **Video**: mp4, mov, mkv, m4v (estensione case-sensitive)
//!
//! ## Operazioni sui file:
//! - `scan()`: Trova tutti i video candidati e determina la modalità di esecuzione
//! - `is_video()`: Determina se un file è un video riconosciuto
//! - `is_already_compressed()`: Decide se un candidato è un output precedente
//! - `copy_timestamps()`: Copia mtime/atime dalla sorgente all'output
//!
//! ## Esempio:
//! ```rust,ignore
//! let scan = FileManager::scan(Path::new("videos"), "compressed")?;
//! for file in &scan.files {
//!     if FileManager::is_already_compressed(file, "compressed") {
//!         continue;
//!     }
//! }
//! ```

use crate::config::{OUTPUT_EXTENSION, OUTPUT_SUFFIX, VIDEO_EXTENSIONS};
use crate::error::CompressError;
use filetime::FileTime;
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// How the run treats output placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Input was a regular file: output goes flat into the output root
    SingleFile,
    /// Input was a directory: output mirrors the relative tree
    Directory,
}

/// Result of discovering candidates under an input path
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub mode: RunMode,
    pub files: Vec<PathBuf>,
}

/// Manages file operations and discovery
pub struct FileManager;

impl FileManager {
    /// Find all candidate videos under `root`, pruning every directory named
    /// `reserved_name` below it.
    pub fn scan(root: &Path, reserved_name: &str) -> Result<ScanResult, CompressError> {
        if !root.exists() {
            return Err(CompressError::InvalidInput(root.to_path_buf()));
        }

        if root.is_file() {
            debug!("Single file input: {}", root.display());
            return Ok(ScanResult {
                mode: RunMode::SingleFile,
                files: vec![root.to_path_buf()],
            });
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                let pruned = e.depth() > 0
                    && e.file_type().is_dir()
                    && e.file_name() == reserved_name;
                if pruned {
                    debug!("Pruning output tree: {}", e.path().display());
                }
                !pruned
            });

        for entry in walker {
            let entry = entry?;
            let path = entry.path();

            // symlinks count when they resolve to a regular file
            if entry.file_type().is_dir() || !path.is_file() {
                continue;
            }

            if Self::is_video(path) {
                files.push(path.to_path_buf());
            }
        }

        debug!("Found {} candidate video(s) under {}", files.len(), root.display());

        Ok(ScanResult {
            mode: RunMode::Directory,
            files,
        })
    }

    /// Check if a file has a recognized video extension
    pub fn is_video(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| VIDEO_EXTENSIONS.contains(&ext))
            .unwrap_or(false)
    }

    /// Check if a path is the product of a previous run.
    ///
    /// True when any directory segment equals `reserved_name` or when the
    /// file name carries the output suffix.
    pub fn is_already_compressed(path: &Path, reserved_name: &str) -> bool {
        let in_output_tree = path
            .parent()
            .map(|parent| {
                parent.components().any(|c| match c {
                    Component::Normal(segment) => segment == reserved_name,
                    _ => false,
                })
            })
            .unwrap_or(false);

        in_output_tree || Self::has_output_suffix(path)
    }

    fn has_output_suffix(path: &Path) -> bool {
        let suffix = format!("{}.{}", OUTPUT_SUFFIX, OUTPUT_EXTENSION);
        path.file_name()
            .map(|name| name.to_string_lossy().ends_with(&suffix))
            .unwrap_or(false)
    }

    /// Output file name for a source: `<stem>_compressed.mp4`
    pub fn output_file_name(source: &Path) -> Result<String, CompressError> {
        let stem = source
            .file_stem()
            .ok_or_else(|| CompressError::Config(format!("Invalid file name: {}", source.display())))?
            .to_string_lossy();
        Ok(format!("{}{}.{}", stem, OUTPUT_SUFFIX, OUTPUT_EXTENSION))
    }

    /// Set the target's access and modification time to the source's
    pub fn copy_timestamps(source: &Path, target: &Path) -> Result<(), CompressError> {
        let metadata = std::fs::metadata(source)
            .map_err(|e| CompressError::Timestamp(format!("{}: {}", source.display(), e)))?;
        let atime = FileTime::from_last_access_time(&metadata);
        let mtime = FileTime::from_last_modification_time(&metadata);

        filetime::set_file_times(target, atime, mtime)
            .map_err(|e| CompressError::Timestamp(format!("{}: {}", target.display(), e)))
    }
}
