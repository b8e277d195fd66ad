//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce `CompressError` enum per categorizzare tutti gli errori possibili
//! - Separa errori fatali (config, input, scan) da errori locali a un job (encode)
//! - Integra con `thiserror` per automatic error conversion
//!
//! ## Categorie di errori:
//! - `Config`: Parametri non validi (fatale, prima di iniziare)
//! - `InvalidInput`: Path di input inesistente (fatale)
//! - `Scan`: Errore durante la discovery ricorsiva (fatale, prima del dispatch)
//! - `Encode`: Il tool esterno ha fallito (locale al job, non fatale)
//! - `Timestamp`: Propagazione timestamp fallita (ignorato dal job)
//! - `MissingDependency`: Tool esterno mancante (HandBrakeCLI, ffmpeg)
//!
//! ## Esempio:
//! ```rust,ignore
//! if !input.exists() {
//!     return Err(CompressError::InvalidInput(input.to_path_buf()));
//! }
//! ```

use std::path::PathBuf;

/// Custom error types for batch video compression
#[derive(thiserror::Error, Debug)]
pub enum CompressError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {} does not exist", .0.display())]
    InvalidInput(PathBuf),

    #[error("Scan error: {0}")]
    Scan(#[from] walkdir::Error),

    #[error("Encoder failed: {0}")]
    Encode(String),

    #[error("Timestamp propagation failed: {0}")]
    Timestamp(String),

    #[error("Dependency missing: {0}")]
    MissingDependency(String),
}
