//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con tutti i parametri di compressione
//! - Raccoglie le costanti globali (output root, parallelismo, qualità, preset)
//!   in un'unica struttura immutabile passata esplicitamente ai componenti
//! - Fornisce validazione dei parametri di input
//! - Supporta caricamento/salvataggio configurazione da/verso file JSON
//!
//! ## Parametri di configurazione:
//! - `output_root_name`: Nome riservato della directory di output (default: "compressed")
//! - `output_dir`: Directory di output esplicita (default: None = `<base>/compressed`)
//! - `workers`: Numero di worker paralleli (default: 2, limite sicuro per l'encoder hardware)
//! - `quality`: Livello di qualità passato all'encoder (default: 5)
//! - `preset`: Profilo nominato dell'encoder (default: "H.265 Apple VideoToolbox 1080p")
//! - `engine`: Encoder esterno da usare (default: auto)
//! - `encode_flags`: Tracce audio, sottotitoli, capitoli, ottimizzazione streaming
//! - `json_output`: Eventi JSON su stdout (default: false)
//! - `stats_dir`: Directory per le statistiche per-job (default: None)
//! - `fail_on_error`: Exit code 2 se almeno un job fallisce (default: false)
//!
//! ## Esempio:
//! ```rust,ignore
//! let config = Config {
//!     workers: 4,
//!     quality: 22,
//!     ..Default::default()
//! };
//! config.validate()?;
//! ```

use crate::error::CompressError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Reserved name of the output tree
pub const DEFAULT_OUTPUT_ROOT: &str = "compressed";
/// Suffix appended to the source stem; outputs are always mp4
pub const OUTPUT_SUFFIX: &str = "_compressed";
pub const OUTPUT_EXTENSION: &str = "mp4";
/// Recognized source containers (matched case-sensitively)
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "mkv", "m4v"];

/// Which external tool performs the transcode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// HandBrakeCLI when installed, ffmpeg otherwise
    #[default]
    Auto,
    #[value(name = "handbrake")]
    HandBrake,
    Ffmpeg,
    /// Stream copy into mp4 without re-encoding
    Remux,
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Auto => "auto",
            Self::HandBrake => "handbrake",
            Self::Ffmpeg => "ffmpeg",
            Self::Remux => "remux",
        };
        f.write_str(name)
    }
}

/// Stream retention and container flags handed to every encode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeFlags {
    pub all_audio: bool,
    pub all_subtitles: bool,
    pub markers: bool,
    /// Move the moov atom up front for progressive playback
    pub optimize: bool,
}

impl Default for EncodeFlags {
    fn default() -> Self {
        Self {
            all_audio: true,
            all_subtitles: true,
            markers: true,
            optimize: true,
        }
    }
}

/// Configuration for a compression run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Reserved directory name, excluded from scanning and used as destination
    pub output_root_name: String,
    /// Explicit output root (None = `<scan base>/<output_root_name>`)
    pub output_dir: Option<PathBuf>,
    /// Number of parallel workers
    pub workers: usize,
    /// Quality level passed to the encoder
    pub quality: u32,
    /// Named encoder preset
    pub preset: String,
    pub engine: EngineKind,
    pub encode_flags: EncodeFlags,
    /// Output progress and status as JSON for programmatic use
    pub json_output: bool,
    /// Write per-job ffprobe statistics here
    pub stats_dir: Option<PathBuf>,
    /// Exit with a distinct code when some jobs failed
    pub fail_on_error: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_root_name: DEFAULT_OUTPUT_ROOT.to_string(),
            output_dir: None,
            workers: 2,
            quality: 5,
            preset: "H.265 Apple VideoToolbox 1080p".to_string(),
            engine: EngineKind::Auto,
            encode_flags: EncodeFlags::default(),
            json_output: false,
            stats_dir: None,
            fail_on_error: false,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), CompressError> {
        if self.workers == 0 {
            return Err(CompressError::Config(
                "Number of workers must be greater than 0".to_string(),
            ));
        }

        if self.output_root_name.is_empty() {
            return Err(CompressError::Config(
                "Output root name must not be empty".to_string(),
            ));
        }

        if self.output_root_name.contains(['/', '\\']) {
            return Err(CompressError::Config(format!(
                "Output root name must be a single directory name: {}",
                self.output_root_name
            )));
        }

        if self.preset.trim().is_empty() {
            return Err(CompressError::Config("Encoder preset must not be empty".to_string()));
        }

        if let Some(ref output_dir) = self.output_dir {
            if output_dir.file_name().is_none() {
                return Err(CompressError::Config(format!(
                    "Output directory has no final component: {}",
                    output_dir.display()
                )));
            }
            if output_dir.exists() && !output_dir.is_dir() {
                return Err(CompressError::Config(format!(
                    "Output path is not a directory: {}",
                    output_dir.display()
                )));
            }
        }

        Ok(())
    }

    /// Name pruned during scanning and matched by the skip filter.
    ///
    /// With an explicit `output_dir` this is its final component.
    pub fn reserved_name(&self) -> String {
        self.output_dir
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.output_root_name.clone())
    }

    /// Load configuration from file
    pub async fn from_file(path: &Path) -> Result<Self, CompressError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &Path) -> Result<(), CompressError> {
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}
