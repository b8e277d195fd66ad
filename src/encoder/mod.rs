//! # Encoder Module
//!
//! Questo modulo definisce il contratto verso il transcoder esterno.
//!
//! ## Responsabilità:
//! - Definisce il trait `Encoder`, iniettabile nel job di compressione
//! - Fornisce le implementazioni di produzione (HandBrakeCLI, ffmpeg, remux)
//! - Sceglie l'encoder in base ai tool disponibili sul sistema
//! - Esegue il processo esterno e traduce l'exit status in successo/fallimento
//!
//! ## Contratto:
//! - **Input**: sorgente, destinazione, preset nominato, qualità, flag
//!   (tutte le tracce audio, tutti i sottotitoli, capitoli, faststart)
//! - **Output**: `Ok(())` se il tool termina con successo, altrimenti
//!   `CompressError::Encode` con la coda dello stderr
//!
//! Nessun timeout: un'invocazione bloccata blocca il suo worker.

mod ffmpeg;
mod handbrake;
#[cfg(test)]
pub(crate) mod scripted;

pub use ffmpeg::{FfmpegEncoder, RemuxEncoder};
pub use handbrake::HandBrakeEncoder;

use crate::config::{EncodeFlags, EngineKind};
use crate::error::CompressError;
use crate::platform::{PlatformCommands, FFMPEG, HANDBRAKE};
use crate::utils::tail_lines;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use tracing::{debug, info};

/// Everything an encoder needs for one transcode
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeRequest {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Named preset (container/codec/device target)
    pub preset: String,
    pub quality: u32,
    pub flags: EncodeFlags,
}

/// External transcoding capability
#[async_trait]
pub trait Encoder: Send + Sync {
    /// Short engine name used in logs and statistics
    fn name(&self) -> &'static str;

    async fn encode(&self, request: &EncodeRequest) -> Result<(), CompressError>;
}

/// Spawn `program` with `args` and wait for it to exit
pub(crate) async fn run_tool(program: &str, args: Vec<OsString>) -> Result<(), CompressError> {
    debug!("Running {} {:?}", program, args);
    let start_time = std::time::Instant::now();

    let output = tokio::process::Command::new(program)
        .args(&args)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| CompressError::Encode(format!("Failed to execute {}: {}", program, e)))?;

    let duration = start_time.elapsed();

    if !output.status.success() {
        return Err(CompressError::Encode(format!(
            "{} exited with {} after {:.1}s: {}",
            program,
            output.status,
            duration.as_secs_f64(),
            tail_lines(&output.stderr, 10)
        )));
    }

    debug!("{} finished in {:.1}s", program, duration.as_secs_f64());
    Ok(())
}

/// Pick the concrete engine given which tools are installed
pub fn select_engine(
    requested: EngineKind,
    has_handbrake: bool,
    has_ffmpeg: bool,
) -> Result<EngineKind, CompressError> {
    match requested {
        EngineKind::Auto if has_handbrake => Ok(EngineKind::HandBrake),
        EngineKind::Auto if has_ffmpeg => Ok(EngineKind::Ffmpeg),
        EngineKind::Auto => Err(CompressError::MissingDependency(format!(
            "{} or {} is required for video compression",
            HANDBRAKE, FFMPEG
        ))),
        EngineKind::HandBrake if !has_handbrake => Err(CompressError::MissingDependency(format!(
            "{} is required for the handbrake engine",
            HANDBRAKE
        ))),
        EngineKind::Ffmpeg | EngineKind::Remux if !has_ffmpeg => {
            Err(CompressError::MissingDependency(format!(
                "{} is required for the {} engine",
                FFMPEG, requested
            )))
        }
        concrete => Ok(concrete),
    }
}

/// Build the production encoder for `kind`, checking tool availability
pub async fn resolve_encoder(kind: EngineKind) -> Result<Arc<dyn Encoder>, CompressError> {
    let platform = PlatformCommands::instance();
    let has_handbrake = platform.is_command_available(HANDBRAKE).await;
    let has_ffmpeg = platform.is_command_available(FFMPEG).await;
    debug!("Tool availability: {}={}, {}={}", HANDBRAKE, has_handbrake, FFMPEG, has_ffmpeg);

    let engine = select_engine(kind, has_handbrake, has_ffmpeg)?;
    info!("Using {} engine", engine);

    Ok(match engine {
        EngineKind::HandBrake => Arc::new(HandBrakeEncoder::new()),
        EngineKind::Remux => Arc::new(RemuxEncoder::new()),
        EngineKind::Ffmpeg | EngineKind::Auto => Arc::new(FfmpegEncoder::new()),
    })
}
