//! # Compression Job Module
//!
//! Unità di lavoro per singolo file, eseguita da un worker.
//!
//! ## Stati:
//! `Pending -> Skipped` oppure `Pending -> Encoding -> Succeeded | Failed`
//!
//! ## Pipeline:
//! 1. Skip check (output di una run precedente) al momento dell'esecuzione
//! 2. Calcolo e creazione della directory di output
//! 3. Invocazione dell'encoder esterno
//! 4. Propagazione timestamp sorgente -> output (best-effort)
//! 5. Statistiche opzionali (best-effort)
//!
//! Un fallimento resta locale al job: nessun retry, i job fratelli proseguono.

use crate::config::EncodeFlags;
use crate::dispatch::job_queue::Job;
use crate::dispatch::path_resolver::OutputLayout;
use crate::encoder::{EncodeRequest, Encoder};
use crate::error::CompressError;
use crate::file_manager::FileManager;
use crate::stats;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Terminal state of a job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Skipped,
    Succeeded { output: PathBuf },
    Failed { error: String },
}

impl JobOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Skipped => "skipped",
            Self::Succeeded { .. } => "succeeded",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Outcome of one job, tagged with its source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub source: PathBuf,
    pub outcome: JobOutcome,
}

/// Run-wide, read-only inputs shared by every job
pub struct JobContext {
    pub layout: OutputLayout,
    pub encoder: Arc<dyn Encoder>,
    pub preset: String,
    pub flags: EncodeFlags,
    pub stats_dir: Option<PathBuf>,
}

/// Executes jobs against a shared context
pub struct CompressionJob {
    ctx: Arc<JobContext>,
}

impl CompressionJob {
    pub fn new(ctx: JobContext) -> Self {
        Self { ctx: Arc::new(ctx) }
    }

    /// Run one job to a terminal state
    pub async fn run(&self, job: &Job) -> JobOutcome {
        if FileManager::is_already_compressed(&job.source, self.ctx.layout.reserved_name()) {
            info!("⏭ Skipping: {}", job.source.display());
            return JobOutcome::Skipped;
        }

        match self.encode(job).await {
            Ok(output) => {
                info!("✅ Done → {}", output.display());
                JobOutcome::Succeeded { output }
            }
            Err(e) => {
                error!("❌ Failed: {}: {}", job.source.display(), e);
                JobOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn encode(&self, job: &Job) -> Result<PathBuf, CompressError> {
        let target = self.ctx.layout.prepare(&job.source, job.mode).await?;

        info!(
            "🎞  {}",
            job.source.file_name().unwrap_or_default().to_string_lossy()
        );

        let request = EncodeRequest {
            source: job.source.clone(),
            destination: target.file.clone(),
            preset: self.ctx.preset.clone(),
            quality: job.quality,
            flags: self.ctx.flags,
        };
        self.ctx.encoder.encode(&request).await?;

        // provenance only; never fails the job
        if let Err(e) = FileManager::copy_timestamps(&job.source, &target.file) {
            debug!("Ignoring timestamp error: {}", e);
        }

        if let Some(ref stats_dir) = self.ctx.stats_dir {
            self.write_stats(&job.source, &target.file, stats_dir).await;
        }

        Ok(target.file)
    }

    async fn write_stats(&self, source: &Path, output: &Path, stats_dir: &Path) {
        if let Err(e) = stats::write_stats(source, output, self.ctx.encoder.name(), stats_dir).await {
            warn!("Could not write statistics for {}: {}", output.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::encoder::scripted::ScriptedEncoder;
    use crate::file_manager::RunMode;
    use filetime::FileTime;
    use std::fs;
    use tempfile::TempDir;

    fn context(root: &Path, encoder: Arc<ScriptedEncoder>, config: &Config) -> JobContext {
        JobContext {
            layout: OutputLayout::for_input(root, RunMode::Directory, config),
            encoder,
            preset: config.preset.clone(),
            flags: config.encode_flags,
            stats_dir: None,
        }
    }

    fn source(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"raw").unwrap();
        path
    }

    #[tokio::test]
    async fn test_success_writes_output_and_copies_timestamps() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let input = source(root, "sub/b.mkv");
        let accessed = FileTime::from_unix_time(1_200_000_000, 0);
        let modified = FileTime::from_unix_time(1_400_000_000, 0);
        filetime::set_file_times(&input, accessed, modified).unwrap();

        let encoder = Arc::new(ScriptedEncoder::new());
        let runner = CompressionJob::new(context(root, encoder.clone(), &Config::default()));
        let outcome = runner.run(&Job::new(input.clone(), 7, RunMode::Directory)).await;

        let expected = root.join("compressed/sub/b_compressed.mp4");
        assert_eq!(outcome, JobOutcome::Succeeded { output: expected.clone() });
        assert!(expected.is_file());
        let meta = fs::metadata(&expected).unwrap();
        assert_eq!(FileTime::from_last_modification_time(&meta), modified);
        assert_eq!(FileTime::from_last_access_time(&meta), accessed);

        let calls = encoder.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].source, input);
        assert_eq!(calls[0].destination, expected);
        assert_eq!(calls[0].quality, 7);
        assert_eq!(calls[0].preset, "H.265 Apple VideoToolbox 1080p");
        assert!(calls[0].flags.all_subtitles);
    }

    #[tokio::test]
    async fn test_prior_outputs_are_skipped_without_encoding() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let in_tree = source(root, "compressed/a_compressed.mp4");
        let suffixed = source(root, "old_compressed.mp4");

        let encoder = Arc::new(ScriptedEncoder::new());
        let runner = CompressionJob::new(context(root, encoder.clone(), &Config::default()));

        for path in [in_tree, suffixed] {
            let outcome = runner.run(&Job::new(path, 5, RunMode::Directory)).await;
            assert_eq!(outcome, JobOutcome::Skipped);
        }
        assert!(encoder.calls().is_empty());
    }

    #[tokio::test]
    async fn test_encoder_failure_is_local() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let input = source(root, "bad.mov");

        let encoder = Arc::new(ScriptedEncoder::new().failing_on("bad.mov"));
        let runner = CompressionJob::new(context(root, encoder, &Config::default()));
        let outcome = runner.run(&Job::new(input, 5, RunMode::Directory)).await;

        assert_eq!(outcome.label(), "failed");
        assert!(!root.join("compressed/bad_compressed.mp4").exists());
    }

    #[tokio::test]
    async fn test_unwritable_output_root_fails_job() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let input = source(root, "a.mp4");
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, b"not a dir").unwrap();

        let config = Config {
            output_dir: Some(blocker.join("out")),
            ..Default::default()
        };
        let encoder = Arc::new(ScriptedEncoder::new());
        let runner = CompressionJob::new(context(root, encoder.clone(), &config));
        let outcome = runner.run(&Job::new(input, 5, RunMode::Directory)).await;

        assert!(matches!(outcome, JobOutcome::Failed { .. }));
        assert!(encoder.calls().is_empty());
    }
}
