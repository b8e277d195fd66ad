//! # Batch Compressor Main Orchestrator
//!
//! Orchestratore principale che delega responsabilità ai moduli
//! specializzati:
//! 1. Scansione dell'input (file singolo o directory)
//! 2. Accodamento di tutti i job prima dell'avvio dei worker
//! 3. Esecuzione del pool di worker fino a coda vuota
//! 4. Attesa di tutti i worker e riepilogo finale
//!
//! I fallimenti dei singoli job vengono riportati nel riepilogo ma non
//! rendono la run fallita.

use crate::config::Config;
use crate::dispatch::compression_job::{CompressionJob, JobContext, JobOutcome, JobReport};
use crate::dispatch::job_queue::{Job, JobQueue};
use crate::dispatch::path_resolver::OutputLayout;
use crate::dispatch::progress_tracker::ProgressTracker;
use crate::dispatch::worker_pool::WorkerPool;
use crate::encoder::Encoder;
use crate::error::CompressError;
use crate::file_manager::{FileManager, RunMode};
use crate::json_output::{JsonConfig, JsonMessage};
use crate::progress::RunStats;
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info};

/// What a finished run produced
#[derive(Debug)]
pub struct RunSummary {
    pub mode: RunMode,
    pub output_root: PathBuf,
    pub stats: RunStats,
    pub reports: Vec<JobReport>,
    pub duration: Duration,
}

impl RunSummary {
    pub fn has_failures(&self) -> bool {
        self.stats.has_failures()
    }
}

/// Orchestratore principale
pub struct BatchCompressor {
    config: Arc<Config>,
    encoder: Arc<dyn Encoder>,
}

impl BatchCompressor {
    pub fn new(config: Config, encoder: Arc<dyn Encoder>) -> Result<Self, CompressError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            encoder,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Esegue la run completa su `input`
    pub async fn run(&self, input: &Path) -> Result<RunSummary> {
        let start_time = Instant::now();

        // discovery errors abort before any dispatch
        let scan = FileManager::scan(input, &self.config.reserved_name())?;
        let layout = OutputLayout::for_input(input, scan.mode, &self.config);

        let jobs: Vec<Job> = scan
            .files
            .into_iter()
            .map(|source| Job::new(source, self.config.quality, scan.mode))
            .collect();

        self.emit_start(input, &layout, scan.mode, jobs.len());

        let tracker = ProgressTracker::new(jobs.len(), self.config.json_output);
        let queue = Arc::new(JobQueue::new(jobs));
        let total = queue.len();

        let runner = Arc::new(CompressionJob::new(JobContext {
            layout: layout.clone(),
            encoder: Arc::clone(&self.encoder),
            preset: self.config.preset.clone(),
            flags: self.config.encode_flags,
            stats_dir: self.config.stats_dir.clone(),
        }));

        let reports = WorkerPool::new(self.config.workers)
            .run(queue, runner, tracker.clone())
            .await?;

        let stats = Self::collect_stats(total, &reports);
        let duration = start_time.elapsed();
        tracker.finish(&stats, duration.as_secs_f64());
        self.log_summary(&stats, duration);

        Ok(RunSummary {
            mode: scan.mode,
            output_root: layout.output_root().to_path_buf(),
            stats,
            reports,
            duration,
        })
    }

    fn collect_stats(total: usize, reports: &[JobReport]) -> RunStats {
        let mut stats = RunStats::new(total);
        for report in reports {
            match report.outcome {
                JobOutcome::Skipped => stats.add_skipped(),
                JobOutcome::Succeeded { .. } => stats.add_succeeded(),
                JobOutcome::Failed { .. } => stats.add_failed(report.source.clone()),
            }
        }
        stats
    }

    fn emit_start(&self, input: &Path, layout: &OutputLayout, mode: RunMode, total_jobs: usize) {
        if self.config.json_output {
            JsonMessage::Start {
                input: input.to_path_buf(),
                output_root: layout.output_root().to_path_buf(),
                mode,
                total_jobs,
                config: JsonConfig::from(self.config.as_ref()),
            }
            .emit();
        } else {
            info!(
                "Found {} video(s) → {} workers, {} engine, quality {}",
                total_jobs,
                self.config.workers,
                self.encoder.name(),
                self.config.quality
            );
            info!("Output root: {}", layout.output_root().display());
        }
    }

    fn log_summary(&self, stats: &RunStats, duration: Duration) {
        if self.config.json_output {
            return;
        }
        for path in &stats.failed_paths {
            error!("Failed: {}", path.display());
        }
        info!("🎉 All conversions complete in {:.1}s. {}", duration.as_secs_f64(), stats.format_summary());
    }
}
