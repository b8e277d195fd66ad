//! # Progress Tracking Module
//!
//! Riporta l'avanzamento dei worker: progress bar tradizionale oppure
//! eventi JSON. Non mantiene stato usato per decisioni; i conteggi finali
//! vengono calcolati dai report dopo il join dei worker.

use crate::dispatch::compression_job::{JobOutcome, JobReport};
use crate::dispatch::job_queue::Job;
use crate::json_output::JsonMessage;
use crate::progress::{ProgressManager, RunStats};

/// Tracker condiviso (clone economico) tra i worker
#[derive(Clone)]
pub struct ProgressTracker {
    progress: ProgressManager,
    json_output: bool,
}

impl ProgressTracker {
    pub fn new(total_jobs: usize, json_output: bool) -> Self {
        let progress = if json_output || total_jobs == 0 {
            ProgressManager::hidden()
        } else {
            ProgressManager::new(total_jobs as u64)
        };

        Self {
            progress,
            json_output,
        }
    }

    pub fn job_started(&self, job: &Job, worker: usize) {
        if self.json_output {
            JsonMessage::JobStart {
                path: job.source.clone(),
                worker,
            }
            .emit();
        } else {
            self.progress.set_message(&format!(
                "[worker {}] {}",
                worker,
                job.source.file_name().unwrap_or_default().to_string_lossy()
            ));
        }
    }

    pub fn job_finished(&self, report: &JobReport) {
        if self.json_output {
            let (output, error) = match &report.outcome {
                JobOutcome::Succeeded { output } => (Some(output.clone()), None),
                JobOutcome::Failed { error } => (None, Some(error.clone())),
                JobOutcome::Skipped => (None, None),
            };
            JsonMessage::JobComplete {
                path: report.source.clone(),
                outcome: report.outcome.label(),
                output,
                error,
            }
            .emit();
            return;
        }

        let marker = match report.outcome {
            JobOutcome::Skipped => "⏭",
            JobOutcome::Succeeded { .. } => "✅",
            JobOutcome::Failed { .. } => "❌",
        };
        self.progress.update(&format!(
            "{} {}",
            marker,
            report.source.file_name().unwrap_or_default().to_string_lossy()
        ));
    }

    pub fn finish(&self, stats: &RunStats, duration_seconds: f64) {
        if self.json_output {
            JsonMessage::complete(stats, duration_seconds).emit();
        } else {
            self.progress.finish(&stats.format_summary());
        }
    }
}
