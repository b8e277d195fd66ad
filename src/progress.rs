//! # Progress Tracking and Statistics Module
//!
//! Questo modulo gestisce il progress tracking e le statistiche di una run.
//!
//! ## Responsabilità:
//! - Progress bar visual con `indicatif` per feedback real-time
//! - Conteggio esiti per job (skipped, succeeded, failed)
//! - Riepilogo finale della run
//!
//! ## Statistiche tracciate:
//! - **total**: Job accodati
//! - **succeeded**: Encode completati con successo
//! - **skipped**: Output di run precedenti, nessun lavoro
//! - **failed**: Encode falliti (non fatali, la run prosegue)
//!
//! ## Visual feedback:
//! ```text
//! ⠋ [00:12:40] [========================>---------------] 3/5 (60%) ✅ b.mkv
//! ```

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Manages the progress bar for a run
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_jobs: u64) -> Self {
        let bar = ProgressBar::new(total_jobs);

        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        {
            bar.set_style(style.progress_chars("=>-"));
        }

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// A manager that never draws (JSON mode)
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Update progress with a message
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    pub fn set_message(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

/// Outcome counters for a run
#[derive(Debug, Default, Clone, Serialize)]
pub struct RunStats {
    pub total: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub failed_paths: Vec<PathBuf>,
}

impl RunStats {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub fn add_succeeded(&mut self) {
        self.succeeded += 1;
    }

    pub fn add_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn add_failed(&mut self, path: PathBuf) {
        self.failed += 1;
        self.failed_paths.push(path);
    }

    pub fn finished(&self) -> usize {
        self.succeeded + self.skipped + self.failed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Jobs: {} | Succeeded: {} | Skipped: {} | Failed: {}",
            self.total, self.succeeded, self.skipped, self.failed
        )
    }
}
