//! # Worker Pool Module
//!
//! Un numero fisso di worker che svuotano la coda: ogni worker ripete
//! "pop oppure termina" ed esegue il job in modo sincrono al suo interno.
//! Distribuzione statica, senza retry né ribilanciamento.
//!
//! Un'estensione possibile è un modello producer/consumer in cui i worker
//! attendono nuovo lavoro invece di svuotare una lista pre-costruita.

use crate::dispatch::compression_job::{CompressionJob, JobReport};
use crate::dispatch::job_queue::JobQueue;
use crate::dispatch::progress_tracker::ProgressTracker;
use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

/// Fixed set of parallel workers
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Drain `queue` and wait until every worker has exited
    pub async fn run(
        &self,
        queue: Arc<JobQueue>,
        runner: Arc<CompressionJob>,
        tracker: ProgressTracker,
    ) -> Result<Vec<JobReport>> {
        let mut tasks = Vec::with_capacity(self.workers);

        for worker in 0..self.workers {
            let queue = Arc::clone(&queue);
            let runner = Arc::clone(&runner);
            let tracker = tracker.clone();

            tasks.push(tokio::spawn(async move {
                let mut reports = Vec::new();

                while let Some(job) = queue.pop() {
                    tracker.job_started(&job, worker);
                    let outcome = runner.run(&job).await;
                    let report = JobReport {
                        source: job.source,
                        outcome,
                    };
                    tracker.job_finished(&report);
                    reports.push(report);
                }

                debug!("Worker {} exiting after {} job(s)", worker, reports.len());
                reports
            }));
        }

        // join_all waits for every worker even if one of them panicked
        let mut reports = Vec::new();
        for result in futures::future::join_all(tasks).await {
            reports.extend(result?);
        }

        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::dispatch::compression_job::{JobContext, JobOutcome};
    use crate::dispatch::job_queue::Job;
    use crate::dispatch::path_resolver::OutputLayout;
    use crate::encoder::scripted::ScriptedEncoder;
    use crate::file_manager::RunMode;
    use std::collections::HashSet;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::TempDir;

    fn setup(root: &Path, count: usize, encoder: Arc<ScriptedEncoder>) -> (Arc<JobQueue>, Arc<CompressionJob>) {
        let config = Config::default();
        let jobs: Vec<Job> = (0..count)
            .map(|i| {
                let path = root.join(format!("clip{}.mp4", i));
                std::fs::write(&path, b"raw").unwrap();
                Job::new(path, config.quality, RunMode::Directory)
            })
            .collect();

        let runner = CompressionJob::new(JobContext {
            layout: OutputLayout::for_input(root, RunMode::Directory, &config),
            encoder,
            preset: config.preset.clone(),
            flags: config.encode_flags,
            stats_dir: None,
        });

        (Arc::new(JobQueue::new(jobs)), Arc::new(runner))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_is_bounded_by_worker_count() {
        for workers in [1, 2, 3] {
            let temp_dir = TempDir::new().unwrap();
            let encoder = Arc::new(ScriptedEncoder::new().with_delay(Duration::from_millis(25)));
            let (queue, runner) = setup(temp_dir.path(), 8, encoder.clone());

            let reports = WorkerPool::new(workers)
                .run(queue.clone(), runner, ProgressTracker::new(0, false))
                .await
                .unwrap();

            assert_eq!(reports.len(), 8);
            assert!(queue.is_empty());
            assert!(encoder.peak_concurrency() <= workers);
            assert!(encoder.peak_concurrency() >= 1);
        }
    }

    #[tokio::test]
    async fn test_every_job_runs_exactly_once() {
        let temp_dir = TempDir::new().unwrap();
        let encoder = Arc::new(ScriptedEncoder::new());
        let (queue, runner) = setup(temp_dir.path(), 20, encoder.clone());

        let reports = WorkerPool::new(4)
            .run(queue, runner, ProgressTracker::new(0, false))
            .await
            .unwrap();

        let sources: HashSet<_> = reports.iter().map(|r| r.source.clone()).collect();
        assert_eq!(sources.len(), 20);
        assert_eq!(encoder.calls().len(), 20);
        assert!(reports
            .iter()
            .all(|r| matches!(r.outcome, JobOutcome::Succeeded { .. })));
    }

    #[tokio::test]
    async fn test_more_workers_than_jobs() {
        let temp_dir = TempDir::new().unwrap();
        let encoder = Arc::new(ScriptedEncoder::new());
        let (queue, runner) = setup(temp_dir.path(), 1, encoder);

        let reports = WorkerPool::new(6)
            .run(queue, runner, ProgressTracker::new(0, false))
            .await
            .unwrap();
        assert_eq!(reports.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_queue_exits_immediately() {
        let temp_dir = TempDir::new().unwrap();
        let encoder = Arc::new(ScriptedEncoder::new());
        let (queue, runner) = setup(temp_dir.path(), 0, encoder.clone());

        let reports = WorkerPool::new(2)
            .run(queue, runner, ProgressTracker::new(0, false))
            .await
            .unwrap();
        assert!(reports.is_empty());
        assert!(encoder.calls().is_empty());
    }

    #[test]
    fn test_zero_workers_clamped_to_one() {
        assert_eq!(WorkerPool::new(0).workers(), 1);
    }
}
