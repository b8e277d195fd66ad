//! # Job Queue Module
//!
//! Coda FIFO thread-safe, popolata una sola volta prima dell'avvio dei
//! worker. Il pop non blocca mai: una coda vuota significa lavoro finito.

use crate::file_manager::RunMode;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Mutex;

/// One source file queued for transcoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub source: PathBuf,
    pub quality: u32,
    pub mode: RunMode,
}

impl Job {
    pub fn new(source: PathBuf, quality: u32, mode: RunMode) -> Self {
        Self {
            source,
            quality,
            mode,
        }
    }
}

/// Pre-filled work list drained by the worker pool
#[derive(Debug)]
pub struct JobQueue {
    jobs: Mutex<VecDeque<Job>>,
}

impl JobQueue {
    pub fn new(jobs: impl IntoIterator<Item = Job>) -> Self {
        Self {
            jobs: Mutex::new(jobs.into_iter().collect()),
        }
    }

    /// Take the next job, or `None` once the queue has drained
    pub fn pop(&self) -> Option<Job> {
        // a poisoned lock only means another worker panicked mid-pop
        let mut jobs = self.jobs.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        jobs.pop_front()
    }

    pub fn len(&self) -> usize {
        self.jobs.lock().map(|jobs| jobs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<Job> for JobQueue {
    fn from_iter<I: IntoIterator<Item = Job>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn job(name: &str) -> Job {
        Job::new(PathBuf::from(name), 5, RunMode::Directory)
    }

    #[test]
    fn test_fifo_then_empty() {
        let queue: JobQueue = ["a.mp4", "b.mov", "c.mkv"].into_iter().map(job).collect();
        assert_eq!(queue.len(), 3);

        assert_eq!(queue.pop().unwrap().source, PathBuf::from("a.mp4"));
        assert_eq!(queue.pop().unwrap().source, PathBuf::from("b.mov"));
        assert_eq!(queue.pop().unwrap().source, PathBuf::from("c.mkv"));
        assert!(queue.pop().is_none());
        assert!(queue.pop().is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_each_job_popped_once_across_threads() {
        let queue = Arc::new(JobQueue::new((0..500).map(|i| job(&format!("{}.mp4", i)))));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let queue = Arc::clone(&queue);
                std::thread::spawn(move || {
                    let mut taken = Vec::new();
                    while let Some(job) = queue.pop() {
                        taken.push(job.source);
                    }
                    taken
                })
            })
            .collect();

        let mut seen = HashSet::new();
        let mut count = 0;
        for handle in handles {
            for source in handle.join().unwrap() {
                count += 1;
                assert!(seen.insert(source), "job dequeued twice");
            }
        }
        assert_eq!(count, 500);
        assert!(queue.is_empty());
    }
}
