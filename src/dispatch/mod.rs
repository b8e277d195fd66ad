//! # Dispatch Module
//!
//! Modulo che separa le responsabilità del dispatch in sottomoduli:
//! - `batch_compressor`: Orchestratore principale
//! - `job_queue`: Coda FIFO thread-safe popolata prima dei worker
//! - `worker_pool`: Pool fisso di worker che svuotano la coda
//! - `compression_job`: Macchina a stati per singolo file
//! - `path_resolver`: Logica di calcolo path centralizzata
//! - `progress_tracker`: Progress bar o eventi JSON

pub mod batch_compressor;
pub mod compression_job;
pub mod job_queue;
pub mod path_resolver;
pub mod progress_tracker;
pub mod worker_pool;

pub use batch_compressor::{BatchCompressor, RunSummary};
pub use compression_job::{CompressionJob, JobContext, JobOutcome, JobReport};
pub use job_queue::{Job, JobQueue};
pub use path_resolver::{OutputLayout, OutputTarget};
pub use progress_tracker::ProgressTracker;
pub use worker_pool::WorkerPool;
