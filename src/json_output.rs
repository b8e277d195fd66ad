//! # JSON Output Module
//!
//! Questo modulo gestisce l'output strutturato in JSON per chi guida il tool
//! da un altro processo.
//!
//! ## Responsabilità:
//! - Emette una riga JSON per evento su stdout
//! - Riporta l'esito di ogni job e il riepilogo finale
//!
//! ## Tipi di messaggi:
//! - `start`: Inizio run (input, output root, modalità, numero job)
//! - `job_start`: Un worker ha preso un job
//! - `job_complete`: Esito di un job (skipped / succeeded / failed)
//! - `complete`: Fine run con conteggi e durata
//! - `error`: Errore fatale

use crate::config::{Config, EngineKind};
use crate::file_manager::RunMode;
use crate::progress::RunStats;
use serde::Serialize;
use std::path::PathBuf;

/// Tipo di messaggio JSON
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JsonMessage {
    Start {
        input: PathBuf,
        output_root: PathBuf,
        mode: RunMode,
        total_jobs: usize,
        config: JsonConfig,
    },

    JobStart {
        path: PathBuf,
        worker: usize,
    },

    JobComplete {
        path: PathBuf,
        outcome: &'static str,
        output: Option<PathBuf>,
        error: Option<String>,
    },

    Complete {
        total: usize,
        succeeded: usize,
        skipped: usize,
        failed: usize,
        duration_seconds: f64,
    },

    Error {
        message: String,
    },
}

/// Configurazione riportata nel messaggio di start
#[derive(Debug, Serialize)]
pub struct JsonConfig {
    pub workers: usize,
    pub quality: u32,
    pub preset: String,
    pub engine: EngineKind,
}

impl From<&Config> for JsonConfig {
    fn from(config: &Config) -> Self {
        Self {
            workers: config.workers,
            quality: config.quality,
            preset: config.preset.clone(),
            engine: config.engine,
        }
    }
}

impl JsonMessage {
    /// Emette il messaggio JSON su stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    pub fn complete(stats: &RunStats, duration_seconds: f64) -> Self {
        Self::Complete {
            total: stats.total,
            succeeded: stats.succeeded,
            skipped: stats.skipped,
            failed: stats.failed,
            duration_seconds,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_complete_shape() {
        let msg = JsonMessage::JobComplete {
            path: PathBuf::from("videos/a.mp4"),
            outcome: "succeeded",
            output: Some(PathBuf::from("videos/compressed/a_compressed.mp4")),
            error: None,
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "job_complete");
        assert_eq!(value["outcome"], "succeeded");
        assert_eq!(value["output"], "videos/compressed/a_compressed.mp4");
        assert!(value["error"].is_null());
    }

    #[test]
    fn test_start_includes_mode_and_engine() {
        let msg = JsonMessage::Start {
            input: PathBuf::from("clip.mov"),
            output_root: PathBuf::from("compressed"),
            mode: RunMode::SingleFile,
            total_jobs: 1,
            config: JsonConfig::from(&Config::default()),
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "start");
        assert_eq!(value["mode"], "single_file");
        assert_eq!(value["config"]["engine"], "auto");
        assert_eq!(value["config"]["workers"], 2);
    }

    #[test]
    fn test_complete_from_stats() {
        let mut stats = RunStats::new(2);
        stats.add_succeeded();
        stats.add_failed(PathBuf::from("b.mkv"));
        let value = serde_json::to_value(JsonMessage::complete(&stats, 1.5)).unwrap();
        assert_eq!(value["type"], "complete");
        assert_eq!(value["failed"], 1);
        assert_eq!(value["duration_seconds"], 1.5);
    }
}
