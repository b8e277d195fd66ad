//! # Video Compressor Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per i test
//!
//! ## Architettura dei moduli:
//! - `config`: Configurazione immutabile e validazione parametri
//! - `error`: Tipi di errore custom per le diverse fasi
//! - `file_manager`: Discovery dei video, skip idempotente, timestamp
//! - `encoder`: Trait `Encoder` e implementazioni HandBrakeCLI / ffmpeg
//! - `dispatch`: Coda, pool di worker, job e orchestratore
//! - `platform`: Comandi esterni cross-platform
//! - `progress`: Progress bar e statistiche della run
//! - `json_output`: Eventi JSON per uso programmatico
//! - `stats`: Statistiche ffprobe per job
//!
//! ## Utilizzo:
//! ```rust,ignore
//! use video_compressor::{encoder, BatchCompressor, Config};
//!
//! let config = Config::default();
//! let encoder = encoder::resolve_encoder(config.engine).await?;
//! let summary = BatchCompressor::new(config, encoder)?.run(&path).await?;
//! ```

pub mod config;
pub mod dispatch;
pub mod encoder;
pub mod error;
pub mod file_manager;
pub mod json_output;
pub mod platform;
pub mod progress;
pub mod stats;
pub mod utils;

pub use config::{Config, EngineKind};
pub use dispatch::{BatchCompressor, RunSummary};
pub use encoder::Encoder;
pub use error::CompressError;
