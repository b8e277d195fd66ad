//! # Video Compressor - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Validazione degli input dell'utente prima di qualsiasi lavoro
//! - Scelta dell'encoder e avvio dell'orchestratore
//!
//! ## Exit code:
//! - `0`: run completata (anche se alcuni job sono falliti)
//! - `1`: argomenti mancanti/non validi, input inesistente, errore di scansione
//! - `2`: solo con `--strict`, almeno un job fallito
//!
//! ## Esempio di utilizzo:
//! ```bash
//! vid-compress ~/Movies/trip 22 --workers 2 --engine handbrake
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use video_compressor::json_output::JsonMessage;
use video_compressor::platform::PlatformCommands;
use video_compressor::{encoder, BatchCompressor, CompressError, Config, EngineKind, RunSummary};

#[derive(Parser)]
#[command(name = "vid-compress", version)]
#[command(about = "Compress a video, or every video under a directory, into a mirrored output tree")]
struct Args {
    /// Video file or directory to compress
    input: PathBuf,

    /// Encoder quality level (default 5)
    quality: Option<u32>,

    /// Number of parallel workers (default 2)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Encoder engine
    #[arg(short, long, value_enum)]
    engine: Option<EngineKind>,

    /// Output directory (default: <input>/compressed)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit JSON events on stdout
    #[arg(long)]
    json: bool,

    /// Write ffprobe statistics for every compressed file here
    #[arg(long)]
    stats_dir: Option<PathBuf>,

    /// Exit with code 2 when any job failed
    #[arg(long)]
    strict: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version are not errors
            let code = if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
            let _ = e.print();
            return code;
        }
    };

    if let Err(e) = init_logging(args.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    let json_output = args.json;
    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            if json_output {
                JsonMessage::error(format!("{:#}", e)).emit();
            }
            error!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

async fn run(args: Args) -> Result<ExitCode> {
    debug!("Running on {}", PlatformCommands::system_info());

    let mut config = match args.config {
        Some(ref path) => Config::from_file(path).await?,
        None => Config::default(),
    };

    if let Some(quality) = args.quality {
        config.quality = quality;
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if let Some(engine) = args.engine {
        config.engine = engine;
    }
    if args.output.is_some() {
        config.output_dir = args.output;
    }
    if args.stats_dir.is_some() {
        config.stats_dir = args.stats_dir;
    }
    config.json_output |= args.json;
    config.fail_on_error |= args.strict;

    config.validate()?;

    // validate before touching the filesystem or probing tools
    if !args.input.exists() {
        return Err(CompressError::InvalidInput(args.input).into());
    }

    let encoder = encoder::resolve_encoder(config.engine).await?;
    let compressor = BatchCompressor::new(config, encoder)?;
    let summary = compressor.run(&args.input).await?;

    Ok(ExitCode::from(exit_status(&summary, compressor.config().fail_on_error)))
}

/// Failed jobs only change the exit status in strict mode
fn exit_status(summary: &RunSummary, strict: bool) -> u8 {
    if strict && summary.has_failures() {
        2
    } else {
        0
    }
}
