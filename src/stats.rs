//! # Job Statistics Module
//!
//! Scrive un file JSON per ogni job riuscito con il probe ffprobe di
//! input e output, per confrontare formato e stream dopo la compressione.
//!
//! Best-effort: un probe fallito viene registrato come `null`, un errore
//! di scrittura viene solo loggato dal chiamante.

use crate::error::CompressError;
use crate::platform::{PlatformCommands, FFPROBE};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Contents of one statistics sidecar
#[derive(Debug, Serialize)]
pub struct JobStatsRecord {
    pub input: PathBuf,
    pub output: PathBuf,
    pub engine: String,
    pub timestamp: String,
    pub input_probe: serde_json::Value,
    pub output_probe: serde_json::Value,
}

impl JobStatsRecord {
    /// Build a record stamped with the current UTC time
    pub fn new(
        input: &Path,
        output: &Path,
        engine: &str,
        input_probe: serde_json::Value,
        output_probe: serde_json::Value,
    ) -> Self {
        Self {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            engine: engine.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            input_probe,
            output_probe,
        }
    }

    /// Write the record as `<stats_dir>/<output stem>.json`
    pub async fn write_to(&self, stats_dir: &Path) -> Result<PathBuf, CompressError> {
        tokio::fs::create_dir_all(stats_dir).await?;
        let stats_file = stats_file_path(stats_dir, &self.output);
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(&stats_file, content).await?;
        debug!("Wrote statistics: {}", stats_file.display());
        Ok(stats_file)
    }
}

pub fn stats_file_path(stats_dir: &Path, output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    stats_dir.join(format!("{}.json", stem))
}

/// Run ffprobe and return its format/streams JSON
pub async fn probe(path: &Path) -> Result<serde_json::Value, CompressError> {
    let ffprobe_cmd = PlatformCommands::instance().get_command(FFPROBE);

    let output = tokio::process::Command::new(ffprobe_cmd)
        .args(["-v", "error", "-show_format", "-show_streams", "-of", "json"])
        .arg(path)
        .stdin(std::process::Stdio::null())
        .output()
        .await
        .map_err(|e| CompressError::MissingDependency(format!("Failed to execute {}: {}", ffprobe_cmd, e)))?;

    if !output.status.success() {
        return Err(CompressError::Encode(format!(
            "{} failed for {}: {}",
            ffprobe_cmd,
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(serde_json::from_slice(&output.stdout)?)
}

async fn probe_or_null(path: &Path) -> serde_json::Value {
    match probe(path).await {
        Ok(value) => value,
        Err(e) => {
            warn!("Probe failed for {}: {}", path.display(), e);
            serde_json::Value::Null
        }
    }
}

/// Probe input and output and write the sidecar
pub async fn write_stats(
    input: &Path,
    output: &Path,
    engine: &str,
    stats_dir: &Path,
) -> Result<PathBuf, CompressError> {
    let record = JobStatsRecord::new(
        input,
        output,
        engine,
        probe_or_null(input).await,
        probe_or_null(output).await,
    );
    record.write_to(stats_dir).await
}
