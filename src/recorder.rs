//! # Launch Recorder
//!
//! Appends every accepted live sample to a per-launch JSONL file
//! (`launch_<N>.jsonl`), one JSON object per line. Lines that fail the wire
//! grammar never reach the recorder, so a launch file only ever contains
//! real telemetry.
//!
//! The file is created lazily on the first accepted sample; an enabled
//! recorder with no traffic leaves no file behind. Recording failures are
//! reported to the caller but must never take down the session.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::info;

use crate::config::RecorderConfig;
use crate::error::Result;
use crate::frame::TelemetrySample;

/// JSONL writer for one launch.
#[derive(Debug)]
pub struct LaunchRecorder {
    path: PathBuf,
    file: Option<File>,
    records: u64,
}

impl LaunchRecorder {
    /// Build a recorder from configuration; `None` when recording is off.
    pub fn from_config(config: &RecorderConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        Some(Self::new(&config.log_dir, config.launch_number))
    }

    pub fn new<P: AsRef<Path>>(log_dir: P, launch_number: u32) -> Self {
        Self {
            path: log_dir
                .as_ref()
                .join(format!("launch_{}.jsonl", launch_number)),
            file: None,
            records: 0,
        }
    }

    /// Append one sample as a JSON line.
    ///
    /// # Errors
    ///
    /// Returns error if the launch directory or file cannot be created or
    /// the write fails. Callers treat this as a warning, not a fault.
    pub fn record(&mut self, sample: &TelemetrySample) -> Result<()> {
        let line = serde_json::to_string(sample)?;

        if self.file.is_none() {
            if let Some(dir) = self.path.parent() {
                fs::create_dir_all(dir)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            info!(
                "Recording launch telemetry to {} (started {})",
                self.path.display(),
                Utc::now().to_rfc3339()
            );
            self.file = Some(file);
        }

        if let Some(file) = self.file.as_mut() {
            writeln!(file, "{}", line)?;
        }
        self.records += 1;
        Ok(())
    }

    /// Number of samples written so far.
    pub fn records(&self) -> u64 {
        self.records
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
