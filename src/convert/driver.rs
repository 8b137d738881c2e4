use crate::error::{PrdrSnapError, Result};
use crate::queue::{ItemPayload, SelectionQueue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// How queued items are materialized in the destination directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionMode {
    /// Write the extracted JPEG bytes as `<original_filename>.jpg`.
    Extract,
    /// Copy the whole profile file unchanged, original name preserved.
    Copy,
}

impl Default for ConversionMode {
    fn default() -> Self {
        ConversionMode::Extract
    }
}

impl std::fmt::Display for ConversionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversionMode::Extract => write!(f, "extract"),
            ConversionMode::Copy => write!(f, "copy"),
        }
    }
}

/// Append-only, ordered, human-readable status lines: one per processed
/// file plus process start/end markers. A display artifact, not a format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionLog {
    lines: Vec<String>,
}

impl ConversionLog {
    pub fn push<S: Into<String>>(&mut self, line: S) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutcome {
    pub filename: String,
    pub destination: Option<PathBuf>,
    pub bytes_written: u64,
    pub error: Option<String>,
}

impl ConversionOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct ConversionProgress {
    pub files_processed: usize,
    pub total_files: usize,
    pub bytes_written: u64,
    pub current_file: Option<String>,
    pub start_time: Instant,
    pub errors: Vec<String>,
}

impl ConversionProgress {
    pub fn new(total_files: usize) -> Self {
        Self {
            files_processed: 0,
            total_files,
            bytes_written: 0,
            current_file: None,
            start_time: Instant::now(),
            errors: Vec::new(),
        }
    }

    pub fn update_file(&mut self, filename: String, bytes: u64) {
        self.files_processed += 1;
        self.bytes_written += bytes;
        self.current_file = Some(filename);
    }

    pub fn add_error<S: Into<String>>(&mut self, error: S) {
        self.errors.push(error.into());
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionReport {
    pub mode: ConversionMode,
    pub destination: PathBuf,
    pub outcomes: Vec<ConversionOutcome>,
    pub log: ConversionLog,
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
    pub succeeded: usize,
    pub failed: usize,
}

impl ConversionReport {
    pub fn total_bytes(&self) -> u64 {
        self.outcomes.iter().map(|o| o.bytes_written).sum()
    }
}

/// Mechanical glue over the extractor and the selection queue: walks the
/// queued list in order and materializes each item in the destination
/// directory, recovering every per-item failure into the log.
pub struct ConversionDriver {
    destination: PathBuf,
    mode: ConversionMode,
    decode_check: bool,
}

impl ConversionDriver {
    pub fn new<P: Into<PathBuf>>(destination: P) -> Self {
        Self {
            destination: destination.into(),
            mode: ConversionMode::Extract,
            decode_check: true,
        }
    }

    pub fn with_mode(mut self, mode: ConversionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Decode-validate extracted bytes with the image crate before writing.
    /// Failures are per-item `Decode` errors, logged and skipped.
    pub fn with_decode_check(mut self, check: bool) -> Self {
        self.decode_check = check;
        self
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Pre-flight validation: destination must be set to an existing
    /// directory before any side effect occurs.
    pub fn validate(&self) -> Result<()> {
        if self.destination.as_os_str().is_empty() {
            return Err(PrdrSnapError::Config {
                message: "No destination directory selected".to_string(),
            });
        }
        if !self.destination.is_dir() {
            return Err(PrdrSnapError::Config {
                message: format!(
                    "Destination directory does not exist: {}",
                    self.destination.display()
                ),
            });
        }
        Ok(())
    }

    /// Process every queued item in order. Per-item failures are recorded
    /// and the run continues; only pre-flight validation aborts.
    pub fn run(
        &self,
        queue: &SelectionQueue,
        progress_callback: Option<&dyn Fn(&ConversionProgress)>,
    ) -> Result<ConversionReport> {
        self.validate()?;

        let started_at = Utc::now();
        let start = Instant::now();
        let mut progress = ConversionProgress::new(queue.queued().len());
        let mut log = ConversionLog::default();
        let mut outcomes = Vec::with_capacity(queue.queued().len());

        log.push(format!(
            "Starting {} of {} queued image(s) to {}",
            self.mode,
            queue.queued().len(),
            self.destination.display()
        ));

        for item in queue.queued() {
            let payload = item.payload();
            log.push(format!(
                "Processing file: {}",
                payload.source_path().display()
            ));

            if let Some(callback) = progress_callback {
                callback(&progress);
            }

            let outcome = match self.convert_item(payload) {
                Ok((destination, bytes_written)) => {
                    log.push(format!(
                        "Successfully copied image to: {}",
                        destination.display()
                    ));
                    progress.update_file(payload.filename(), bytes_written);
                    ConversionOutcome {
                        filename: payload.filename(),
                        destination: Some(destination),
                        bytes_written,
                        error: None,
                    }
                }
                Err(e) => {
                    let message = e.to_string();
                    log.push(format!("Failed to copy image: {}", message));
                    progress.add_error(message.clone());
                    progress.files_processed += 1;
                    ConversionOutcome {
                        filename: payload.filename(),
                        destination: None,
                        bytes_written: 0,
                        error: Some(message),
                    }
                }
            };
            outcomes.push(outcome);
        }

        log.push("Copy process completed.".to_string());

        if let Some(callback) = progress_callback {
            callback(&progress);
        }

        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        let failed = outcomes.len() - succeeded;

        Ok(ConversionReport {
            mode: self.mode,
            destination: self.destination.clone(),
            outcomes,
            log,
            started_at,
            duration: start.elapsed(),
            succeeded,
            failed,
        })
    }

    fn convert_item(&self, payload: &ItemPayload) -> Result<(PathBuf, u64)> {
        match (self.mode, payload) {
            (ConversionMode::Extract, ItemPayload::Extracted(image)) => {
                if self.decode_check {
                    image::load_from_memory(&image.bytes)?;
                }
                let destination = self
                    .destination
                    .join(format!("{}.jpg", image.filename()));
                // Existing files are overwritten, matching copy semantics.
                fs::write(&destination, &image.bytes)
                    .map_err(|e| PrdrSnapError::from_io(&destination, e))?;
                Ok((destination, image.bytes.len() as u64))
            }
            (ConversionMode::Copy, payload) => {
                let destination = self.destination.join(payload.filename());
                let bytes = fs::copy(payload.source_path(), &destination)
                    .map_err(|e| PrdrSnapError::from_io(&destination, e))?;
                Ok((destination, bytes))
            }
            (ConversionMode::Extract, ItemPayload::SourceFile(profile)) => {
                // Extract mode with a bare file reference: re-extract from
                // the source path rather than relying on cached bytes.
                let image = crate::extractor::extract_from_file(&profile.path)?;
                if self.decode_check {
                    image::load_from_memory(&image.bytes)?;
                }
                let destination = self.destination.join(format!("{}.jpg", profile.filename));
                fs::write(&destination, &image.bytes)
                    .map_err(|e| PrdrSnapError::from_io(&destination, e))?;
                Ok((destination, image.bytes.len() as u64))
            }
        }
    }
}
