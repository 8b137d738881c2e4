pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod extractor;
pub mod queue;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, ConversionConfig, DirectoryConfig};
pub use error::{PrdrSnapError, Result, UserFriendlyError};

// Core functionality re-exports
pub use convert::{ConversionDriver, ConversionMode, ConversionProgress, ConversionReport};
pub use extractor::{ExtractedImage, EOI, SOI};
pub use queue::{ControlStates, ItemPayload, ListKind, QueueItem, SelectionQueue};
pub use scanner::{ProfileFile, ProfileScanner, PROFILE_PREFIX};
pub use ui::{GracefulShutdown, OutputFormatter, OutputMode, ProgressManager};

use std::path::{Path, PathBuf};

/// Main library interface for PrdrSnap functionality
pub struct PrdrSnap {
    config: Config,
    config_path: PathBuf,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    shutdown: GracefulShutdown,
}

impl PrdrSnap {
    /// Create a new PrdrSnap instance with the provided configuration
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet);
        let shutdown = GracefulShutdown::new()?;

        Ok(Self {
            config,
            config_path: PathBuf::from("prdrsnap.toml"),
            output_formatter,
            progress_manager,
            shutdown,
        })
    }

    /// Create a new PrdrSnap instance for testing (no signal handler conflicts)
    pub fn new_for_test(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet);
        let shutdown = GracefulShutdown::new_for_test();

        Self {
            config,
            config_path: PathBuf::from("prdrsnap.toml"),
            output_formatter,
            progress_manager,
            shutdown,
        }
    }

    /// Create PrdrSnap instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        let mut instance = Self::new(config, output_mode, cli_args.verbose, cli_args.quiet)?;
        if let Some(ref path) = cli_args.config {
            instance.config_path = path.clone();
        }
        Ok(instance)
    }

    /// Full conversion workflow: resolve the source, scan it, stage the
    /// requested images and convert them into the destination directory.
    ///
    /// `picked` holds zero-based positions into the scan listing; `None`
    /// stages every found image.
    pub fn convert_images(&mut self, picked: Option<&[usize]>) -> Result<ConversionReport> {
        self.shutdown.check_shutdown()?;

        self.output_formatter.start_operation("Converting snapshots");

        // Step 1: Resolve and scan the source directory
        let source = self.resolve_source()?;
        let profiles = self.scan_profiles(&source)?;
        self.shutdown.check_shutdown()?;

        if profiles.is_empty() {
            return Err(PrdrSnapError::NoProfilesFound {
                path: source.display().to_string(),
            });
        }

        // Step 2: Extract embedded images, skipping files without one
        let (mut queue, skipped) = self.load_queue(&profiles);
        self.shutdown.check_shutdown()?;

        self.output_formatter
            .print_scan_summary(queue.candidates().len(), skipped);

        if queue.candidates().is_empty() {
            return Err(PrdrSnapError::NoProfilesFound {
                path: source.display().to_string(),
            });
        }

        // Step 3: Stage the requested images
        self.stage_picked(&mut queue, picked);
        if !queue.can_start() {
            return Err(PrdrSnapError::Config {
                message: "No images staged for conversion (check --pick positions)".to_string(),
            });
        }

        // Step 4: Pre-flight destination check, then persist directories
        // before any file is written
        self.config.require_destination()?;
        self.persist_config();
        self.shutdown.check_shutdown()?;

        // Step 5: Run the conversion
        self.run_conversion(&queue)
    }

    /// Resolve the source directory: configured value first, otherwise the
    /// auto-detected game profile directory. The resolved path is written
    /// back into the configuration so it is persisted for the next run.
    pub fn resolve_source(&mut self) -> Result<PathBuf> {
        if self.config.directories.source_dir.is_some() {
            return self.config.require_source().map(Path::to_path_buf);
        }

        let scanner = ProfileScanner::new();
        let detected = scanner.detect_default_source()?;
        self.output_formatter.info(&format!(
            "Auto-detected profile directory: {}",
            detected.display()
        ));

        self.config.directories.source_dir = Some(detected.clone());
        Ok(detected)
    }

    /// Enumerate PRDR* files in the source directory.
    pub fn scan_profiles(&self, source: &Path) -> Result<Vec<ProfileFile>> {
        self.output_formatter
            .debug(&format!("Scanning {}", source.display()));

        let scanner = ProfileScanner::new();
        let profiles = scanner.scan_directory(source)?;

        self.output_formatter
            .debug(&format!("Found {} PRDR* file(s)", profiles.len()));

        Ok(profiles)
    }

    /// Build the selection queue from scanned profile files. In extract mode
    /// each file is read and its embedded image located up front; files
    /// without a valid image are skipped and counted, never fatal. Copy mode
    /// stages bare file references instead.
    pub fn load_queue(&self, profiles: &[ProfileFile]) -> (SelectionQueue, usize) {
        let mut queue = SelectionQueue::new();
        let mut payloads = Vec::with_capacity(profiles.len());
        let mut skipped = 0;

        match self.config.conversion.mode {
            ConversionMode::Copy => {
                for profile in profiles {
                    payloads.push(ItemPayload::SourceFile(profile.clone()));
                }
            }
            ConversionMode::Extract => {
                for profile in profiles {
                    match extractor::extract_from_file(&profile.path) {
                        Ok(image) => payloads.push(ItemPayload::Extracted(image)),
                        Err(e) => {
                            self.output_formatter.warning(&format!(
                                "Skipping {}: {}",
                                profile.filename,
                                e.user_message()
                            ));
                            skipped += 1;
                        }
                    }
                }
            }
        }

        queue.load(payloads);
        (queue, skipped)
    }

    /// Stage candidates for conversion: the picked zero-based positions, or
    /// everything when no positions were given. Out-of-range positions are
    /// ignored.
    pub fn stage_picked(&self, queue: &mut SelectionQueue, picked: Option<&[usize]>) {
        match picked {
            None => {
                queue.select_all(ListKind::Candidates, true);
                queue.promote_selected();
            }
            Some(indices) => {
                let ids: Vec<_> = indices
                    .iter()
                    .filter_map(|&i| queue.candidates().get(i).map(|item| item.id()))
                    .collect();
                for id in ids {
                    queue.promote(id);
                }
            }
        }
    }

    /// Run the conversion driver over the staged queue with a progress bar.
    pub fn run_conversion(&self, queue: &SelectionQueue) -> Result<ConversionReport> {
        let destination = self.config.require_destination()?;

        let driver = ConversionDriver::new(destination)
            .with_mode(self.config.conversion.mode)
            .with_decode_check(self.config.conversion.decode_check);

        let file_progress = self
            .progress_manager
            .create_file_progress(queue.queued().len() as u64);
        let progress_callback = {
            let pb = file_progress.clone();
            move |progress: &ConversionProgress| {
                ui::progress::update_file_progress(&pb, progress);
            }
        };

        let report = driver.run(queue, Some(&progress_callback))?;

        ui::progress::finish_progress_with_summary(
            &file_progress,
            &format!("Converted {} image(s)", report.succeeded),
            report.duration,
        );

        for line in report.log.lines() {
            self.output_formatter.log_line(line);
        }
        self.output_formatter.print_conversion_summary(&report);

        Ok(report)
    }

    /// Write the current configuration (including the resolved directories)
    /// back to disk. A failed save is reported but never blocks conversion.
    fn persist_config(&self) {
        if let Err(e) = self.config.save_to_file(&self.config_path) {
            self.output_formatter.warning(&format!(
                "Could not save configuration to {}: {}",
                self.config_path.display(),
                e.user_message()
            ));
        }
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config).map_err(PrdrSnapError::Io)?;
        Ok(())
    }

    /// Get configuration reference
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn set_config_path<P: Into<PathBuf>>(&mut self, path: P) {
        self.config_path = path.into();
    }

    /// Get output formatter reference
    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Get progress manager reference
    pub fn progress_manager(&self) -> &ProgressManager {
        &self.progress_manager
    }

    /// Check if shutdown has been requested
    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }

    /// Request graceful shutdown
    pub fn request_shutdown(&self) {
        self.shutdown.request_shutdown();
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &PrdrSnapError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
