use crate::config::{CliOverrides, Config};
use crate::convert::ConversionMode;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "prdrsnap")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract embedded photos from Red Dead Redemption 2 profile files")]
#[command(
    long_about = "PrdrSnap scans a Red Dead Redemption 2 profile directory for PRDR* \
                       snapshot files, locates the JPEG image embedded in each one and \
                       writes it out as a viewable .jpg file."
)]
#[command(before_help = "📷 PrdrSnap - RDR2 Photo Extraction Tool")]
#[command(after_help = "EXAMPLES:\n  \
    prdrsnap --dest ./photos\n  \
    prdrsnap --source \"D:/Documents/Rockstar Games/Red Dead Redemption 2/Profiles/1A2B3C4D\" --dest ./photos\n  \
    prdrsnap --dest ./photos --pick 1,3,5\n  \
    prdrsnap --dest ./backup --copy\n  \
    prdrsnap --list")]
pub struct Cli {
    /// Source profile directory containing PRDR* files
    #[arg(
        short,
        long,
        help = "Profile directory to scan (default: auto-detected RDR2 profile)"
    )]
    pub source: Option<PathBuf>,

    /// Destination directory for converted images
    #[arg(short, long, help = "Directory where images are written")]
    pub dest: Option<PathBuf>,

    /// List found snapshot files without converting
    #[arg(short, long, help = "List PRDR* files found in the source directory")]
    pub list: bool,

    /// Positions of files to convert (comma-separated, 1-based)
    #[arg(
        short,
        long,
        value_delimiter = ',',
        help = "Convert only these files, by 1-based position in the listing"
    )]
    pub pick: Option<Vec<usize>>,

    /// Copy raw profile files instead of extracting images
    #[arg(long, help = "Copy profile files unchanged, names preserved")]
    pub copy: bool,

    /// Skip decode validation of extracted bytes
    #[arg(long, help = "Write extracted bytes without verifying they decode")]
    pub no_decode_check: bool,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (show what would be done without executing)
    #[arg(long, help = "Show what would be converted without actually doing it")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> crate::error::Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        let mode = if self.copy {
            Some(ConversionMode::Copy)
        } else {
            None
        };

        let decode_check = if self.no_decode_check {
            Some(false)
        } else {
            None
        };

        CliOverrides::new()
            .with_source_dir(self.source.clone())
            .with_destination_dir(self.dest.clone())
            .with_mode(mode)
            .with_decode_check(decode_check)
    }

    /// Picked positions normalized to zero-based indices, listing order.
    pub fn picked_indices(&self) -> Option<Vec<usize>> {
        self.pick.as_ref().map(|positions| {
            let mut indices: Vec<usize> = positions
                .iter()
                .filter(|&&p| p > 0)
                .map(|&p| p - 1)
                .collect();
            indices.sort_unstable();
            indices.dedup();
            indices
        })
    }

    pub fn should_use_colors(&self) -> bool {
        !self.quiet && console::Term::stdout().features().colors_supported()
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}
