use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrdrSnapError {
    #[error("No JPEG markers found")]
    MarkerNotFound,

    #[error("Malformed embedded image: EOI marker at {eoi} does not follow SOI marker at {soi}")]
    MalformedImage { soi: usize, eoi: usize },

    #[error("Image decode failed: {message}")]
    Decode { message: String },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("No profile folder found under {path}")]
    ProfileDirNotFound { path: String },

    #[error("No PRDR* profile files found in {path}")]
    NoProfilesFound { path: String },

    #[error("Permission denied: {path}")]
    Permission { path: String },

    #[error("Operation was cancelled by user")]
    Cancelled,
}

impl PrdrSnapError {
    /// Wrap an IO error from an operation on `path`. Permission problems
    /// surface as `Permission` with the offending path; everything else
    /// stays a plain `Io`.
    pub fn from_io(path: &Path, error: std::io::Error) -> Self {
        if error.kind() == std::io::ErrorKind::PermissionDenied {
            PrdrSnapError::Permission {
                path: path.display().to_string(),
            }
        } else {
            PrdrSnapError::Io(error)
        }
    }

    /// Per-file failures are recovered in the scan/convert loops; everything
    /// else aborts the requested action before any side effect.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            PrdrSnapError::MarkerNotFound
                | PrdrSnapError::MalformedImage { .. }
                | PrdrSnapError::Decode { .. }
                | PrdrSnapError::Io(_)
        )
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for PrdrSnapError {
    fn user_message(&self) -> String {
        match self {
            PrdrSnapError::MarkerNotFound => {
                "No embedded JPEG image found in the file".to_string()
            }
            PrdrSnapError::MalformedImage { soi, eoi } => {
                format!(
                    "Embedded image markers are inconsistent (SOI at byte {}, EOI at byte {})",
                    soi, eoi
                )
            }
            PrdrSnapError::Decode { message } => {
                format!("Extracted image could not be decoded: {}", message)
            }
            PrdrSnapError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            PrdrSnapError::InvalidPath { path } => {
                format!("Invalid path: {}", path)
            }
            PrdrSnapError::ProfileDirNotFound { path } => {
                format!("Failed to find a profile folder under: {}", path)
            }
            PrdrSnapError::NoProfilesFound { path } => {
                format!("Failed to find any PRDR* file in: {}", path)
            }
            PrdrSnapError::Permission { path } => {
                format!("Permission denied accessing: {}", path)
            }
            PrdrSnapError::Cancelled => "Operation was cancelled by user".to_string(),
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            PrdrSnapError::MarkerNotFound => Some(
                "The file may not contain an embedded photo. Only profile files saved after using the in-game photo mode carry one.".to_string()
            ),
            PrdrSnapError::MalformedImage { .. } => Some(
                "The profile file appears corrupted or uses an unexpected layout. The file is skipped; other files are still processed.".to_string()
            ),
            PrdrSnapError::Config { .. } => Some(
                "Check your configuration file syntax and that both source and destination directories are set and exist.".to_string()
            ),
            PrdrSnapError::ProfileDirNotFound { .. } => Some(
                "Pass the profile directory explicitly with --source, e.g. --source \"Documents/Rockstar Games/Red Dead Redemption 2/Profiles/<id>\".".to_string()
            ),
            PrdrSnapError::NoProfilesFound { .. } => Some(
                "Verify the directory contains files starting with PRDR. Subdirectories are not searched.".to_string()
            ),
            PrdrSnapError::Permission { .. } => Some(
                "Ensure you have the necessary read/write permissions for the target directory.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<image::ImageError> for PrdrSnapError {
    fn from(error: image::ImageError) -> Self {
        PrdrSnapError::Decode {
            message: error.to_string(),
        }
    }
}

impl From<toml::de::Error> for PrdrSnapError {
    fn from(error: toml::de::Error) -> Self {
        PrdrSnapError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PrdrSnapError>;
